use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::config::{Config, MIN_HEAP_DUMP_API};
use crate::error::Error;
use crate::output_util::generate_name;
use crate::result::Result;
use crate::types::{Client, DumpMoment};

impl Client {
	/// Dump the heap of a running package, pull it to `local_dir` and convert it
	/// with hprof-conv.
	///
	/// Returns the converted file, or `None` when the device is too old or the
	/// dump came back empty.
	pub fn dump_heap(
		&self,
		package: &str,
		local_dir: &Path,
		moment: Option<DumpMoment>,
		config: &Config,
	) -> Result<Option<PathBuf>> {
		let api = self.api_level()?;
		if api < MIN_HEAP_DUMP_API {
			warn!("heap dumps available on API > 10, device {} is {api}", self.serial);
			return Ok(None);
		}

		let pid = self.pid(package, api, true)?;
		let remote = config.remote_heap_dump_path.as_str();

		self.remove_file(remote)?;
		self.shell().am().dumpheap(pid, remote)?;

		let size = self.wait_for_dump(remote, config.poll_interval, config.heap_dump_timeout)?;
		debug!("{remote} on {} settled at {size} bytes", self.serial);

		let suffix = moment.map(|m| m.to_string()).unwrap_or_default();
		let name = generate_name(
			&self.serial,
			&[
				package,
				suffix.as_str(),
			],
			None,
		);
		let local = local_dir.join(format!("{name}.hprof"));
		let local_nonconv = local_dir.join(format!("{name}.hprof-nonconv"));

		self.pull(remote, &local_nonconv, config.show_progress)?;

		if std::fs::metadata(&local_nonconv)?.len() > 0 {
			if let Err(err) = self.runner.hprof_conv(&local_nonconv, &local) {
				self.remove_file(remote)?;
				warn!("conversion failed, non-converted heap dump kept at {}", local_nonconv.display());
				return Err(err);
			}
			std::fs::remove_file(&local_nonconv)?;
			self.remove_file(remote)?;
			info!("converted hprof file available at {}", local.display());
			Ok(Some(local))
		} else {
			warn!("non-converted heap dump is empty, has '{package}' crashed?");
			std::fs::remove_file(&local_nonconv)?;
			Ok(None)
		}
	}

	/// `am dumpheap` returns immediately and the dump is written in the
	/// background: poll the remote size until a read is not bigger than the
	/// previous one.
	pub(crate) fn wait_for_dump(&self, remote: &str, interval: Duration, timeout: Duration) -> Result<u64> {
		let start = Instant::now();
		let mut previous: Option<u64> = None;
		loop {
			sleep(interval);
			match self.file_size(remote) {
				Ok(size) => {
					trace!("{remote}: {size} bytes");
					if previous.is_some_and(|p| size <= p) {
						return Ok(size);
					}
					previous = Some(size);
				}
				Err(Error::RemoteFileNotFoundError(_)) => trace!("{remote} not created yet"),
				Err(err) => return Err(err),
			}

			let elapsed = start.elapsed();
			if elapsed >= timeout {
				return Err(Error::HeapDumpTimeoutError {
					remote: remote.to_string(),
					elapsed,
				});
			}
		}
	}
}
