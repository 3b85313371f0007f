use std::path::Path;
use std::process::Output;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Error;
use crate::output_util::{as_str, find_processes, parse_file_size, parse_pid, NO_SUCH_FILE};
use crate::result::Result;
use crate::traits::Runner;
use crate::types::{Client, Shell};

static API_LEVEL_PROP: &str = "ro.build.version.sdk";

/// `ps` only lists the shell user's processes from oreo on
static PS_ALL_MIN_API: u32 = 26;

impl Client {
	pub fn new(runner: Arc<dyn Runner>, serial: &str) -> Self {
		Client {
			runner,
			serial: serial.to_string(),
		}
	}

	/// Executes `adb -s <serial> args...`
	pub fn exec(&self, args: &[&str]) -> Result<Output> {
		self.runner.adb(Some(self.serial.as_str()), args)
	}

	/// return the client shell interface
	pub fn shell(&self) -> Shell {
		Shell { parent: self }
	}

	/// The Android SDK version the device is running
	pub fn api_level(&self) -> Result<u32> {
		let value = self.shell().getprop(API_LEVEL_PROP)?;
		Ok(value.parse::<u32>()?)
	}

	pub fn install(&self, local: &Path) -> Result<()> {
		let local = local.to_string_lossy();
		self.exec(&[
			"install",
			local.as_ref(),
		])?;
		info!("{local} installed on {}", self.serial);
		Ok(())
	}

	pub fn uninstall(&self, package: &str) -> Result<()> {
		self.exec(&[
			"uninstall",
			package,
		])?;
		info!("{package} uninstalled from {}", self.serial);
		Ok(())
	}

	pub fn reboot(&self) -> Result<()> {
		self.exec(&["reboot"])?;
		info!("{} rebooted", self.serial);
		Ok(())
	}

	/// Copy a file from the device
	pub fn pull(&self, remote: &str, local: &Path, show_progress: bool) -> Result<()> {
		let local = local.to_string_lossy();
		let mut args = vec!["pull"];
		if show_progress {
			args.push("-p");
		}
		args.push(remote);
		args.push(local.as_ref());
		self.exec(&args)?;
		Ok(())
	}

	/// Size in bytes of a file on the device
	pub fn file_size(&self, remote: &str) -> Result<u64> {
		let output = match self.shell().exec(&[
			"ls", "-l", remote,
		]) {
			Ok(output) => output,
			Err(Error::CommandFailedError { ref stderr, .. }) if stderr.contains(NO_SUCH_FILE) => {
				return Err(Error::RemoteFileNotFoundError(remote.to_string()));
			}
			Err(err) => return Err(err),
		};
		parse_file_size(as_str(&output.stdout)?, remote)
	}

	/// Remove a file from the device, if it exists
	pub fn remove_file(&self, remote: &str) -> Result<()> {
		self.shell().exec(&[
			"rm", "-f", remote,
		])?;
		Ok(())
	}

	/// The process id of a running package, `api` being the device [Client::api_level].
	///
	/// When the package is not running and `force_open` is set, the app is
	/// launched with a single monkey event and the lookup is repeated once.
	pub fn pid(&self, package: &str, api: u32, force_open: bool) -> Result<u32> {
		let output = if api >= PS_ALL_MIN_API {
			self.shell().exec(&[
				"ps", "-A",
			])?
		} else {
			self.shell().exec(&["ps"])?
		};
		let stdout = as_str(&output.stdout)?;
		let processes = find_processes(stdout, package);

		match processes.len() {
			0 if force_open => {
				debug!("{package} not running on {}, launching it", self.serial);
				self.shell().monkey(package, 0, 1)?;
				self.pid(package, api, false)
			}
			0 => Err(Error::ProcessNotFoundError {
				serial: self.serial.clone(),
				package: package.to_string(),
			}),
			1 => parse_pid(processes[0]),
			_ => Err(Error::MultipleProcessesError {
				package: package.to_string(),
				processes: processes.join(", "),
			}),
		}
	}
}
