use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::Receiver;
use itertools::Itertools;
use simple_cmd::prelude::OutputExt;
use simple_cmd::{Cmd, CommandBuilder};
use tracing::{trace, warn};
use which::which;

use crate::config::Config;
use crate::error::Error;
use crate::prelude::*;
use crate::result::Result;
use crate::traits::Runner;
use crate::types::Adb;
use crate::utils;

impl Adb {
	/// Locate adb in the current PATH
	pub fn new() -> Result<Adb> {
		let adb = which("adb")?;
		Ok(Adb::with_path(adb))
	}

	pub fn from(path: &Path) -> Result<Adb> {
		if !path.exists() {
			return Err(Error::WhichError(which::Error::CannotFindBinaryPath));
		}
		Ok(Adb::with_path(path.to_path_buf()))
	}

	/// Resolve both adb and hprof-conv from the given configuration.
	/// A missing hprof-conv is only reported when a heap dump needs it.
	pub fn from_config(config: &Config) -> Result<Adb> {
		let adb = match config.adb.as_ref() {
			Some(path) => Adb::from(path)?,
			None => Adb::new()?,
		};
		let hprof_conv = match config.hprof_conv.as_ref() {
			Some(path) if path.exists() => Some(path.to_path_buf()),
			Some(path) => {
				warn!("hprof-conv not found at {}", path.display());
				None
			}
			None => utils::hprof_conv().ok(),
		};
		Ok(adb.with_hprof_conv(hprof_conv))
	}

	fn with_path(path: PathBuf) -> Adb {
		Adb {
			path,
			hprof_conv: None,
			debug: false,
			cancel: None,
			running: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn with_hprof_conv(mut self, path: Option<PathBuf>) -> Self {
		self.hprof_conv = path;
		self
	}

	/// Trace every executed command
	pub fn with_debug(mut self, debug: bool) -> Self {
		self.debug = debug;
		self
	}

	/// Running commands are killed as soon as a message is received
	pub fn with_cancel(mut self, cancel: Option<Receiver<()>>) -> Self {
		self.cancel = cancel;
		self
	}

	/// Number of commands currently executing, shared by every clone of this `Adb`
	pub fn running_commands(&self) -> Arc<AtomicUsize> {
		self.running.clone()
	}

	pub fn as_os_str(&self) -> &OsStr {
		self.path.as_os_str()
	}

	fn command_line<I, S>(program: &Path, args: I) -> String
	where
		I: IntoIterator<Item = S>,
		S: AsRef<OsStr>,
	{
		std::iter::once(program.as_os_str().to_string_lossy().into_owned())
			.chain(args.into_iter().map(|a| a.as_ref().to_string_lossy().into_owned()))
			.join(" ")
	}
}

impl Runner for Adb {
	fn adb(&self, serial: Option<&str>, args: &[&str]) -> Result<Output> {
		let mut full_args = vec![];
		if let Some(s) = serial {
			full_args.extend([
				"-s", s,
			]);
		}
		full_args.extend_from_slice(args);
		let command = Adb::command_line(&self.path, &full_args);
		trace!("exec: {command}");

		let builder = CommandBuilder::adb(self).serial(serial).args(args);
		let _running = Running::enter(&self.running);
		handle_result(command, builder.build().output())
	}

	fn hprof_conv(&self, src: &Path, dst: &Path) -> Result<()> {
		let program = self
			.hprof_conv
			.as_ref()
			.filter(|p| p.exists())
			.ok_or(Error::ToolNotFoundError("hprof-conv"))?;
		let command = Adb::command_line(
			program,
			[
				src.as_os_str(),
				dst.as_os_str(),
			],
		);
		trace!("exec: {command}");

		let _running = Running::enter(&self.running);
		let output = Cmd::builder(program)
			.arg(src)
			.arg(dst)
			.with_debug(self.debug)
			.signal(self.cancel.clone())
			.build()
			.output();
		handle_result(command, output).map(|_| ())
	}
}

fn handle_result(command: String, result: std::result::Result<Output, simple_cmd::Error>) -> Result<Output> {
	match result {
		Ok(output) => {
			if output.interrupt() || output.kill() {
				Err(Error::InterruptedError(command))
			} else if output.error() {
				Err(Error::CommandFailedError {
					command,
					status: output.status.code(),
					stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
				})
			} else {
				Ok(output)
			}
		}
		Err(simple_cmd::Error::CommandError(err)) => Err(Error::CommandFailedError {
			command,
			status: err.exit_code(),
			stderr: String::from_utf8_lossy(&err.stderr).trim().to_string(),
		}),
		Err(err) => Err(err.into()),
	}
}

/// Keeps [Adb::running_commands] incremented while alive
struct Running<'a>(&'a AtomicUsize);

impl<'a> Running<'a> {
	fn enter(counter: &'a AtomicUsize) -> Self {
		counter.fetch_add(1, Ordering::SeqCst);
		Running(counter)
	}
}

impl Drop for Running<'_> {
	fn drop(&mut self) {
		self.0.fetch_sub(1, Ordering::SeqCst);
	}
}
