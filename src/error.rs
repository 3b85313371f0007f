use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
	#[error(transparent)]
	WhichError(#[from] which::Error),

	#[error(transparent)]
	CommandError(#[from] simple_cmd::Error),

	#[error("failed to execute '{command}', status={}, err={stderr}", exit_code(.status))]
	CommandFailedError {
		command: String,
		status: Option<i32>,
		stderr: String,
	},

	#[error("command interrupted: '{0}'")]
	InterruptedError(String),

	#[error(transparent)]
	IoError(#[from] std::io::Error),

	#[error(transparent)]
	RegexError(#[from] regex::Error),

	#[error(transparent)]
	ParseIntError(#[from] ParseIntError),

	#[error("{0} not found")]
	ToolNotFoundError(&'static str),

	#[error("no devices in 'device' state")]
	NoDevicesError,

	#[error("specify device serial")]
	AmbiguousDeviceError,

	#[error("either package or regex must be given")]
	MissingPackageOrRegexError,

	#[error("{0} does not exist")]
	PathNotFoundError(PathBuf),

	#[error("{0} not found")]
	RemoteFileNotFoundError(String),

	#[error("no process on {serial} found for {package}, is your app installed?")]
	ProcessNotFoundError { serial: String, package: String },

	#[error("multiple processes for {package}: {processes}")]
	MultipleProcessesError { package: String, processes: String },

	#[error("failed to parse output: {0}")]
	ParseOutputError(String),

	#[error("invalid dump schedule `{0}`, expected one of b, a, ba, ab")]
	InvalidDumpScheduleError(String),

	#[error("{remote} still growing after {elapsed:?}")]
	HeapDumpTimeoutError { remote: String, elapsed: Duration },
}

fn exit_code(status: &Option<i32>) -> String {
	match status {
		Some(code) => code.to_string(),
		// terminated by a signal
		None => "-".to_string(),
	}
}

impl From<rustix::io::Errno> for Error {
	fn from(value: rustix::io::Errno) -> Self {
		Error::IoError(std::io::Error::from(value))
	}
}
