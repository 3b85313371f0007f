use std::path::Path;
use std::process::Output;

use crate::result::Result;

/// Executes the host side tools.
///
/// Every device operation goes through this trait, so a scripted
/// implementation can stand in for a real `adb` binary.
pub trait Runner: Send + Sync {
	/// Runs `adb [-s serial] args...`.
	///
	/// A non zero exit status is returned as [crate::error::Error::CommandFailedError].
	fn adb(&self, serial: Option<&str>, args: &[&str]) -> Result<Output>;

	/// Converts a device heap dump into the standard hprof format
	fn hprof_conv(&self, src: &Path, dst: &Path) -> Result<()>;
}
