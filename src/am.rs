use crate::result::Result;
use crate::types::ActivityManager;

impl<'a> ActivityManager<'a> {
	/// Ask the process to write its heap to a device path.
	///
	/// The dump is written asynchronously, the command returns before the file is complete.
	pub fn dumpheap(&self, pid: u32, remote: &str) -> Result<()> {
		let pid = pid.to_string();
		self.parent.exec(&[
			"am",
			"dumpheap",
			pid.as_str(),
			remote,
		])?;
		Ok(())
	}
}
