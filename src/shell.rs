use std::process::Output;

use crate::output_util::as_str;
use crate::result::Result;
use crate::types::{ActivityManager, PackageManager, Shell};

impl<'a> Shell<'a> {
	/// executes custom command over the shell interface
	pub fn exec(&self, args: &[&str]) -> Result<Output> {
		let mut full_args = vec!["shell"];
		full_args.extend_from_slice(args);
		self.parent.exec(&full_args)
	}

	/// Read a system property, trimmed
	pub fn getprop(&self, key: &str) -> Result<String> {
		let output = self.exec(&[
			"getprop", key,
		])?;
		Ok(as_str(&output.stdout)?.trim().to_string())
	}

	/// Inject `events` pseudo random events into the given package
	pub fn monkey(&self, package: &str, seed: u32, events: u32) -> Result<Output> {
		let seed = seed.to_string();
		let events = events.to_string();
		self.exec(&[
			"monkey",
			"-p",
			package,
			"-s",
			seed.as_str(),
			events.as_str(),
		])
	}

	/// Save a screenshot of the current screen to a device path
	pub fn screencap(&self, remote: &str) -> Result<()> {
		self.exec(&[
			"screencap",
			remote,
		])?;
		Ok(())
	}

	/// return the package manager interface
	pub fn pm(&self) -> PackageManager {
		PackageManager { parent: self }
	}

	/// return the activity manager interface
	pub fn am(&self) -> ActivityManager {
		ActivityManager { parent: self }
	}
}
