use std::io::BufRead;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::config::Config;
use crate::output_util::generate_name;
use crate::result::Result;
use crate::types::Client;

impl Client {
	/// Take a screenshot and download it to `local_dir`
	pub fn screenshot(&self, local_dir: &Path, config: &Config) -> Result<PathBuf> {
		let local = self.screenshot_path(local_dir);
		let remote = config.remote_screenshot_path.as_str();

		self.shell().screencap(remote)?;
		self.pull(remote, &local, false)?;
		self.remove_file(remote)?;
		info!("screenshot downloaded to {}", local.display());
		Ok(local)
	}

	/// `<serial>_<unix seconds>.png`, with a counter appended when taken within the same second
	fn screenshot_path(&self, local_dir: &Path) -> PathBuf {
		let now = Local::now().timestamp().to_string();
		let mut local = local_dir.join(generate_name(&self.serial, &[now.as_str()], Some("png")));
		let mut counter = 1u32;
		while local.exists() {
			let suffix = counter.to_string();
			local = local_dir.join(generate_name(&self.serial, &[now.as_str(), suffix.as_str()], Some("png")));
			counter += 1;
		}
		local
	}

	/// Take one screenshot for every empty line read from `input`, stopping
	/// at the first non empty line or at the end of the input.
	pub fn screenshots<R: BufRead>(&self, local_dir: &Path, config: &Config, input: R) -> Result<Vec<PathBuf>> {
		info!("press enter to take a snapshot or [any key + enter] to exit");
		let mut taken = vec![];
		for line in input.lines() {
			if !line?.trim_end_matches('\r').is_empty() {
				break;
			}
			taken.push(self.screenshot(local_dir, config)?);
		}
		Ok(taken)
	}
}
