use std::path::{Path, PathBuf};

use itertools::Itertools;
use tracing::{info, warn};

use crate::error::Error;
use crate::output_util::generate_name;
use crate::result::Result;
use crate::types::Client;

static APK_EXTENSION: &str = ".apk";

/// The apk files to install from a local path.
///
/// A file is returned as is. A directory is scanned in name order for files
/// ending in `.apk`, descending into subdirectories only when `recursive`.
pub fn collect_apks(local: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
	if !local.exists() {
		return Err(Error::PathNotFoundError(local.to_path_buf()));
	}
	if !local.is_dir() {
		return Ok(vec![local.to_path_buf()]);
	}

	let mut result = vec![];
	collect_from_dir(local, recursive, &mut result)?;
	Ok(result)
}

fn collect_from_dir(dir: &Path, recursive: bool, result: &mut Vec<PathBuf>) -> Result<()> {
	let entries = std::fs::read_dir(dir)?
		.map(|entry| entry.map(|e| e.path()))
		.collect::<std::io::Result<Vec<_>>>()?
		.into_iter()
		.sorted()
		.collect::<Vec<_>>();

	for path in entries {
		let is_apk = path
			.file_name()
			.map(|name| name.to_string_lossy().ends_with(APK_EXTENSION))
			.unwrap_or(false);
		if path.is_dir() {
			if recursive {
				collect_from_dir(&path, recursive, result)?;
			}
		} else if is_apk {
			result.push(path);
		}
	}
	Ok(())
}

impl Client {
	/// Download the apk of an installed package into `local_dir`.
	///
	/// Nothing is pulled, with a warning, when the package has no path or
	/// more than one (split apks).
	pub fn pull_apk(&self, package: &str, local_dir: &Path, show_progress: bool) -> Result<Option<PathBuf>> {
		let paths = self.shell().pm().path(package)?;
		match paths.as_slice() {
			[] => {
				warn!("path for package {package} on {} not available", self.serial);
				Ok(None)
			}
			[remote] => {
				let basename = Path::new(remote)
					.file_name()
					.map(|n| n.to_string_lossy().into_owned())
					.unwrap_or_else(|| remote.clone());
				let local = local_dir.join(generate_name(&self.serial, &[basename], Some("apk")));
				self.pull(remote, &local, show_progress)?;
				info!("apk from {} downloaded to {}", self.serial, local.display());
				Ok(Some(local))
			}
			_ => {
				warn!("multiple paths available on {}: {}", self.serial, paths.iter().join(", "));
				Ok(None)
			}
		}
	}
}
