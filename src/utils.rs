use std::path::PathBuf;

use anyhow::anyhow;
use which::which;

use crate::types::Adb;

/// Attempt to find the ANDROID_HOME environment variable, if it is not found, attempt to find it using the adb command location
pub fn android_home() -> anyhow::Result<PathBuf> {
	if let Ok(path) = std::env::var("ANDROID_HOME") {
		let pathbuf = PathBuf::from(path);
		if pathbuf.exists() {
			return Ok(pathbuf);
		}
	}

	// adb lives in $ANDROID_HOME/platform-tools
	let adb = Adb::new()?;
	match adb.path.parent().and_then(|p| p.parent()) {
		Some(x) if x.exists() => Ok(x.to_path_buf()),
		_ => Err(anyhow!("ANDROID_HOME not set or invalid")),
	}
}

/// Attempt to find the hprof-conv command path
pub fn hprof_conv() -> anyhow::Result<PathBuf> {
	if let Ok(path) = which("hprof-conv") {
		return Ok(path);
	}
	let path = android_home()?.join("platform-tools").join("hprof-conv");
	if path.exists() {
		Ok(path)
	} else {
		Err(anyhow::Error::msg("hprof-conv not found"))
	}
}
