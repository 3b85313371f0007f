use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const REMOTE_HEAP_DUMP_PATH: &str = "/sdcard/_dumpey_hprof_tmp";
pub const REMOTE_SCREENSHOT_PATH: &str = "/sdcard/_dumpey_screenshot_tmp.png";

/// Heap dumps are not available before honeycomb
pub const MIN_HEAP_DUMP_API: u32 = 11;

pub const MONKEY_SEED_MIN: u32 = 10_000;
pub const MONKEY_SEED_MAX: u32 = 100_000;
pub const MONKEY_EVENTS: u32 = 1000;

static ENV_ADB: &str = "DUMPEY_ADB";
static ENV_HPROF_CONV: &str = "DUMPEY_HPROF_CONV";
static ENV_POLL_INTERVAL_MS: &str = "DUMPEY_POLL_INTERVAL_MS";
static ENV_HEAP_DUMP_TIMEOUT_SECS: &str = "DUMPEY_HEAP_DUMP_TIMEOUT_SECS";
static ENV_MONKEY_EVENTS: &str = "DUMPEY_MONKEY_EVENTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// adb binary, looked up in PATH when missing
	pub adb: Option<PathBuf>,
	/// hprof-conv binary, looked up in PATH or ANDROID_HOME when missing
	pub hprof_conv: Option<PathBuf>,
	pub remote_heap_dump_path: String,
	pub remote_screenshot_path: String,
	/// delay between two reads of the remote heap dump size
	pub poll_interval: Duration,
	/// give up if the remote heap dump is still growing after this long
	pub heap_dump_timeout: Duration,
	pub monkey_events: u32,
	pub show_progress: bool,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			adb: None,
			hprof_conv: None,
			remote_heap_dump_path: REMOTE_HEAP_DUMP_PATH.to_string(),
			remote_screenshot_path: REMOTE_SCREENSHOT_PATH.to_string(),
			poll_interval: Duration::from_secs(1),
			heap_dump_timeout: Duration::from_secs(300),
			monkey_events: MONKEY_EVENTS,
			show_progress: true,
		}
	}
}

impl Config {
	/// Defaults, overridden by the `DUMPEY_*` environment variables
	pub fn from_env() -> Self {
		Config::from_lookup(|key| std::env::var(key).ok())
	}

	pub(crate) fn from_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut config = Config::default();
		if let Some(path) = lookup(ENV_ADB) {
			config.adb = Some(PathBuf::from(path));
		}
		if let Some(path) = lookup(ENV_HPROF_CONV) {
			config.hprof_conv = Some(PathBuf::from(path));
		}
		if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_POLL_INTERVAL_MS) {
			config.poll_interval = Duration::from_millis(ms);
		}
		if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_HEAP_DUMP_TIMEOUT_SECS) {
			config.heap_dump_timeout = Duration::from_secs(secs);
		}
		if let Some(events) = parse_var::<u32, _>(&lookup, ENV_MONKEY_EVENTS) {
			config.monkey_events = events;
		}
		config
	}

	pub fn with_adb(mut self, adb: Option<PathBuf>) -> Self {
		if adb.is_some() {
			self.adb = adb;
		}
		self
	}
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
	T: FromStr,
	F: Fn(&str) -> Option<String>,
{
	let value = lookup(key)?;
	match value.trim().parse::<T>() {
		Ok(v) => Some(v),
		Err(_) => {
			warn!("ignoring {key}={value}, not a valid number");
			None
		}
	}
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;
	use std::path::PathBuf;
	use std::time::Duration;

	use crate::config::{Config, REMOTE_HEAP_DUMP_PATH};

	fn config_from(vars: &[(&str, &str)]) -> Config {
		let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		Config::from_lookup(|key| map.get(key).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = config_from(&[]);
		assert_eq!(Config::default(), config);
		assert_eq!(REMOTE_HEAP_DUMP_PATH, config.remote_heap_dump_path);
		assert_eq!(Duration::from_secs(1), config.poll_interval);
		assert_eq!(1000, config.monkey_events);
	}

	#[test]
	fn test_overrides() {
		let config = config_from(&[
			("DUMPEY_ADB", "/opt/sdk/platform-tools/adb"),
			("DUMPEY_POLL_INTERVAL_MS", "250"),
			("DUMPEY_HEAP_DUMP_TIMEOUT_SECS", "10"),
			("DUMPEY_MONKEY_EVENTS", "50"),
		]);
		assert_eq!(Some(PathBuf::from("/opt/sdk/platform-tools/adb")), config.adb);
		assert_eq!(Duration::from_millis(250), config.poll_interval);
		assert_eq!(Duration::from_secs(10), config.heap_dump_timeout);
		assert_eq!(50, config.monkey_events);
	}

	#[test]
	fn test_invalid_numbers_are_ignored() {
		let config = config_from(&[("DUMPEY_POLL_INTERVAL_MS", "soon")]);
		assert_eq!(Duration::from_secs(1), config.poll_interval);
	}

	#[test]
	fn test_cli_adb_wins() {
		let config = config_from(&[("DUMPEY_ADB", "/env/adb")]).with_adb(Some(PathBuf::from("/cli/adb")));
		assert_eq!(Some(PathBuf::from("/cli/adb")), config.adb);

		let config = config_from(&[("DUMPEY_ADB", "/env/adb")]).with_adb(None);
		assert_eq!(Some(PathBuf::from("/env/adb")), config.adb);
	}
}
