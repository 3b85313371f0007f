use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use rustix::path::Arg;

use crate::error::Error;
use crate::result::Result;
use crate::types::{Device, DeviceState};

lazy_static! {
	static ref RE_NON_WORD: Regex = Regex::new("\\W+").unwrap();
	static ref RE_DEVICE_LINE: Regex = Regex::new("^(?P<serial>\\S+)\\t(?P<state>.+)$").unwrap();
}

static PACKAGE_PREFIX: &str = "package:";
pub(crate) static NO_SUCH_FILE: &str = "No such file";

pub(crate) fn as_str(bytes: &Vec<u8>) -> Result<&str> {
	Ok(Arg::as_str(bytes)?)
}

/// Non empty, trimmed lines
pub(crate) fn split_lines(output: &str) -> Vec<&str> {
	output.split('\n').map(|l| l.trim()).filter(|l| !l.is_empty()).collect()
}

/// Parse the output of `adb devices`
pub(crate) fn parse_devices(output: &str) -> Vec<Device> {
	output
		.split('\n')
		.map(|l| l.trim_end_matches('\r'))
		.filter(|l| !l.trim().is_empty())
		.filter(|l| !l.starts_with('*'))
		.filter(|l| !l.starts_with("List of devices"))
		.filter_map(|line| {
			let captures = RE_DEVICE_LINE.captures(line)?;
			let serial = captures.name("serial")?.as_str().to_string();
			let state = DeviceState::from(captures.name("state")?.as_str().trim());
			Some(Device { serial, state })
		})
		.collect()
}

/// Parse `package:<value>` lines, as printed by `pm list packages` and `pm path`
pub(crate) fn parse_packages(output: &str) -> Vec<String> {
	split_lines(output)
		.into_iter()
		.filter_map(|l| l.split_once(PACKAGE_PREFIX).map(|(_, name)| name.trim().to_string()))
		.filter(|name| !name.is_empty())
		.collect()
}

/// `ps` lines whose process name is exactly the given package
pub(crate) fn find_processes<'a>(output: &'a str, package: &str) -> Vec<&'a str> {
	split_lines(output)
		.into_iter()
		.filter(|line| line.split_whitespace().last() == Some(package))
		.collect()
}

/// The pid is the second column of a `ps` line
pub(crate) fn parse_pid(line: &str) -> Result<u32> {
	let column = line
		.split_whitespace()
		.nth(1)
		.ok_or(Error::ParseOutputError(format!("missing pid column in `{line}`")))?;
	Ok(column.parse::<u32>()?)
}

/// Extract the file size from `ls -l <remote>`.
///
/// toolbox: `-rw-rw---- root sdcard_r 1024 2015-04-17 11:06 name`
/// toybox:  `-rw-rw---- 1 root sdcard_rw 1024 2024-01-01 10:00 name`
pub(crate) fn parse_file_size(output: &str, remote: &str) -> Result<u64> {
	let line = output.trim();
	// toolbox prints `<remote>: No such file...`, toybox `ls: <remote>: No such file...`
	if line.is_empty() || line.starts_with(remote) || line.contains(NO_SUCH_FILE) {
		return Err(Error::RemoteFileNotFoundError(remote.to_string()));
	}

	let columns = line.split_whitespace().collect::<Vec<_>>();
	let index = match columns.get(1) {
		Some(links) if links.chars().all(|c| c.is_ascii_digit()) => 4,
		_ => 3,
	};
	let size = columns
		.get(index)
		.ok_or(Error::ParseOutputError(format!("missing size column in `{line}`")))?;
	Ok(size.parse::<u64>()?)
}

/// Local file name for anything downloaded from a device: the serial and the
/// given items joined by `_`, with every run of non word characters replaced
/// by `_`.
pub fn generate_name<S: AsRef<str>>(serial: &str, items: &[S], extension: Option<&str>) -> String {
	let detail = items.iter().map(|s| s.as_ref()).filter(|s| !s.is_empty()).join("_");
	let joined = if detail.is_empty() { serial.to_string() } else { format!("{serial}_{detail}") };
	let name = RE_NON_WORD.replace_all(&joined, "_");
	match extension {
		Some(ext) => format!("{name}.{ext}"),
		None => name.into_owned(),
	}
}

impl From<&str> for DeviceState {
	fn from(value: &str) -> Self {
		match value {
			"device" => DeviceState::Device,
			"offline" => DeviceState::Offline,
			"unauthorized" => DeviceState::Unauthorized,
			"no device" => DeviceState::NoDevice,
			other => DeviceState::Unknown(other.to_string()),
		}
	}
}
