use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use regex::Regex;
use strum_macros::Display;

use crate::traits::Runner;

/// Host side tool locations used to drive the attached devices
#[derive(Debug, Clone)]
pub struct Adb {
	pub(crate) path: PathBuf,
	pub(crate) hprof_conv: Option<PathBuf>,
	pub(crate) debug: bool,
	pub(crate) cancel: Option<Receiver<()>>,
	pub(crate) running: Arc<AtomicUsize>,
}

/// A single device, addressed by its serial
#[derive(Clone)]
pub struct Client {
	pub(crate) runner: Arc<dyn Runner>,
	pub serial: String,
}

#[derive(Debug, Clone)]
pub struct Shell<'a> {
	pub(crate) parent: &'a Client,
}

#[derive(Debug, Clone)]
pub struct PackageManager<'a> {
	pub(crate) parent: &'a Shell<'a>,
}

#[derive(Debug, Clone)]
pub struct ActivityManager<'a> {
	pub(crate) parent: &'a Shell<'a>,
}

/// One line of `adb devices`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
	pub serial: String,
	pub state: DeviceState,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceState {
	Device,
	Offline,
	Unauthorized,
	NoDevice,
	Unknown(String),
}

/// What a package operation is applied to: a literal package name or
/// every installed package matching a regex
#[derive(Debug, Clone)]
pub enum PackageTarget {
	Name(String),
	Regex(Regex),
}

/// When heap dumps are taken around a monkey run
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DumpSchedule {
	pub before: bool,
	pub after: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MonkeyOptions {
	// -s <seed>
	pub seed: Option<u32>,
	// number of injected events
	pub events: Option<u32>,
	pub dump: DumpSchedule,
	// where heap dumps land, current directory if missing
	pub local_dir: Option<PathBuf>,
}

/// Heap dump file name suffix
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DumpMoment {
	#[strum(to_string = "before")]
	Before,
	#[strum(to_string = "after")]
	After,
}
