use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;

use crate::apk::collect_apks;
use crate::config::Config;
use crate::devices::select_devices;
use crate::error::Error;
use crate::monkey::random_seed;
use crate::resolver::{for_each_package, package_list};
use crate::result::Result;
use crate::traits::Runner;
use crate::types::{Client, MonkeyOptions, PackageTarget};

/// The set of devices an invocation works on. Every operation runs device
/// after device, in selection order.
#[derive(Debug)]
pub struct Fleet {
	config: Config,
	clients: Vec<Client>,
}

impl Fleet {
	/// All attached devices, or only the given serials when not empty
	pub fn new(runner: Arc<dyn Runner>, config: Config, serials: &[String]) -> Result<Fleet> {
		let clients = select_devices(runner, serials)?;
		Ok(Fleet { config, clients })
	}

	pub fn clients(&self) -> &[Client] {
		&self.clients
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// The only selected device
	pub fn single(&self) -> Result<&Client> {
		match self.clients.as_slice() {
			[client] => Ok(client),
			[] => Err(Error::NoDevicesError),
			_ => Err(Error::AmbiguousDeviceError),
		}
	}

	/// Install an apk file, or every apk in a directory, on every device.
	/// The current directory is used when no path is given.
	pub fn install(&self, local: Option<&Path>, recursive: bool) -> Result<Vec<PathBuf>> {
		let local = local_dir_or_cwd(local)?;
		let apks = collect_apks(&local, recursive)?;
		for apk in apks.iter() {
			for client in self.clients.iter() {
				client.install(apk)?;
			}
		}
		Ok(apks)
	}

	pub fn uninstall(&self, target: &PackageTarget, force: bool) -> Result<Vec<String>> {
		for_each_package(&self.clients, target, force, |client, package| client.uninstall(package))
	}

	pub fn clear_data(&self, target: &PackageTarget, force: bool) -> Result<Vec<String>> {
		for_each_package(&self.clients, target, force, |client, package| {
			client.shell().pm().clear(package)
		})
	}

	pub fn pull_apk(&self, target: &PackageTarget, local_dir: Option<&Path>, force: bool) -> Result<Vec<String>> {
		let local_dir = existing_dir(local_dir)?;
		let show_progress = self.config.show_progress;
		for_each_package(&self.clients, target, force, |client, package| {
			client.pull_apk(package, &local_dir, show_progress).map(|_| ())
		})
	}

	pub fn dump_heap(&self, target: &PackageTarget, local_dir: Option<&Path>, force: bool) -> Result<Vec<String>> {
		let local_dir = existing_dir(local_dir)?;
		for_each_package(&self.clients, target, force, |client, package| {
			client.dump_heap(package, &local_dir, None, &self.config).map(|_| ())
		})
	}

	/// Run the monkey everywhere with a single seed, random unless given.
	/// Returns the seed used.
	pub fn monkey(&self, target: &PackageTarget, options: &MonkeyOptions, force: bool) -> Result<u32> {
		let seed = options.seed.unwrap_or_else(random_seed);
		let events = options.events.unwrap_or(self.config.monkey_events);
		let local_dir = if options.dump.is_empty() {
			local_dir_or_cwd(options.local_dir.as_deref())?
		} else {
			existing_dir(options.local_dir.as_deref())?
		};
		for_each_package(&self.clients, target, force, |client, package| {
			client.monkey(package, seed, events, options.dump, &local_dir, &self.config)
		})?;
		Ok(seed)
	}

	/// Installed packages per device, optionally filtered
	pub fn package_list(&self, filter: Option<&Regex>) -> Result<Vec<(String, Vec<String>)>> {
		package_list(&self.clients, filter)
	}

	pub fn reboot(&self) -> Result<()> {
		for client in self.clients.iter() {
			client.reboot()?;
		}
		Ok(())
	}
}

fn local_dir_or_cwd(local: Option<&Path>) -> Result<PathBuf> {
	match local {
		Some(path) => Ok(path.to_path_buf()),
		None => Ok(std::env::current_dir()?),
	}
}

fn existing_dir(local: Option<&Path>) -> Result<PathBuf> {
	let dir = local_dir_or_cwd(local)?;
	if !dir.is_dir() {
		return Err(Error::PathNotFoundError(dir));
	}
	Ok(dir)
}

#[cfg(test)]
mod test {
	use std::fs;
	use std::sync::Arc;
	use std::time::Duration;

	use regex::Regex;

	use crate::config::Config;
	use crate::error::Error;
	use crate::fleet::Fleet;
	use crate::test::test::*;
	use crate::types::{DumpSchedule, MonkeyOptions, PackageTarget};

	fn fleet_of(runner: &Arc<MockRunner>, serials: &[&str]) -> Fleet {
		let serials = serials.iter().map(|s| s.to_string()).collect::<Vec<_>>();
		Fleet::new(runner.clone(), Config::default(), &serials).expect("failed to create fleet")
	}

	fn standard_runner() -> Arc<MockRunner> {
		let devices = devices_output(&[
			DEVICE_1, DEVICE_2, DEVICE_3,
		]);
		MockRunner::new(move |_, args| match args {
			["devices"] => MockReply::ok(&devices),
			["shell", "pm", "list", "packages"] => {
				MockReply::ok("package:com.example.one\npackage:com.example.two\npackage:org.sample\n")
			}
			_ => MockReply::ok("Success"),
		})
	}

	fn device_calls(runner: &MockRunner) -> Vec<String> {
		runner.calls().into_iter().filter(|c| c != "devices").collect()
	}

	#[test]
	fn test_single() {
		init_log();
		let runner = standard_runner();
		assert!(matches!(fleet_of(&runner, &[]).single(), Err(Error::AmbiguousDeviceError)));
		assert_eq!(DEVICE_2, fleet_of(&runner, &[DEVICE_2]).single().unwrap().serial);
	}

	#[test]
	fn test_install_directory() {
		init_log();
		let dir = tempfile::tempdir().expect("failed to create temp dir");
		fs::write(dir.path().join("one.apk"), b"").unwrap();
		fs::write(dir.path().join("two.apk"), b"").unwrap();

		let runner = standard_runner();
		let fleet = fleet_of(
			&runner,
			&[
				DEVICE_1, DEVICE_3,
			],
		);
		let apks = fleet.install(Some(dir.path()), false).unwrap();
		assert_eq!(2, apks.len());

		let one = dir.path().join("one.apk");
		let two = dir.path().join("two.apk");
		assert_eq!(
			vec![
				format!("-s {DEVICE_1} install {}", one.display()),
				format!("-s {DEVICE_3} install {}", one.display()),
				format!("-s {DEVICE_1} install {}", two.display()),
				format!("-s {DEVICE_3} install {}", two.display()),
			],
			device_calls(&runner)
		);
	}

	#[test]
	fn test_install_missing_path() {
		init_log();
		let dir = tempfile::tempdir().expect("failed to create temp dir");
		let runner = standard_runner();
		let fleet = fleet_of(&runner, &[DEVICE_1]);
		let missing = dir.path().join("nope");
		assert!(matches!(
			fleet.install(Some(&missing), true),
			Err(Error::PathNotFoundError(_))
		));
	}

	#[test]
	fn test_uninstall_regex() {
		init_log();
		let runner = standard_runner();
		let fleet = fleet_of(&runner, &[DEVICE_1]);

		let target = PackageTarget::from_args(None, Some("example")).unwrap();
		let affected = fleet.uninstall(&target, false).unwrap();
		assert!(affected.is_empty());

		let affected = fleet.uninstall(&target, true).unwrap();
		assert_eq!(vec![DEVICE_1], affected);
		let uninstalls = device_calls(&runner)
			.into_iter()
			.filter(|c| c.contains("uninstall"))
			.collect::<Vec<_>>();
		assert_eq!(
			vec![
				format!("-s {DEVICE_1} uninstall com.example.one"),
				format!("-s {DEVICE_1} uninstall com.example.two"),
			],
			uninstalls
		);
	}

	#[test]
	fn test_clear_data() {
		init_log();
		let runner = standard_runner();
		let fleet = fleet_of(
			&runner,
			&[
				DEVICE_1, DEVICE_2,
			],
		);
		let target = PackageTarget::from_args(Some("org.sample"), None).unwrap();
		fleet.clear_data(&target, false).unwrap();
		assert_eq!(
			vec![
				format!("-s {DEVICE_1} shell pm clear org.sample"),
				format!("-s {DEVICE_2} shell pm clear org.sample"),
			],
			device_calls(&runner)
		);
	}

	#[test]
	fn test_reboot() {
		init_log();
		let runner = standard_runner();
		fleet_of(&runner, &[]).reboot().unwrap();
		assert_eq!(
			vec![
				format!("-s {DEVICE_1} reboot"),
				format!("-s {DEVICE_2} reboot"),
				format!("-s {DEVICE_3} reboot"),
			],
			device_calls(&runner)
		);
	}

	#[test]
	fn test_package_list() {
		init_log();
		let runner = standard_runner();
		let fleet = fleet_of(&runner, &[DEVICE_3]);
		let re = Regex::new("^org").unwrap();
		let list = fleet.package_list(Some(&re)).unwrap();
		assert_eq!(vec![(DEVICE_3.to_string(), vec!["org.sample".to_string()])], list);
	}

	#[test]
	fn test_monkey_shares_seed() {
		init_log();
		let runner = standard_runner();
		let fleet = fleet_of(
			&runner,
			&[
				DEVICE_1, DEVICE_2,
			],
		);
		let target = PackageTarget::from_args(Some("org.sample"), None).unwrap();
		let seed = fleet.monkey(&target, &MonkeyOptions::default(), false).unwrap();
		assert_eq!(
			vec![
				format!("-s {DEVICE_1} shell monkey -p org.sample -s {seed} 1000"),
				format!("-s {DEVICE_2} shell monkey -p org.sample -s {seed} 1000"),
			],
			device_calls(&runner)
		);
	}

	#[test]
	fn test_monkey_with_options() {
		init_log();
		let runner = standard_runner();
		let fleet = fleet_of(&runner, &[DEVICE_1]);
		let target = PackageTarget::from_args(Some("org.sample"), None).unwrap();
		let options = MonkeyOptions {
			seed: Some(7),
			events: Some(25),
			..Default::default()
		};
		assert_eq!(7, fleet.monkey(&target, &options, false).unwrap());
		assert_eq!(
			vec![format!("-s {DEVICE_1} shell monkey -p org.sample -s 7 25")],
			device_calls(&runner)
		);
	}

	#[test]
	fn test_heap_dump_requires_directory() {
		init_log();
		let dir = tempfile::tempdir().expect("failed to create temp dir");
		let runner = standard_runner();
		let fleet = fleet_of(&runner, &[DEVICE_1]);
		let target = PackageTarget::from_args(Some("org.sample"), None).unwrap();
		let missing = dir.path().join("nope");
		assert!(matches!(
			fleet.dump_heap(&target, Some(&missing), false),
			Err(Error::PathNotFoundError(_))
		));

		let options = MonkeyOptions {
			dump: DumpSchedule { before: true, after: false },
			local_dir: Some(missing),
			..Default::default()
		};
		assert!(matches!(
			fleet.monkey(&target, &options, false),
			Err(Error::PathNotFoundError(_))
		));
		assert!(device_calls(&runner).is_empty());
	}

	#[test]
	fn test_dump_heap() {
		init_log();
		let dir = tempfile::tempdir().expect("failed to create temp dir");
		let devices = devices_output(&[DEVICE_1]);
		let runner = MockRunner::new(move |_, args| match args {
			["devices"] => MockReply::ok(&devices),
			["shell", "getprop", "ro.build.version.sdk"] => MockReply::ok("30"),
			["shell", "ps", "-A"] => MockReply::ok("u0_a1 12 1 1 1 0 0 S org.sample\n"),
			["shell", "ls", "-l", _] => MockReply::ok("-rw-rw---- 1 u0_a1 media_rw 64 2024-01-01 10:00 tmp\n"),
			["pull", ..] => MockReply::pulled(b"JAVA PROFILE 1.0.3"),
			_ => MockReply::ok(""),
		});
		let config = Config {
			poll_interval: Duration::ZERO,
			..Default::default()
		};
		let fleet = Fleet::new(runner.clone(), config, &[]).unwrap();
		let target = PackageTarget::from_args(Some("org.sample"), None).unwrap();
		let affected = fleet.dump_heap(&target, Some(dir.path()), false).unwrap();
		assert_eq!(vec![DEVICE_1], affected);
		assert!(dir.path().join("emulator_5554_org_sample.hprof").exists());
	}
}
