use regex::Regex;
use tracing::info;

use crate::output_util::{as_str, parse_packages};
use crate::result::Result;
use crate::types::PackageManager;

impl<'a> PackageManager<'a> {
	/// Installed packages, optionally only those the regex matches anywhere in the name
	pub fn list_packages(&self, filter: Option<&Regex>) -> Result<Vec<String>> {
		let output = self.parent.exec(&[
			"pm", "list", "packages",
		])?;
		let packages = parse_packages(as_str(&output.stdout)?);
		Ok(match filter {
			Some(re) => packages.into_iter().filter(|p| re.is_match(p)).collect(),
			None => packages,
		})
	}

	/// Return the apk paths of a given package name
	pub fn path(&self, package_name: &str) -> Result<Vec<String>> {
		let output = self.parent.exec(&[
			"pm",
			"path",
			package_name,
		])?;
		Ok(parse_packages(as_str(&output.stdout)?))
	}

	/// Stop the package and delete all of its data
	pub fn clear(&self, package_name: &str) -> Result<()> {
		self.parent.exec(&[
			"pm",
			"clear",
			package_name,
		])?;
		info!("cleared data for '{package_name}' on device {}", self.parent.parent.serial);
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use regex::Regex;

	use crate::test::test::*;

	static PACKAGES: &str = "package:com.dummy.package.fst\npackage:com.dummy.package.snd\npackage:org.other.trd\n";

	#[test]
	fn test_list_packages() {
		init_log();
		let runner = MockRunner::new(|_, args| match args {
			["shell", "pm", "list", "packages"] => MockReply::ok(PACKAGES),
			_ => MockReply::unexpected(args),
		});
		let client = client_for(&runner, DEVICE_1);
		let all = client.shell().pm().list_packages(None).unwrap();
		assert_eq!(3, all.len());

		let re = Regex::new("dummy").unwrap();
		let filtered = client.shell().pm().list_packages(Some(&re)).unwrap();
		assert_eq!(
			vec![
				"com.dummy.package.fst",
				"com.dummy.package.snd"
			],
			filtered
		);

		let re = Regex::new("^other").unwrap();
		assert!(client.shell().pm().list_packages(Some(&re)).unwrap().is_empty());
	}

	#[test]
	fn test_path() {
		init_log();
		let runner = MockRunner::new(|_, args| match args {
			["shell", "pm", "path", "com.example.app"] => MockReply::ok(
				"package:/data/app/com.example.app-1/base.apk\npackage:/data/app/com.example.app-1/split_config.en.apk\n",
			),
			["shell", "pm", "path", _] => MockReply::ok(""),
			_ => MockReply::unexpected(args),
		});
		let client = client_for(&runner, DEVICE_1);
		assert_eq!(2, client.shell().pm().path("com.example.app").unwrap().len());
		assert!(client.shell().pm().path("com.example.none").unwrap().is_empty());
	}

	#[test]
	fn test_clear() {
		init_log();
		let runner = MockRunner::new(|_, _| MockReply::ok("Success"));
		let client = client_for(&runner, DEVICE_1);
		client.shell().pm().clear("com.example.app").unwrap();
		assert_eq!(vec![format!("-s {DEVICE_1} shell pm clear com.example.app")], runner.calls());
	}
}
