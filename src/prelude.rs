use simple_cmd::CommandBuilder;

use crate::types::Adb;

pub(crate) trait CommandBuilderExt {
	fn serial(self, serial: Option<&str>) -> Self;

	fn adb(adb: &Adb) -> CommandBuilder;
}

impl CommandBuilderExt for CommandBuilder {
	fn serial(self, serial: Option<&str>) -> Self {
		match serial {
			Some(s) => self.args([
				"-s", s,
			]),
			None => self,
		}
	}

	fn adb(adb: &Adb) -> CommandBuilder {
		CommandBuilder::new(adb.path.as_os_str())
			.with_debug(adb.debug)
			.signal(adb.cancel.clone())
	}
}
