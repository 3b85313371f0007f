// region Client

use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use regex::Regex;

use crate::error::Error;
use crate::result::Result;
use crate::types::{Client, Device, DeviceState, DumpSchedule, PackageTarget};

impl Debug for Client {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Client").field("serial", &self.serial).finish()
	}
}

impl Display for Client {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.serial)
	}
}

// endregion Client

// region Device

impl Display for Device {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}\t{}", self.serial, self.state)
	}
}

impl Display for DeviceState {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			DeviceState::Device => write!(f, "device"),
			DeviceState::Offline => write!(f, "offline"),
			DeviceState::Unauthorized => write!(f, "unauthorized"),
			DeviceState::NoDevice => write!(f, "no device"),
			DeviceState::Unknown(state) => write!(f, "{state}"),
		}
	}
}

// endregion Device

// region PackageTarget

impl PackageTarget {
	/// A literal package name wins over a regex when both are given
	pub fn from_args(package: Option<&str>, regex: Option<&str>) -> Result<PackageTarget> {
		match (package, regex) {
			(Some(p), _) if !p.is_empty() => Ok(PackageTarget::Name(p.to_string())),
			(_, Some(r)) if !r.is_empty() => Ok(PackageTarget::Regex(Regex::new(r)?)),
			_ => Err(Error::MissingPackageOrRegexError),
		}
	}
}

impl Display for PackageTarget {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			PackageTarget::Name(name) => write!(f, "{name}"),
			PackageTarget::Regex(re) => write!(f, "{}", re.as_str()),
		}
	}
}

// endregion PackageTarget

// region DumpSchedule

impl FromStr for DumpSchedule {
	type Err = Error;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"b" => Ok(DumpSchedule { before: true, after: false }),
			"a" => Ok(DumpSchedule { before: false, after: true }),
			"ba" | "ab" => Ok(DumpSchedule { before: true, after: true }),
			_ => Err(Error::InvalidDumpScheduleError(s.to_string())),
		}
	}
}

impl DumpSchedule {
	pub fn is_empty(&self) -> bool {
		!self.before && !self.after
	}
}

// endregion DumpSchedule

#[cfg(test)]
mod test {
	use crate::error::Error;
	use crate::types::{DumpSchedule, PackageTarget};

	#[test]
	fn test_package_target() {
		let target = PackageTarget::from_args(Some("com.example.app"), Some(".*")).unwrap();
		assert!(matches!(target, PackageTarget::Name(ref name) if name == "com.example.app"));

		let target = PackageTarget::from_args(None, Some("example")).unwrap();
		assert_eq!("example", target.to_string());
		assert!(matches!(target, PackageTarget::Regex(_)));

		assert!(matches!(
			PackageTarget::from_args(None, None),
			Err(Error::MissingPackageOrRegexError)
		));
		assert!(matches!(
			PackageTarget::from_args(Some(""), Some("")),
			Err(Error::MissingPackageOrRegexError)
		));
		assert!(matches!(PackageTarget::from_args(None, Some("(")), Err(Error::RegexError(_))));
	}

	#[test]
	fn test_dump_schedule() {
		assert_eq!(DumpSchedule { before: true, after: false }, "b".parse().unwrap());
		assert_eq!(DumpSchedule { before: false, after: true }, "a".parse().unwrap());
		assert_eq!(DumpSchedule { before: true, after: true }, "ba".parse().unwrap());
		assert_eq!(DumpSchedule { before: true, after: true }, "ab".parse().unwrap());
		assert!("x".parse::<DumpSchedule>().is_err());
		assert!(DumpSchedule::default().is_empty());
	}
}
