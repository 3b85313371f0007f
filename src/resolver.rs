use itertools::Itertools;
use regex::Regex;
use tracing::warn;

use crate::result::Result;
use crate::types::{Client, PackageTarget};

/// Outcome of matching a package target against one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	Packages(Vec<String>),
	NotFound,
	/// more than one package matched and the caller did not force
	Ambiguous(Vec<String>),
}

pub fn resolve(client: &Client, target: &PackageTarget, force: bool) -> Result<Resolution> {
	match target {
		PackageTarget::Name(name) => Ok(Resolution::Packages(vec![name.clone()])),
		PackageTarget::Regex(re) => {
			let packages = client.shell().pm().list_packages(Some(re))?;
			Ok(match packages.len() {
				0 => Resolution::NotFound,
				1 => Resolution::Packages(packages),
				_ if force => Resolution::Packages(packages),
				_ => Resolution::Ambiguous(packages),
			})
		}
	}
}

/// Run `f` for every package the target resolves to, device by device.
///
/// Devices where a regex matches nothing, or matches several packages
/// without `force`, are skipped with a warning. Returns the serials of
/// the devices `f` ran on.
pub fn for_each_package<F>(clients: &[Client], target: &PackageTarget, force: bool, mut f: F) -> Result<Vec<String>>
where
	F: FnMut(&Client, &str) -> Result<()>,
{
	let mut affected = vec![];
	for client in clients {
		match resolve(client, target, force)? {
			Resolution::NotFound => {
				warn!("nothing found for regex '{target}' on {}", client.serial);
			}
			Resolution::Ambiguous(packages) => {
				warn!(
					"multiple apps found for regex '{target}' on {}: {}",
					client.serial,
					packages.iter().join(", ")
				);
			}
			Resolution::Packages(packages) => {
				affected.push(client.serial.clone());
				for package in packages {
					f(client, package.as_str())?;
				}
			}
		}
	}
	Ok(affected)
}

/// Installed packages per device, in device order
pub fn package_list(clients: &[Client], filter: Option<&Regex>) -> Result<Vec<(String, Vec<String>)>> {
	clients
		.iter()
		.map(|client| Ok((client.serial.clone(), client.shell().pm().list_packages(filter)?)))
		.collect()
}
