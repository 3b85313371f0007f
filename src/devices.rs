use std::sync::Arc;

use tracing::warn;

use crate::error::Error;
use crate::output_util::{as_str, parse_devices};
use crate::result::Result;
use crate::traits::Runner;
use crate::types::{Client, Device, DeviceState};

/// Every device reported by `adb devices`, whatever its state
pub fn list_devices(runner: &dyn Runner) -> Result<Vec<Device>> {
	let output = runner.adb(None, &["devices"])?;
	Ok(parse_devices(as_str(&output.stdout)?))
}

/// Serials of the devices in `device` state
pub fn attached_devices(runner: &dyn Runner) -> Result<Vec<String>> {
	let serials = list_devices(runner)?
		.into_iter()
		.filter(|d| d.state == DeviceState::Device)
		.map(|d| d.serial)
		.collect::<Vec<_>>();
	if serials.is_empty() {
		return Err(Error::NoDevicesError);
	}
	Ok(serials)
}

/// Clients for the attached devices, restricted to `serials` when not empty.
///
/// Requested serials which are not attached are skipped with a warning.
pub fn select_devices(runner: Arc<dyn Runner>, serials: &[String]) -> Result<Vec<Client>> {
	let attached = attached_devices(runner.as_ref())?;
	let selected = if serials.is_empty() {
		attached
	} else {
		let mut selected = vec![];
		for serial in serials {
			if !attached.contains(serial) {
				warn!("{serial} is not attached, skipping");
			} else if !selected.contains(serial) {
				selected.push(serial.clone());
			}
		}
		selected
	};

	if selected.is_empty() {
		return Err(Error::NoDevicesError);
	}
	Ok(selected.iter().map(|s| Client::new(runner.clone(), s)).collect())
}
