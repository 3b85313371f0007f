use std::path::Path;

use rand::Rng;
use tracing::info;

use crate::config::{Config, MONKEY_SEED_MAX, MONKEY_SEED_MIN};
use crate::result::Result;
use crate::types::{Client, DumpMoment, DumpSchedule};

/// A seed shared by every device of a single run
pub fn random_seed() -> u32 {
	rand::thread_rng().gen_range(MONKEY_SEED_MIN..=MONKEY_SEED_MAX)
}

impl Client {
	/// Run the monkey on a package, with heap dumps before and/or after it as
	/// the schedule requires. Dumps land in `local_dir`.
	pub fn monkey(
		&self,
		package: &str,
		seed: u32,
		events: u32,
		schedule: DumpSchedule,
		local_dir: &Path,
		config: &Config,
	) -> Result<()> {
		if schedule.before {
			self.dump_heap(package, local_dir, Some(DumpMoment::Before), config)?;
		}

		info!(
			"starting monkey (seed={seed}, events={events}) on {} for package {package}",
			self.serial
		);
		self.shell().monkey(package, seed, events)?;

		if schedule.after {
			self.dump_heap(package, local_dir, Some(DumpMoment::After), config)?;
		}
		Ok(())
	}
}
