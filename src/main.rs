use std::io::stdin;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use crossbeam_channel::Sender;
use regex::Regex;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use dumpey::config::Config;
use dumpey::fleet::Fleet;
use dumpey::traits::Runner;
use dumpey::types::{Adb, DumpSchedule, MonkeyOptions, PackageTarget};

#[derive(Parser, Debug)]
#[command(name = "dumpey", version, about = "Dumpey, an Android Debug Bridge utility tool.")]
struct Cli {
	/// device serials to run the command on, all attached devices if missing
	#[arg(short = 's', long = "serials", value_name = "SERIAL", num_args = 1.., global = true)]
	serials: Vec<String>,

	/// adb executable, overrides DUMPEY_ADB and PATH lookup
	#[arg(long, value_name = "PATH", global = true)]
	adb: Option<PathBuf>,

	/// trace every executed command
	#[arg(long, global = true)]
	debug: bool,

	/// more output, repeat for even more
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,

	#[command(subcommand)]
	cmd: Cmd,
}

#[derive(Args, Debug)]
struct PackageArgs {
	/// package name
	#[arg(short, long)]
	package: Option<String>,

	/// regex matched against installed package names
	#[arg(short, long)]
	regex: Option<String>,

	/// force command on all packages matching the regex
	#[arg(short, long)]
	force: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
	/// install APKs from path
	#[command(visible_alias = "i")]
	Install {
		/// apk file or directory, current directory if missing
		#[arg(short = 'o', long = "source", value_name = "PATH")]
		path: Option<PathBuf>,

		/// descend into subdirectories
		#[arg(short, long)]
		recursive: bool,
	},
	/// uninstall apps
	#[command(visible_alias = "u")]
	Uninstall {
		#[command(flatten)]
		package: PackageArgs,
	},
	/// download APKs
	#[command(visible_alias = "a")]
	Apk {
		#[command(flatten)]
		package: PackageArgs,

		/// target directory, current directory if missing
		#[arg(short = 'o', long = "source", value_name = "DIR")]
		path: Option<PathBuf>,
	},
	/// stop and clear package data
	#[command(visible_alias = "c")]
	Clear {
		#[command(flatten)]
		package: PackageArgs,
	},
	/// reboot devices
	#[command(visible_alias = "r")]
	Reboot,
	/// do a heap dump
	#[command(visible_alias = "h")]
	Heap {
		#[command(flatten)]
		package: PackageArgs,

		/// target directory, current directory if missing
		#[arg(short = 'o', long = "source", value_name = "DIR")]
		path: Option<PathBuf>,
	},
	/// list installed packages
	#[command(visible_alias = "l")]
	List {
		/// only packages matching this regex
		#[arg(short, long)]
		regex: Option<String>,
	},
	/// run the monkey
	#[command(visible_alias = "m")]
	Monkey {
		#[command(flatten)]
		package: PackageArgs,

		/// heap dump directory, current directory if missing
		#[arg(short = 'o', long = "source", value_name = "DIR")]
		path: Option<PathBuf>,

		/// seed value, random if missing
		#[arg(long)]
		seed: Option<u32>,

		/// number of events
		#[arg(long)]
		events: Option<u32>,

		/// perform heap dumps before (b), after (a) or before and after the monkey (ab|ba)
		#[arg(long, value_parser = ["b", "a", "ba", "ab"])]
		dump: Option<String>,
	},
	/// do snapshots
	#[command(visible_alias = "s")]
	Snapshot {
		/// device serial
		#[arg(short, long)]
		device: Option<String>,

		/// target directory, current directory if missing
		#[arg(short = 'o', long = "source", value_name = "DIR")]
		path: Option<PathBuf>,

		/// take multiple snapshots
		#[arg(short, long)]
		multi: bool,
	},
}

impl PackageArgs {
	fn target(&self) -> dumpey::result::Result<PackageTarget> {
		PackageTarget::from_args(self.package.as_deref(), self.regex.as_deref())
	}
}

fn init_log(verbose: u8) -> WorkerGuard {
	use tracing_subscriber::prelude::*;

	let default_level = match verbose {
		0 => "info",
		1 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
	let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
	let layer = tracing_subscriber::fmt::layer()
		.with_thread_names(false)
		.with_thread_ids(false)
		.with_line_number(false)
		.with_file(false)
		.with_target(false)
		.without_time()
		.with_writer(non_blocking);

	tracing_subscriber::registry().with(filter).with(layer).init();
	guard
}

/// 128 + SIGINT
static INTERRUPTED_EXIT_CODE: i32 = 130;

/// Ctrl-C kills the running adb commands. With nothing running (e.g. waiting on
/// stdin) it returns true and the process exits.
fn interrupt(running: &AtomicUsize, cancel: &Sender<()>) -> bool {
	if running.load(Ordering::SeqCst) == 0 {
		return true;
	}
	let _ = cancel.send(());
	false
}

fn run(cli: Cli) -> anyhow::Result<()> {
	let (cancel_tx, cancel_rx) = crossbeam_channel::unbounded::<()>();

	let config = Config::from_env().with_adb(cli.adb.clone());
	let adb = Adb::from_config(&config)?
		.with_debug(cli.debug)
		.with_cancel(Some(cancel_rx));

	let running = adb.running_commands();
	ctrlc::set_handler(move || {
		if interrupt(&running, &cancel_tx) {
			std::process::exit(INTERRUPTED_EXIT_CODE);
		}
	})?;
	let runner: Arc<dyn Runner> = Arc::new(adb);

	match cli.cmd {
		Cmd::Install { path, recursive } => {
			let fleet = Fleet::new(runner, config, &cli.serials)?;
			fleet.install(path.as_deref(), recursive)?;
		}
		Cmd::Uninstall { package } => {
			let fleet = Fleet::new(runner, config, &cli.serials)?;
			fleet.uninstall(&package.target()?, package.force)?;
		}
		Cmd::Apk { package, path } => {
			let fleet = Fleet::new(runner, config, &cli.serials)?;
			fleet.pull_apk(&package.target()?, path.as_deref(), package.force)?;
		}
		Cmd::Clear { package } => {
			let fleet = Fleet::new(runner, config, &cli.serials)?;
			fleet.clear_data(&package.target()?, package.force)?;
		}
		Cmd::Reboot => {
			Fleet::new(runner, config, &cli.serials)?.reboot()?;
		}
		Cmd::Heap { package, path } => {
			let fleet = Fleet::new(runner, config, &cli.serials)?;
			fleet.dump_heap(&package.target()?, path.as_deref(), package.force)?;
		}
		Cmd::List { regex } => {
			let regex = regex.filter(|r| !r.trim().is_empty());
			let filter = regex.as_deref().map(Regex::new).transpose()?;
			let fleet = Fleet::new(runner, config, &cli.serials)?;
			for (serial, packages) in fleet.package_list(filter.as_ref())? {
				// program output, not log records
				match regex.as_deref() {
					Some(re) => println!("installed packages on {serial} for '{re}':"),
					None => println!("installed packages on {serial}:"),
				}
				for package in packages {
					println!("{package}");
				}
			}
		}
		Cmd::Monkey {
			package,
			path,
			seed,
			events,
			dump,
		} => {
			let schedule = match dump {
				Some(d) => d.parse::<DumpSchedule>()?,
				None => DumpSchedule::default(),
			};
			let options = MonkeyOptions {
				seed,
				events,
				dump: schedule,
				local_dir: path,
			};
			let fleet = Fleet::new(runner, config, &cli.serials)?;
			let seed = fleet.monkey(&package.target()?, &options, package.force)?;
			info!("monkey done, seed={seed}");
		}
		Cmd::Snapshot { device, path, multi } => {
			let serials = device.map(|d| vec![d]).unwrap_or(cli.serials);
			let fleet = Fleet::new(runner, config, &serials)?;
			let client = fleet.single()?;
			let dir = match path {
				Some(p) => p,
				None => std::env::current_dir()?,
			};
			if multi {
				client.screenshots(&dir, fleet.config(), stdin().lock())?;
			} else {
				client.screenshot(&dir, fleet.config())?;
			}
		}
	}
	Ok(())
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	let _guard = init_log(cli.verbose);

	match run(cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!("{err:#}");
			ExitCode::FAILURE
		}
	}
}
