use anyhow::Result;
use async_ctrlc::CtrlC;
use clap::Parser;
use std::fmt;
use std::io::Write;
use vmpower::{HostConfig, RunOptions, timestamp};

mod invocation;

use invocation::{Invocation, UsageError, usage};

#[derive(Parser, Debug)]
#[clap(author, version, about, disable_help_flag = true)]
struct Cli {
	#[clap(flatten)]
	host: HostConfig,
	#[clap(flatten)]
	options: RunOptions,
	/// <command> <vmpath> [nogui]
	#[clap(allow_hyphen_values = true)]
	words: Vec<String>,
}

fn init_logger() {
	env_logger::Builder::from_env(env_logger::Env::new()
		.filter_or("VMPOWER_LOG", "info")
		.write_style("VMPOWER_LOG_STYLE")
	).format(|buf, record| {
		writeln!(buf, "[{}] {}", timestamp::now(), record.args())
	}).init();
}

#[tokio::main]
async fn main() -> Result<()> {
	init_logger();

	let prog = std::env::args().next()
		.unwrap_or_else(|| env!("CARGO_BIN_NAME").into());
	let mut args = Cli::parse();

	let invocation = match Invocation::from_words(&args.words) {
		Ok(invocation) => invocation,
		Err(e) => {
			if e != UsageError::Help {
				log::debug!("{}", e);
			}
			eprint!("{}", usage(&prog, args.host.provider));
			std::process::exit(1)
		},
	};
	if invocation.nogui {
		args.options.launch_gui = false;
	}

	let ctrlc = match CtrlC::new() {
		Ok(ctrlc) => ctrlc,
		Err(e) => abort(format_args!("Failed to install interrupt handler: {}", e), 1),
	};
	let res = vmpower::run(&args.host, &invocation.vm_path, invocation.command, &args.options, ctrlc).await;

	match res {
		Ok(()) => {
			log::info!("Finished");
			Ok(())
		},
		Err(e) => {
			if let Some(source) = std::error::Error::source(&e) {
				log::debug!("{}", source);
			}
			abort(&e, e.exit_code())
		},
	}
}

fn abort(message: impl fmt::Display, code: i32) -> ! {
	log::error!("{}", message);
	log::error!("ABORTED");
	std::process::exit(code)
}
