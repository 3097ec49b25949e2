use std::fmt;
use std::str::FromStr;
use crate::config::RunOptions;
use crate::error::Result;
use crate::host::VirtualMachine;

mod start;
mod status;
mod stop;

pub use start::start;
pub use status::status;
pub use stop::{stop, suspend};

/// One of the four recognized operation keywords.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
	Start,
	Stop,
	Suspend,
	Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "unrecognized command `{}`", self.0)
	}
}

impl std::error::Error for UnknownCommand { }

impl FromStr for Command {
	type Err = UnknownCommand;

	/// Accepts both the bare and the hyphen-prefixed spelling, `stop` and `-stop` alike.
	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.strip_prefix('-').unwrap_or(s) {
			"start" => Ok(Command::Start),
			"stop" => Ok(Command::Stop),
			"suspend" => Ok(Command::Suspend),
			"status" => Ok(Command::Status),
			_ => Err(UnknownCommand(s.into())),
		}
	}
}

impl fmt::Display for Command {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			Command::Start => "start",
			Command::Stop => "stop",
			Command::Suspend => "suspend",
			Command::Status => "status",
		})
	}
}

impl Command {
	pub async fn run<V: VirtualMachine>(self, vm: &V, path: &str, options: &RunOptions) -> Result<()> {
		log::debug!("running {} against {:?}", self, path);
		match self {
			Command::Start => start(vm, options).await,
			Command::Stop => stop(vm).await,
			Command::Suspend => suspend(vm).await,
			Command::Status => status(vm, path).await.map(drop),
		}
	}
}
