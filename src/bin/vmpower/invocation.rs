use std::fmt;
use vmpower::{Command, Provider};

const HELP_WORDS: &[&str] = &["-h", "--h", "-help", "--help", "help"];
const NOGUI_WORDS: &[&str] = &["nogui", "-nogui"];

/// What the positional words of a command line ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Invocation {
	pub command: Command,
	pub vm_path: String,
	pub nogui: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UsageError {
	Help,
	MissingArguments,
	UnknownCommand(String),
	EmptyPath,
	/// Anything past `<vmpath>` other than `nogui`; long options must come before the command.
	UnexpectedWord(String),
}

impl fmt::Display for UsageError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			UsageError::Help => f.write_str("help requested"),
			UsageError::MissingArguments => f.write_str("expected a command and a virtual machine path"),
			UsageError::UnknownCommand(word) => write!(f, "unrecognized command `{}`", word),
			UsageError::EmptyPath => f.write_str("virtual machine path must not be empty"),
			UsageError::UnexpectedWord(word) => write!(f, "unexpected `{}` after the virtual machine path", word),
		}
	}
}

impl Invocation {
	/// `<command> <vmpath> [options]`, where help words may appear anywhere and `nogui` anywhere after the command.
	pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self, UsageError> {
		let words: Vec<&str> = words.iter().map(AsRef::as_ref).collect();
		if words.iter().any(|w| HELP_WORDS.contains(w)) {
			return Err(UsageError::Help)
		}

		let (command, vm_path, rest) = match words[..] {
			[command, vm_path, ref rest @ ..] => (command, vm_path, rest),
			_ => return Err(UsageError::MissingArguments),
		};
		if let Some(word) = rest.iter().copied().find(|w| !NOGUI_WORDS.contains(w)) {
			return Err(UsageError::UnexpectedWord(word.to_string()))
		}
		let command = command.parse::<Command>()
			.map_err(|e| UsageError::UnknownCommand(e.0))?;
		if vm_path.is_empty() {
			return Err(UsageError::EmptyPath)
		}

		Ok(Invocation {
			command,
			vm_path: vm_path.into(),
			nogui: words.iter().any(|w| NOGUI_WORDS.contains(w)),
		})
	}
}

pub(crate) fn usage(prog: &str, provider: Provider) -> String {
	format!("
Usage: {prog} [--long-options] <command> <vmpath> [options]

  <command>
    the desired action, either `-start`, `-suspend`, `-stop`, or `-status`

  <vmpath>
    {info}

  [options]
      -nogui: start virtual machine without UI
      -help: shows this help

  Connection settings (--provider, --host, --port, --username, --password,
  --wait, --socket-timeout) and timing settings (--launch-gui, --poll-interval,
  --startup-wait, --start-timeout) are long options that go before <command>,
  also read from VMPOWER_* environment variables.

Examples:
  {prog} -start /run/vms/web/qmp.sock
  {prog} -stop \"/run/vms/build server/qmp.sock\"
", prog = prog, info = provider.vm_path_info())
}
