use clap::{ArgAction, Args, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::power::PowerOpOptions;

#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Provider {
	/// QEMU, driven through its QMP monitor socket
	#[default]
	Qemu,
}

impl Provider {
	/// What the `<vmpath>` argument names for this provider.
	pub fn vm_path_info(&self) -> &'static str {
		match self {
			Provider::Qemu => "path to the QMP monitor socket of the virtual machine, absolute or relative to --host",
		}
	}
}

/// How to reach the virtualization host.
#[derive(Args, Clone, Debug, Default)]
pub struct HostConfig {
	/// Virtualization product to talk to
	#[clap(long, value_enum, default_value_t, env("VMPOWER_PROVIDER"))]
	pub provider: Provider,
	/// Host address; for QEMU, the directory relative socket paths resolve against
	#[clap(long, env("VMPOWER_HOST"))]
	pub host: Option<String>,
	#[clap(long, default_value_t = 0, env("VMPOWER_PORT"))]
	pub port: u16,
	#[clap(long, env("VMPOWER_USERNAME"))]
	pub username: Option<String>,
	#[clap(long, env("VMPOWER_PASSWORD"), hide_env_values = true)]
	pub password: Option<String>,
	/// Wait for the virtual machine's control socket to appear
	#[clap(long)]
	pub wait: bool,
	/// Give up waiting for the control socket after this many seconds
	#[clap(long = "socket-timeout", requires = "wait")]
	pub socket_timeout_seconds: Option<u64>,
}

impl HostConfig {
	/// `None` when not waiting at all, `Some(None)` to wait indefinitely.
	pub fn socket_wait(&self) -> Option<Option<Duration>> {
		match self.wait {
			true => Some(self.socket_timeout_seconds.map(Duration::from_secs)),
			false => None,
		}
	}

	/// Resolve a datastore-relative path against the configured host directory.
	pub fn resolve(&self, path: &str) -> PathBuf {
		let path = Path::new(path);
		match &self.host {
			Some(host) if !host.is_empty() && path.is_relative() => Path::new(host).join(path),
			_ => path.to_owned(),
		}
	}
}

/// Knobs for the power commands themselves.
#[derive(Args, Clone, Debug)]
pub struct RunOptions {
	/// Show the product's user interface when powering on
	#[clap(long, env("VMPOWER_LAUNCH_GUI"), default_value_t = true, action = ArgAction::Set)]
	pub launch_gui: bool,
	/// Milliseconds between power state probes while starting
	#[clap(long = "poll-interval", default_value_t = 1000)]
	pub poll_interval_ms: u64,
	/// Milliseconds to wait after powering on before the first probe
	#[clap(long = "startup-wait", default_value_t = 0)]
	pub startup_wait_ms: u64,
	/// Give up waiting for a started machine to report running after this many seconds
	#[clap(long = "start-timeout")]
	pub start_timeout_seconds: Option<u64>,
}

impl Default for RunOptions {
	fn default() -> Self {
		RunOptions {
			launch_gui: true,
			poll_interval_ms: 1000,
			startup_wait_ms: 0,
			start_timeout_seconds: None,
		}
	}
}

impl RunOptions {
	pub fn power_on_options(&self) -> PowerOpOptions {
		PowerOpOptions { launch_gui: self.launch_gui }
	}

	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}

	pub fn startup_wait(&self) -> Duration {
		Duration::from_millis(self.startup_wait_ms)
	}

	pub fn start_timeout(&self) -> Option<Duration> {
		self.start_timeout_seconds.map(Duration::from_secs)
	}
}
