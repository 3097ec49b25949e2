//! QEMU as a virtualization host, driven over the QMP monitor of each machine.

use qapi::{qmp, Enum};
use tokio::task::JoinHandle;
use tokio::time::{Duration, timeout};
use std::fs;
use crate::config::HostConfig;
use crate::error::{ApiError, UNKNOWN_CODE};
use crate::host::{Host, VirtualMachine};
use crate::power::{PowerOpOptions, PowerState};

pub(crate) type QmpStream = qapi::futures::QapiService<qapi::futures::QmpStreamTokio<tokio::io::WriteHalf<tokio::net::UnixStream>>>;

/// A QEMU "session" only pins down where monitor sockets live; each machine gets its own connection.
#[derive(Debug)]
pub struct QemuHost {
	config: HostConfig,
}

impl QemuHost {
	pub async fn connect(config: &HostConfig) -> Result<Self, ApiError> {
		if config.port != 0 {
			log::debug!("port {} is ignored by the QEMU provider", config.port);
		}
		if config.username.is_some() || config.password.is_some() {
			log::debug!("credentials are ignored by the QEMU provider");
		}
		if let Some(host) = config.host.as_deref().filter(|h| !h.is_empty()) {
			if !fs::metadata(host)?.is_dir() {
				return Err(ApiError::new(UNKNOWN_CODE, format!("{} is not a directory", host)))
			}
		}

		Ok(QemuHost {
			config: config.clone(),
		})
	}
}

impl Host for QemuHost {
	type Vm = QemuVm;

	async fn open(&self, path: &str) -> Result<QemuVm, ApiError> {
		let socket = self.config.resolve(path);
		if let Some(limit) = self.config.socket_wait() {
			log::debug!("waiting for {} to appear", socket.display());
			crate::wait(limit, crate::wait_for_socket(&socket)).await?;
		}

		let stream = qapi::futures::QmpStreamTokio::open_uds(&socket).await?;
		log::trace!("QEMU QMP Capabilities: {:#?}", stream.capabilities);
		let stream = stream.negotiate().await?;
		let (qmp, handle) = stream.spawn_tokio();

		Ok(QemuVm {
			qmp,
			handle,
		})
	}

	async fn disconnect(self) {
		log::trace!("closing QEMU session for {:?}", self.config.host);
	}
}

pub struct QemuVm {
	qmp: QmpStream,
	handle: JoinHandle<()>,
}

impl QemuVm {
	async fn query_status(&self) -> Result<qmp::StatusInfo, ApiError> {
		let status = self.qmp.execute(qmp::query_status { }).await?;
		log::trace!("VCPU Status: {:#?}", status);
		Ok(status)
	}
}

impl VirtualMachine for QemuVm {
	async fn power_state(&self) -> Result<PowerState, ApiError> {
		let status = self.query_status().await?;
		Ok(power_state(status.status.name(), status.running))
	}

	async fn power_on(&self, options: PowerOpOptions) -> Result<(), ApiError> {
		if options.launch_gui {
			log::debug!("QEMU display options are fixed at launch, not showing a UI");
		}
		let status = self.query_status().await?;
		if status.status.name() == "shutdown" {
			self.qmp.execute(qmp::system_reset { }).await?;
		}
		self.qmp.execute(qmp::cont { }).await?;
		Ok(())
	}

	async fn power_off(&self, _options: PowerOpOptions) -> Result<(), ApiError> {
		self.qmp.execute(qmp::system_powerdown { }).await?;
		Ok(())
	}

	async fn suspend(&self, _options: PowerOpOptions) -> Result<(), ApiError> {
		self.qmp.execute(qmp::stop { }).await?;
		Ok(())
	}

	async fn release(self) {
		drop(self.qmp);
		match timeout(Duration::from_secs(1), self.handle).await {
			Err(_elapsed) => log::warn!("timed out waiting for handle to clean up"),
			Ok(Err(e)) => log::warn!("QMP connection task failed: {}", e),
			Ok(Ok(())) => (),
		}
	}
}

/// Translate a QMP `RunState` name into power state flags.
pub fn power_state(status: &str, running: bool) -> PowerState {
	match status {
		"running" | "colo" => PowerState::POWERED_ON,
		"prelaunch" | "shutdown" | "postmigrate" => PowerState::POWERED_OFF,
		// `stop` leaves the machine paused, which is what suspend asks for
		"paused" => PowerState::SUSPENDED,
		"suspended" => PowerState::POWERED_ON | PowerState::SUSPENDED,
		"debug" => PowerState::PAUSED,
		"inmigrate" | "restore-vm" => PowerState::RESUMING,
		"finish-migrate" | "save-vm" => PowerState::SUSPENDING,
		"internal-error" | "io-error" | "guest-panicked" | "watchdog" => PowerState::BLOCKED_ON_MSG,
		_ if running => PowerState::POWERED_ON,
		_ => PowerState::empty(),
	}
}
