use futures::Future;
use futures::future::{self, Either};
use tokio::time::{Duration, timeout};
use std::path::Path;
use std::{io, fs};

pub mod command;
pub mod config;
pub mod error;
pub mod host;
pub mod power;
pub mod qemu;
pub mod timestamp;

#[cfg(test)]
pub(crate) mod mock;

pub use command::Command;
pub use config::{HostConfig, Provider, RunOptions};
pub use error::{ApiError, Error, Operation, Result};
pub use host::{Host, VirtualMachine};
pub use power::{PowerOpOptions, PowerState};

/// Open `path` on an already connected `host`, run `command` against it, then release everything.
///
/// The VM handle and the session are given back on every path, including failures and
/// `interrupt` completing while the machine is being opened or the command is in flight.
pub async fn run_on<H: Host, I: Future<Output=()>>(host: H, path: &str, command: Command, options: &RunOptions, interrupt: I) -> Result<()> {
	futures::pin_mut!(interrupt);
	let res = match interruptible(host.open(path), interrupt.as_mut()).await {
		None => Err(Error::Interrupted),
		Some(Err(source)) => Err(Error::Resolution {
			path: path.into(),
			source,
		}),
		Some(Ok(vm)) => {
			let res = interruptible(command.run(&vm, path, options), interrupt.as_mut()).await
				.unwrap_or(Err(Error::Interrupted));
			vm.release().await;
			res
		},
	};
	host.disconnect().await;
	res
}

/// Connect to the host described by `config` and run `command` against the machine at `path`.
pub async fn run<I: Future<Output=()>>(config: &HostConfig, path: &str, command: Command, options: &RunOptions, interrupt: I) -> Result<()> {
	match config.provider {
		Provider::Qemu => {
			let host = qemu::QemuHost::connect(config).await
				.map_err(Error::Connection)?;
			run_on(host, path, command, options, interrupt).await
		},
	}
}

/// `None` if `interrupt` finished first; `future` is dropped unfinished in that case.
async fn interruptible<F: Future, I: Future<Output=()> + Unpin>(future: F, interrupt: I) -> Option<F::Output> {
	futures::pin_mut!(future);
	match future::select(future, interrupt).await {
		Either::Left((output, _)) => Some(output),
		Either::Right(((), _)) => None,
	}
}

pub async fn wait<O, E, F: Future<Output=std::result::Result<O, E>>>(duration: Option<Duration>, future: F) -> std::result::Result<O, ApiError> where
	E: Into<ApiError>
{
	match duration {
		None => future.await.map_err(Into::into),
		Some(duration) => match timeout(duration, future).await {
			Err(_elapsed) => Err(ApiError::timed_out()),
			Ok(res) => res.map_err(Into::into),
		}
	}
}

pub async fn wait_for_socket(socket: &Path) -> io::Result<()> {
	use futures::StreamExt;
	use inotify::{
		EventMask,
		WatchMask,
		Inotify,
	};

	match fs::metadata(socket) {
		Err(e) if e.kind() == io::ErrorKind::NotFound => (),
		Err(e) => return Err(e),
		Ok(_) => return Ok(()),
	}

	let (parent, file_name) = socket.parent()
		.map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
		.and_then(|p| socket.file_name().map(|n| (p, n)))
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, format!("socket path {} could not be parsed", socket.display())))?;

	let mut inotify = Inotify::init()?;
	inotify.add_watch(parent, WatchMask::CREATE)?;

	// it may have shown up between the first check and the watch being added
	if fs::metadata(socket).is_ok() {
		return Ok(())
	}

	let mut buffer = [0u8; 4096];
	let mut events = inotify.event_stream(&mut buffer)?;

	while let Some(event) = events.next().await {
		let event = event?;
		if event.mask.contains(EventMask::CREATE) {
			if event.name.as_ref().map(|n| &n[..]) == Some(file_name) {
				return Ok(())
			} else {
				log::trace!("ignoring inotify event for {:?}", event);
			}
		} else {
			log::warn!("unexpected inotify event {:?}", event);
		}
	}

	Err(io::Error::new(io::ErrorKind::UnexpectedEof, "inotify ran out of events"))
}
