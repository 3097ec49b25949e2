//! The virtualization control API, as seen by the power commands.
//!
//! Each request is modelled as an `async fn`; awaiting it is the blocking wait for the job.

use crate::error::ApiError;
use crate::power::{PowerOpOptions, PowerState};

/// An open session to a virtualization host.
#[allow(async_fn_in_trait)]
pub trait Host {
	type Vm: VirtualMachine;

	/// Resolve a virtual machine by the path of its configuration (or control socket).
	async fn open(&self, path: &str) -> Result<Self::Vm, ApiError>;

	async fn disconnect(self);
}

/// A handle to one virtual machine, valid until released.
#[allow(async_fn_in_trait)]
pub trait VirtualMachine {
	async fn power_state(&self) -> Result<PowerState, ApiError>;

	async fn power_on(&self, options: PowerOpOptions) -> Result<(), ApiError>;

	async fn power_off(&self, options: PowerOpOptions) -> Result<(), ApiError>;

	async fn suspend(&self, options: PowerOpOptions) -> Result<(), ApiError>;

	async fn release(self);
}
