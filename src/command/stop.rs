use crate::error::{Error, Operation, Result};
use crate::host::VirtualMachine;
use crate::power::PowerOpOptions;

/// Request a normal power-off, which lets the guest shut itself down.
pub async fn stop<V: VirtualMachine>(vm: &V) -> Result<()> {
	vm.power_off(PowerOpOptions::NORMAL).await
		.map_err(Error::operation(Operation::Stop))?;
	log::info!("Stopped virtual machine");
	Ok(())
}

pub async fn suspend<V: VirtualMachine>(vm: &V) -> Result<()> {
	vm.suspend(PowerOpOptions::NORMAL).await
		.map_err(Error::operation(Operation::Suspend))?;
	log::info!("Suspended virtual machine");
	Ok(())
}
