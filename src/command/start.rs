use tokio::time::{sleep, timeout};
use crate::config::RunOptions;
use crate::error::{Error, Operation, Result};
use crate::host::VirtualMachine;
use crate::power::PowerState;

/// Power on unless already running, then poll until the machine reports powered-on.
pub async fn start<V: VirtualMachine>(vm: &V, options: &RunOptions) -> Result<()> {
	let state = vm.power_state().await
		.map_err(Error::StatusQuery)?;
	if state.is_powered_on() {
		log::info!("Virtual machine already running");
	} else {
		let power_options = options.power_on_options();
		log::debug!("powering on from {} with {:?}", state, power_options);
		vm.power_on(power_options).await
			.map_err(Error::operation(Operation::Start))?;
	}

	sleep(options.startup_wait()).await;

	let state = match options.start_timeout() {
		None => wait_until_running(vm, options).await?,
		Some(limit) => match timeout(limit, wait_until_running(vm, options)).await {
			Err(_elapsed) => return Err(Error::Timeout(limit)),
			Ok(res) => res?,
		},
	};
	log::debug!("started, power state {:?}", state);
	Ok(())
}

async fn wait_until_running<V: VirtualMachine>(vm: &V, options: &RunOptions) -> Result<PowerState> {
	loop {
		let state = vm.power_state().await
			.map_err(Error::StatusQuery)?;
		if state.is_powered_on() {
			log::info!("Virtual machine running");
			break Ok(state)
		} else if state.is_powered_off() {
			log::info!("Virtual machine powered off, waiting for it to come up");
		} else {
			log::info!("Virtual machine in transition state [{}]", state.bits());
		}
		sleep(options.poll_interval()).await;
	}
}
