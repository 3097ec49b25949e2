use crate::error::{Error, Result};
use crate::host::VirtualMachine;
use crate::power::PowerState;

/// Probe once and report; never asks for a state change.
pub async fn status<V: VirtualMachine>(vm: &V, path: &str) -> Result<PowerState> {
	log::info!("Checking status for \"{}\"", path);
	let state = vm.power_state().await
		.map_err(Error::StatusQuery)?;
	log::debug!("power state {:?}", state);
	match state.is_powered_on() {
		true => log::info!("Virtual machine is powered on"),
		false => log::info!("Virtual machine is powered off"),
	}
	Ok(state)
}

#[cfg(test)]
mod tests {
	use crate::error::ApiError;
	use crate::mock::{Call, MockHost, capture_logs};
	use super::*;

	#[tokio::test]
	async fn only_queries() {
		let logs = capture_logs();
		let vm = MockHost::new().with_states([PowerState::POWERED_ON | PowerState::TOOLS_RUNNING]).into_vm();
		let calls = vm.calls();
		let state = status(&vm, "C:\\vm\\test.vmx").await.unwrap();
		assert!(state.is_powered_on());
		assert_eq!(calls.take(), vec![Call::PowerState]);
		assert_eq!(logs.lines(), [
			"Checking status for \"C:\\vm\\test.vmx\"",
			"Virtual machine is powered on",
		]);
	}

	#[tokio::test]
	async fn powered_off_is_reported() {
		let logs = capture_logs();
		let vm = MockHost::new().with_states([PowerState::POWERED_OFF]).into_vm();
		status(&vm, "test.vmx").await.unwrap();
		assert!(logs.contains("Virtual machine is powered off"));
		assert!(!logs.contains("Virtual machine is powered on"));
	}

	#[tokio::test]
	async fn transitional_state_reads_as_off() {
		let logs = capture_logs();
		let vm = MockHost::new().with_states([PowerState::SUSPENDING]).into_vm();
		let state = status(&vm, "test.vmx").await.unwrap();
		assert!(!state.is_powered_on());
		assert!(logs.contains("Virtual machine is powered off"));
	}

	#[tokio::test]
	async fn query_failure_is_reported() {
		let vm = MockHost::new().fail_status(ApiError::new(3, "gone")).into_vm();
		let err = status(&vm, "test.vmx").await.unwrap_err();
		assert_eq!(err.to_string(), "Failed to get virtual machine status [3]");
	}
}
