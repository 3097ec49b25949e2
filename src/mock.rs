//! Scripted stand-in for the control API, recording every request made of it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use crate::error::ApiError;
use crate::host::{Host, VirtualMachine};
use crate::power::{PowerOpOptions, PowerState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
	Open(String),
	PowerState,
	PowerOn(PowerOpOptions),
	PowerOff(PowerOpOptions),
	Suspend(PowerOpOptions),
	Release,
	Disconnect,
}

#[derive(Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<Call>>>);

impl Calls {
	fn push(&self, call: Call) {
		self.0.lock().unwrap().push(call)
	}

	pub fn take(&self) -> Vec<Call> {
		std::mem::take(&mut *self.0.lock().unwrap())
	}

	pub fn count(&self, call: &Call) -> usize {
		self.0.lock().unwrap().iter().filter(|&c| c == call).count()
	}
}

#[derive(Default)]
struct Script {
	states: VecDeque<PowerState>,
	open: Option<ApiError>,
	status: Option<ApiError>,
	power_on: Option<ApiError>,
	power_off: Option<ApiError>,
	suspend: Option<ApiError>,
}

#[derive(Default)]
pub struct MockHost {
	calls: Calls,
	script: Script,
}

impl MockHost {
	pub fn new() -> Self {
		Default::default()
	}

	pub fn calls(&self) -> Calls {
		self.calls.clone()
	}

	/// Successive probes return these in order; the last one repeats.
	pub fn with_states<I: IntoIterator<Item=PowerState>>(mut self, states: I) -> Self {
		self.script.states.extend(states);
		self
	}

	pub fn fail_open(mut self, e: ApiError) -> Self {
		self.script.open = Some(e);
		self
	}

	pub fn fail_status(mut self, e: ApiError) -> Self {
		self.script.status = Some(e);
		self
	}

	pub fn fail_power_on(mut self, e: ApiError) -> Self {
		self.script.power_on = Some(e);
		self
	}

	pub fn fail_power_off(mut self, e: ApiError) -> Self {
		self.script.power_off = Some(e);
		self
	}

	pub fn fail_suspend(mut self, e: ApiError) -> Self {
		self.script.suspend = Some(e);
		self
	}

	/// Skip the session and hand out the VM directly.
	pub fn into_vm(self) -> MockVm {
		MockVm {
			calls: self.calls,
			script: Mutex::new(self.script),
		}
	}
}

fn outcome(failure: &Option<ApiError>) -> Result<(), ApiError> {
	match failure {
		Some(e) => Err(e.clone()),
		None => Ok(()),
	}
}

impl Host for MockHost {
	type Vm = MockVm;

	async fn open(&self, path: &str) -> Result<MockVm, ApiError> {
		self.calls.push(Call::Open(path.into()));
		outcome(&self.script.open)?;
		Ok(MockVm {
			calls: self.calls.clone(),
			script: Mutex::new(Script {
				states: self.script.states.clone(),
				open: None,
				status: self.script.status.clone(),
				power_on: self.script.power_on.clone(),
				power_off: self.script.power_off.clone(),
				suspend: self.script.suspend.clone(),
			}),
		})
	}

	async fn disconnect(self) {
		self.calls.push(Call::Disconnect);
	}
}

pub struct MockVm {
	calls: Calls,
	script: Mutex<Script>,
}

impl MockVm {
	pub fn calls(&self) -> Calls {
		self.calls.clone()
	}
}

impl VirtualMachine for MockVm {
	async fn power_state(&self) -> Result<PowerState, ApiError> {
		self.calls.push(Call::PowerState);
		let mut script = self.script.lock().unwrap();
		outcome(&script.status)?;
		let state = match script.states.len() {
			0 => PowerState::POWERED_OFF,
			1 => script.states[0],
			_ => script.states.pop_front().unwrap(),
		};
		Ok(state)
	}

	async fn power_on(&self, options: PowerOpOptions) -> Result<(), ApiError> {
		self.calls.push(Call::PowerOn(options));
		outcome(&self.script.lock().unwrap().power_on)
	}

	async fn power_off(&self, options: PowerOpOptions) -> Result<(), ApiError> {
		self.calls.push(Call::PowerOff(options));
		outcome(&self.script.lock().unwrap().power_off)
	}

	async fn suspend(&self, options: PowerOpOptions) -> Result<(), ApiError> {
		self.calls.push(Call::Suspend(options));
		outcome(&self.script.lock().unwrap().suspend)
	}

	async fn release(self) {
		self.calls.push(Call::Release);
	}
}

thread_local! {
	static CAPTURED: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

/// Collects the messages logged on the current thread, which is where `#[tokio::test]` runs.
struct CaptureLogger;

impl log::Log for CaptureLogger {
	fn enabled(&self, _metadata: &log::Metadata) -> bool {
		true
	}

	fn log(&self, record: &log::Record) {
		if record.level() <= log::Level::Info {
			CAPTURED.with(|lines| lines.borrow_mut().push(record.args().to_string()));
		}
	}

	fn flush(&self) { }
}

static LOGGER: CaptureLogger = CaptureLogger;

pub struct LogCapture(());

/// Start collecting log lines for this thread, discarding anything collected before.
pub fn capture_logs() -> LogCapture {
	if log::set_logger(&LOGGER).is_ok() {
		log::set_max_level(log::LevelFilter::Info);
	}
	CAPTURED.with(|lines| lines.borrow_mut().clear());
	LogCapture(())
}

impl LogCapture {
	pub fn lines(&self) -> Vec<String> {
		CAPTURED.with(|lines| lines.borrow().clone())
	}

	pub fn contains(&self, line: &str) -> bool {
		self.lines().iter().any(|l| l == line)
	}
}
