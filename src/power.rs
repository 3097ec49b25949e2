use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Snapshot of a virtual machine's power state.
///
/// Several flags may be set at once (a suspended guest can still be powered on, for instance);
/// callers test the bits they care about rather than matching a single value.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PowerState(u32);

impl PowerState {
	pub const POWERING_OFF: Self = PowerState(0x0001);
	pub const POWERED_OFF: Self = PowerState(0x0002);
	pub const POWERING_ON: Self = PowerState(0x0004);
	pub const POWERED_ON: Self = PowerState(0x0008);
	pub const SUSPENDING: Self = PowerState(0x0010);
	pub const SUSPENDED: Self = PowerState(0x0020);
	pub const TOOLS_RUNNING: Self = PowerState(0x0040);
	pub const RESETTING: Self = PowerState(0x0080);
	pub const BLOCKED_ON_MSG: Self = PowerState(0x0100);
	pub const PAUSED: Self = PowerState(0x0200);
	pub const RESUMING: Self = PowerState(0x0800);

	const NAMES: &'static [(PowerState, &'static str)] = &[
		(Self::POWERING_OFF, "powering-off"),
		(Self::POWERED_OFF, "powered-off"),
		(Self::POWERING_ON, "powering-on"),
		(Self::POWERED_ON, "powered-on"),
		(Self::SUSPENDING, "suspending"),
		(Self::SUSPENDED, "suspended"),
		(Self::TOOLS_RUNNING, "tools-running"),
		(Self::RESETTING, "resetting"),
		(Self::BLOCKED_ON_MSG, "blocked-on-msg"),
		(Self::PAUSED, "paused"),
		(Self::RESUMING, "resuming"),
	];

	pub const fn empty() -> Self {
		PowerState(0)
	}

	pub const fn from_bits(bits: u32) -> Self {
		PowerState(bits)
	}

	pub const fn bits(self) -> u32 {
		self.0
	}

	pub const fn contains(self, other: Self) -> bool {
		self.0 & other.0 == other.0
	}

	pub const fn is_powered_on(self) -> bool {
		self.contains(Self::POWERED_ON)
	}

	pub const fn is_powered_off(self) -> bool {
		self.contains(Self::POWERED_OFF)
	}
}

impl BitOr for PowerState {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self {
		PowerState(self.0 | rhs.0)
	}
}

impl BitOrAssign for PowerState {
	fn bitor_assign(&mut self, rhs: Self) {
		self.0 |= rhs.0
	}
}

impl fmt::Display for PowerState {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let mut names = Self::NAMES.iter()
			.filter(|&&(flag, _)| self.contains(flag))
			.map(|&(_, name)| name);
		match names.next() {
			None => f.write_str("none"),
			Some(first) => {
				f.write_str(first)?;
				names.try_for_each(|name| write!(f, "|{}", name))
			},
		}
	}
}

impl fmt::Debug for PowerState {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "PowerState({:#x}: {})", self.0, self)
	}
}

/// Options attached to a power-on, power-off or suspend request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PowerOpOptions {
	/// Bring up the product's user interface along with the guest.
	pub launch_gui: bool,
}

impl PowerOpOptions {
	pub const NORMAL: Self = PowerOpOptions { launch_gui: false };
	pub const LAUNCH_GUI: Self = PowerOpOptions { launch_gui: true };
}

impl Default for PowerOpOptions {
	fn default() -> Self {
		Self::LAUNCH_GUI
	}
}
