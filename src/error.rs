use std::{fmt, io};
use thiserror::Error;

/// Code used when the underlying API gives no number of its own.
pub const UNKNOWN_CODE: i32 = -1;

/// A failure reported by the virtualization control API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (code {code})")]
pub struct ApiError {
	pub code: i32,
	pub message: String,
}

impl ApiError {
	pub fn new<M: Into<String>>(code: i32, message: M) -> Self {
		ApiError {
			code,
			message: message.into(),
		}
	}

	pub fn timed_out() -> Self {
		Self::from(io::Error::from(io::ErrorKind::TimedOut))
	}
}

impl From<io::Error> for ApiError {
	fn from(e: io::Error) -> Self {
		ApiError::new(e.raw_os_error().unwrap_or(UNKNOWN_CODE), e.to_string())
	}
}

impl From<qapi::Error> for ApiError {
	fn from(e: qapi::Error) -> Self {
		// QMP error classes have no numbers on the wire; number them from 1 in declaration order
		ApiError::new(e.class as i32 + 1, e.desc)
	}
}

impl From<qapi::ExecuteError> for ApiError {
	fn from(e: qapi::ExecuteError) -> Self {
		match e {
			qapi::ExecuteError::Qapi(e) => e.into(),
			qapi::ExecuteError::Io(e) => e.into(),
		}
	}
}

/// The power operations that can be requested of a virtual machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
	Start,
	Stop,
	Suspend,
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			Operation::Start => "start",
			Operation::Stop => "stop",
			Operation::Suspend => "suspend",
		})
	}
}

#[derive(Error, Debug)]
pub enum Error {
	#[error("Failed to connect to host [{}]", .0.code)]
	Connection(#[source] ApiError),
	#[error("Failed to open virtual machine [{}]", .source.code)]
	Resolution {
		path: String,
		#[source]
		source: ApiError,
	},
	#[error("Failed to get virtual machine status [{}]", .0.code)]
	StatusQuery(#[source] ApiError),
	#[error("{}", operation_message(.op, .source))]
	Operation {
		op: Operation,
		#[source]
		source: ApiError,
	},
	#[error("Virtual machine did not report running within {0:?}")]
	Timeout(std::time::Duration),
	#[error("Interrupted")]
	Interrupted,
}

fn operation_message(op: &Operation, source: &ApiError) -> String {
	match op {
		Operation::Start => format!("Failed to start virtual machine [{}]", source.code),
		Operation::Stop | Operation::Suspend =>
			format!("Failed to {} virtual machine, may have already been stopped [{}]", op, source.code),
	}
}

impl Error {
	pub fn operation(op: Operation) -> impl FnOnce(ApiError) -> Self {
		move |source| Error::Operation { op, source }
	}

	/// The numeric code reported by the control API, if the failure came from it.
	pub fn api_code(&self) -> Option<i32> {
		match self {
			Error::Connection(e) | Error::StatusQuery(e) => Some(e.code),
			Error::Resolution { source, .. } | Error::Operation { source, .. } => Some(source.code),
			Error::Timeout(_) | Error::Interrupted => None,
		}
	}

	pub fn exit_code(&self) -> i32 {
		match self {
			Error::Interrupted => 130,
			_ => 1,
		}
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
