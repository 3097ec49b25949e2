use chrono::{DateTime, Utc};

/// `strftime` layout of the bracketed prefix on every diagnostic line.
pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format(time: &DateTime<Utc>) -> String {
	time.format(FORMAT).to_string()
}

pub fn now() -> String {
	format(&Utc::now())
}
