// GKE stands for Google Kubernetes Engine; its log agent parses one JSON
// object per line and reads the level from `severity`.

use std::io::{self, Write};

use env_logger::fmt::Formatter;
use log::Record;
use serde::Serialize;

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
enum Severity {
	Error,
	Warning,
	Info,
	Debug,
}

impl From<log::Level> for Severity {
	fn from(level: log::Level) -> Self {
		match level {
			log::Level::Error => Severity::Error,
			log::Level::Warn => Severity::Warning,
			log::Level::Info => Severity::Info,
			log::Level::Debug | log::Level::Trace => Severity::Debug,
		}
	}
}

#[derive(Serialize)]
struct Log<'a> {
	severity: Severity,
	message: String,
	target: &'a str,
	timestamp: chrono::DateTime<chrono::Utc>,
}

fn render(record: &Record) -> String {
	serde_json::to_string(&Log {
		severity: record.level().into(),
		message: format!("{}", record.args()),
		target: record.target(),
		timestamp: chrono::Utc::now(),
	})
	.unwrap_or_else(|_| format!("ERROR: Unable to serialize {}", record.args()))
}

pub fn format(fmt: &mut Formatter, record: &Record) -> io::Result<()> {
	writeln!(fmt, "{}", render(record))
}
