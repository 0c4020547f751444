use crate::config::LogFormat;

pub mod gke;

/// Installs the global logger. `RUST_LOG` overrides the default `info` level.
pub fn init(format: LogFormat) {
	let mut builder =
		env_logger::from_env(env_logger::Env::default().default_filter_or("info"));
	if format == LogFormat::Json {
		builder.format(gke::format);
	}
	builder.init();
}
