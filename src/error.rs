use snafu::{Backtrace, Snafu};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
	/// An error occurred while sending or receiving a HTTP request or response
	/// respectively.
	#[snafu(display("Source: {}\nBacktrace:\n{}", source, backtrace))]
	Http {
		source: reqwest::Error,
		backtrace: Backtrace,
	},

	/// An error occurred while parsing or serializing JSON.
	#[snafu(display("Source: {}", source))]
	Json { source: serde_json::Error },

	/// An integration service answered with a non-success status.
	#[snafu(display("Status code: {}\nBody:\n{:#?}", status, body))]
	Response {
		status: reqwest::StatusCode,
		body: serde_json::Value,
	},

	/// Slack answered `"ok": false`.
	#[snafu(display("Slack API method {} failed: {}", method, error))]
	SlackApi { method: String, error: String },

	/// A field we rely on was absent from an API response.
	#[snafu(display("Missing field {}", field))]
	MissingField { field: String },

	/// The rules configuration was rejected during validation.
	#[snafu(display("Invalid configuration:\n{}", msg))]
	ConfigInvalid { msg: String },

	#[snafu(display("Missing environment variable {}: {}", name, source))]
	MissingEnv { name: String, source: dotenv::Error },

	#[snafu(display("Failed to read {}: {}", path, source))]
	ReadConfig {
		path: String,
		source: std::io::Error,
	},

	#[snafu(display("Source: {}", source))]
	Yaml { source: serde_yaml::Error },

	/// An error occurred while receiving a webhook request.
	#[snafu(display("Source: {}", source))]
	Hyper { source: hyper::Error },

	#[snafu(display("{}", msg))]
	Message { msg: String },
}
