use std::{path::Path, time::Duration};

use serde::Deserialize;
use snafu::ResultExt;

use crate::{
	constants::*,
	error,
	rule::{Rule, RuleSettings},
	types::Result,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
	Text,
	/// One JSON object per line, as understood by GKE log ingestion.
	Json,
}

#[derive(Debug, Clone)]
pub struct MainConfig {
	pub slack_api_url: String,
	pub slack_api_token: String,
	pub slack_signing_secret: String,
	pub github_api_url: String,
	pub github_api_token: String,
	pub rules_config_path: String,
	pub webhook_port: u16,
	pub http_timeout: Duration,
	pub log_format: LogFormat,
}

fn required_var(name: &str) -> Result<String> {
	dotenv::var(name).context(error::MissingEnv { name })
}

fn parsed_var_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
	match dotenv::var(name) {
		Ok(value) => value.trim().parse::<T>().map_err(|_| {
			error::Error::ConfigInvalid {
				msg: format!("failed parsing {}: {:?}", name, value),
			}
		}),
		Err(_) => Ok(default),
	}
}

impl MainConfig {
	pub fn from_env() -> Result<Self> {
		dotenv::dotenv().ok();

		let slack_api_url = dotenv::var("SLACK_API_URL")
			.unwrap_or_else(|_| DEFAULT_SLACK_API_URL.to_string());
		let slack_api_token = required_var("SLACK_API_TOKEN")?;
		let slack_signing_secret = required_var("SLACK_SIGNING_SECRET")?;
		let github_api_url = dotenv::var("GITHUB_API_URL")
			.unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string());
		let github_api_token = required_var("GITHUB_API_TOKEN")?;
		let rules_config_path = required_var("RULES_CONFIG_PATH")?;
		let webhook_port =
			parsed_var_or("WEBHOOK_PORT", DEFAULT_WEBHOOK_PORT)?;
		let http_timeout = Duration::from_secs(parsed_var_or(
			"HTTP_TIMEOUT_SECS",
			DEFAULT_HTTP_TIMEOUT_SECS,
		)?);
		let log_format = match dotenv::var("LOG_FORMAT").as_deref() {
			Ok("json") => LogFormat::Json,
			_ => LogFormat::Text,
		};

		Ok(Self {
			slack_api_url,
			slack_api_token,
			slack_signing_secret,
			github_api_url,
			github_api_token,
			rules_config_path,
			webhook_port,
			http_timeout,
			log_format,
		})
	}
}

/// The rules file as written, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
	pub success_reaction: String,
	pub rules: Vec<RuleSettings>,
}

/// Validated rules in the order they are tried.
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
	pub success_reaction: String,
	pub rules: Vec<Rule>,
}

impl BotConfig {
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let contents =
			std::fs::read_to_string(path).context(error::ReadConfig {
				path: path.display().to_string(),
			})?;
		Self::from_yaml_str(&contents)
	}

	pub fn from_yaml_str(contents: &str) -> Result<Self> {
		let settings =
			serde_yaml::from_str::<Settings>(contents).context(error::Yaml)?;
		Self::validate(settings)
	}

	/// Checks every rule and reports all problems at once.
	pub fn validate(settings: Settings) -> Result<Self> {
		let Settings {
			success_reaction,
			rules: rule_settings,
		} = settings;
		let mut errors = vec![];

		let success_reaction =
			success_reaction.trim().trim_matches(':').to_string();
		if success_reaction.is_empty() {
			errors.push("success_reaction must not be empty".to_string());
		}
		if rule_settings.is_empty() {
			errors.push("at least one rule must be configured".to_string());
		}

		let mut rules = vec![];
		for (index, settings) in rule_settings.into_iter().enumerate() {
			match Rule::from_settings(settings) {
				Ok(rule) => {
					// The bot adds the success reaction itself, so such a rule
					// would fire on every issue it files.
					if rule.reaction_name == success_reaction {
						errors.push(format!(
							"rules[{}]: reaction_name must differ from success_reaction",
							index
						));
					}
					rules.push(rule);
				}
				Err(rule_errors) => errors.extend(
					rule_errors
						.into_iter()
						.map(|err| format!("rules[{}]: {}", index, err)),
				),
			}
		}

		if errors.is_empty() {
			Ok(Self {
				success_reaction,
				rules,
			})
		} else {
			error::ConfigInvalid {
				msg: errors.join("\n"),
			}
			.fail()
		}
	}
}
