use std::collections::HashSet;

use serde::Deserialize;

use crate::{event::ReactionEvent, issue::Repository};

/// A rule as written in the rules file, before validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSettings {
	pub reaction_name: String,
	#[serde(default)]
	pub channel_names: Option<Vec<String>>,
	pub github_repository: String,
	#[serde(default)]
	pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
	pub reaction_name: String,
	/// `None` matches every channel.
	pub channel_names: Option<HashSet<String>>,
	pub github_repository: Repository,
	pub labels: Vec<String>,
}

impl Rule {
	/// Validates a raw rule, returning every problem found with it.
	pub fn from_settings(settings: RuleSettings) -> Result<Self, Vec<String>> {
		let RuleSettings {
			reaction_name,
			channel_names,
			github_repository,
			labels,
		} = settings;
		let mut errors = vec![];

		let reaction_name = reaction_name.trim().trim_matches(':').to_string();
		if reaction_name.is_empty() {
			errors.push("reaction_name must not be empty".to_string());
		}

		let channel_names = match channel_names {
			Some(names) if names.is_empty() => {
				errors.push(
					"channel_names must list at least one channel when present"
						.to_string(),
				);
				None
			}
			Some(names) => {
				let names = names
					.into_iter()
					.map(|name| name.trim().trim_start_matches('#').to_string())
					.collect::<HashSet<_>>();
				if names.iter().any(String::is_empty) {
					errors.push(
						"channel_names must not contain empty names".to_string(),
					);
				}
				Some(names)
			}
			None => None,
		};

		let github_repository = github_repository
			.parse::<Repository>()
			.map_err(|err| errors.push(err))
			.ok();

		if labels.iter().any(|label| label.trim().is_empty()) {
			errors.push("labels must not contain empty names".to_string());
		}

		match github_repository {
			Some(github_repository) if errors.is_empty() => Ok(Self {
				reaction_name,
				channel_names,
				github_repository,
				labels,
			}),
			_ => Err(errors),
		}
	}

	/// Whether `event` is actionable under this rule. `resolve_channel` maps
	/// the event's channel id to a channel name and is only consulted when
	/// this rule is restricted to specific channels.
	pub fn matches<F>(&self, event: &ReactionEvent, resolve_channel: F) -> bool
	where
		F: FnOnce(&str) -> Option<String>,
	{
		if event.reaction != self.reaction_name {
			return false;
		}

		match &self.channel_names {
			None => true,
			Some(channel_names) => resolve_channel(&event.item.channel)
				.map(|name| channel_names.contains(&name))
				.unwrap_or(false),
		}
	}
}
