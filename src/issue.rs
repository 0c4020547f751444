use std::{fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::{
	client::ReactedMessage, constants::MAX_ISSUE_TITLE_CHARS,
	event::ReactionEvent,
};

lazy_static! {
	static ref REPOSITORY_REGEX: Regex =
		Regex::new(r"^(?P<owner>[[:alnum:]_.-]+)/(?P<name>[[:alnum:]_.-]+)$")
			.unwrap();
}

/// An `owner/name` pair identifying where issues get filed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
	pub owner: String,
	pub name: String,
}

impl FromStr for Repository {
	type Err = String;

	fn from_str(full_name: &str) -> Result<Self, Self::Err> {
		REPOSITORY_REGEX
			.captures(full_name.trim())
			.map(|caps| Repository {
				owner: caps["owner"].to_string(),
				name: caps["name"].to_string(),
			})
			.ok_or_else(|| {
				format!(
					"\"{}\" is not a repository in the form owner/name",
					full_name
				)
			})
	}
}

impl fmt::Display for Repository {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}/{}", self.owner, self.name)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIssue {
	#[serde(skip)]
	pub repository: Repository,
	pub title: String,
	pub body: String,
	pub labels: Vec<String>,
}

impl NewIssue {
	pub fn from_reaction(
		repository: &Repository,
		labels: &[String],
		event: &ReactionEvent,
		message: &ReactedMessage,
	) -> Self {
		Self {
			repository: repository.clone(),
			title: issue_title(event, &message.text),
			body: issue_body(event, message),
			labels: labels.to_vec(),
		}
	}
}

fn issue_title(event: &ReactionEvent, text: &str) -> String {
	let first_line = text
		.lines()
		.map(str::trim)
		.find(|line| !line.is_empty());

	match first_line {
		Some(line) if line.chars().count() > MAX_ISSUE_TITLE_CHARS => {
			let truncated = line
				.chars()
				.take(MAX_ISSUE_TITLE_CHARS - 3)
				.collect::<String>();
			format!("{}...", truncated.trim_end())
		}
		Some(line) => line.to_string(),
		None => format!(
			"Slack message {} in channel {}",
			event.item.ts, event.item.channel
		),
	}
}

fn issue_body(event: &ReactionEvent, message: &ReactedMessage) -> String {
	let lines = message.text.lines().collect::<Vec<_>>();
	let blank = |line: &&str| line.trim().is_empty();
	let content = match (
		lines.iter().position(|line| !blank(line)),
		lines.iter().rposition(|line| !blank(line)),
	) {
		(Some(first), Some(last)) => &lines[first..=last],
		_ => &[][..],
	};
	let quoted = content
		.iter()
		.map(|line| {
			if line.trim().is_empty() {
				">".to_string()
			} else {
				format!("> {}", line)
			}
		})
		.collect::<Vec<_>>()
		.join("\n");
	let source = message
		.permalink
		.as_ref()
		.map(|permalink| format!("[this Slack message]({})", permalink))
		.unwrap_or_else(|| {
			format!(
				"Slack message {} in channel {}",
				event.item.ts, event.item.channel
			)
		});

	let footer = format!(
		"Filed because <@{}> reacted with :{}: to {}.",
		event.user, event.reaction, source
	);

	if quoted.is_empty() {
		footer
	} else {
		format!("{}\n\n{}", quoted, footer)
	}
}
