use async_trait::async_trait;

use crate::{issue::NewIssue, types::Result};

/// A chat message as seen when checking its reactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactedMessage {
	pub text: String,
	pub permalink: Option<String>,
	/// Reaction names currently on the message.
	pub reactions: Vec<String>,
}

impl ReactedMessage {
	pub fn has_reaction(&self, name: &str) -> bool {
		self.reactions.iter().any(|reaction| reaction == name)
	}
}

#[async_trait]
pub trait MessagingClient: Send + Sync {
	async fn get_reactions(
		&self,
		channel: &str,
		ts: &str,
	) -> Result<ReactedMessage>;

	async fn add_reaction(
		&self,
		name: &str,
		channel: &str,
		ts: &str,
	) -> Result<()>;

	/// Posts `text` to `channel`, threaded under `thread_ts` when given.
	async fn post_message(
		&self,
		channel: &str,
		text: &str,
		thread_ts: Option<&str>,
	) -> Result<()>;

	/// Looks up the human readable name of a channel id. `None` when the
	/// channel is unknown.
	async fn resolve_channel_name(
		&self,
		channel_id: &str,
	) -> Result<Option<String>>;
}

#[async_trait]
pub trait IssueTrackerClient: Send + Sync {
	/// Files `issue` and returns a link to it.
	async fn file_issue(&self, issue: &NewIssue) -> Result<String>;
}
