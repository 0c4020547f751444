use std::sync::Arc;

use crate::{
	client::{IssueTrackerClient, MessagingClient},
	config::BotConfig,
	event::ReactionEvent,
	issue::NewIssue,
	rule::Rule,
	types::Result,
};

/// How an event was dealt with.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
	/// No rule matched; nothing was done.
	NotHandled,
	/// The message already carries the success reaction.
	AlreadyProcessed,
	IssueFiled { issue_url: String },
}

impl Outcome {
	pub fn is_handled(&self) -> bool {
		!matches!(self, Outcome::NotHandled)
	}
}

/// Turns reaction events matching a configured rule into filed issues.
pub struct Middleware {
	config: BotConfig,
	messaging: Arc<dyn MessagingClient>,
	tracker: Arc<dyn IssueTrackerClient>,
}

impl Middleware {
	pub fn new(
		config: BotConfig,
		messaging: Arc<dyn MessagingClient>,
		tracker: Arc<dyn IssueTrackerClient>,
	) -> Self {
		Self {
			config,
			messaging,
			tracker,
		}
	}

	pub fn rules(&self) -> &[Rule] {
		&self.config.rules
	}

	/// Returns the first rule, in configured order, matching `event`.
	///
	/// The channel name is looked up at most once, and only if a rule for
	/// this reaction is restricted to certain channels. A failed lookup
	/// counts as an unknown channel.
	pub async fn find_matching_rule(
		&self,
		event: &ReactionEvent,
	) -> Option<&Rule> {
		if !event.is_message_reaction() {
			return None;
		}

		let needs_channel_name = self.config.rules.iter().any(|rule| {
			rule.reaction_name == event.reaction && rule.channel_names.is_some()
		});
		let channel_name = if needs_channel_name {
			match self
				.messaging
				.resolve_channel_name(&event.item.channel)
				.await
			{
				Ok(name) => name,
				Err(e) => {
					log::warn!(
						"Failed to resolve name of channel {}: {}",
						event.item.channel,
						e
					);
					None
				}
			}
		} else {
			None
		};

		self.config
			.rules
			.iter()
			.find(|rule| rule.matches(event, |_| channel_name.clone()))
	}

	/// Files an issue for `event` if it matches a rule and has not been
	/// handled before. Errors from either service abort the remaining steps.
	pub async fn execute(&self, event: &ReactionEvent) -> Result<Outcome> {
		let rule = match self.find_matching_rule(event).await {
			Some(rule) => rule,
			None => return Ok(Outcome::NotHandled),
		};
		let channel = event.item.channel.as_str();
		let ts = event.item.ts.as_str();
		let success_reaction = self.config.success_reaction.as_str();

		let message = self.messaging.get_reactions(channel, ts).await?;
		if message.has_reaction(success_reaction) {
			log::info!(
				"Message {} in {} already has :{}:, skipping",
				ts,
				channel,
				success_reaction
			);
			return Ok(Outcome::AlreadyProcessed);
		}

		let issue = NewIssue::from_reaction(
			&rule.github_repository,
			&rule.labels,
			event,
			&message,
		);
		let issue_url = self.tracker.file_issue(&issue).await?;

		self.messaging
			.add_reaction(success_reaction, channel, ts)
			.await?;
		self.messaging
			.post_message(channel, &format!("created: {}", issue_url), Some(ts))
			.await?;

		Ok(Outcome::IssueFiled { issue_url })
	}
}
