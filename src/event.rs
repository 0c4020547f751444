use serde::{Deserialize, Serialize};

/// Outer wrapper of every Slack Events API delivery.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
	UrlVerification {
		challenge: String,
	},
	EventCallback {
		event: serde_json::Value,
		#[serde(default)]
		event_id: Option<String>,
	},
	#[serde(other)]
	Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
	ReactionAdded,
	#[serde(other)]
	Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
	Message,
	File,
	FileComment,
	#[serde(other)]
	Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionItem {
	#[serde(rename = "type")]
	pub type_field: ItemType,
	// Only message items carry these
	#[serde(default)]
	pub channel: String,
	#[serde(default)]
	pub ts: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionEvent {
	#[serde(rename = "type")]
	pub type_field: EventType,
	pub user: String,
	pub item: ReactionItem,
	pub reaction: String,
	pub event_ts: String,
}

impl ReactionEvent {
	/// Whether this is a reaction added to a message we can locate again.
	pub fn is_message_reaction(&self) -> bool {
		self.type_field == EventType::ReactionAdded
			&& self.item.type_field == ItemType::Message
			&& !self.item.channel.is_empty()
			&& !self.item.ts.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_reaction_added_to_message() {
		let event = serde_json::from_str::<ReactionEvent>(
			r#"{
				"type": "reaction_added",
				"user": "U024BE7LH",
				"reaction": "thumbsup",
				"item_user": "U0G9QF9C6",
				"item": {
					"type": "message",
					"channel": "C0G9QF9GZ",
					"ts": "1360782400.498405"
				},
				"event_ts": "1360782804.083113"
			}"#,
		)
		.unwrap();

		assert_eq!(event.type_field, EventType::ReactionAdded);
		assert_eq!(event.item.type_field, ItemType::Message);
		assert_eq!(event.item.channel, "C0G9QF9GZ");
		assert_eq!(event.item.ts, "1360782400.498405");
		assert!(event.is_message_reaction());
	}

	#[test]
	fn file_items_are_not_message_reactions() {
		let event = serde_json::from_str::<ReactionEvent>(
			r#"{
				"type": "reaction_added",
				"user": "U024BE7LH",
				"reaction": "thumbsup",
				"item": { "type": "file", "file": "F0HS27V1Z" },
				"event_ts": "1360782804.083113"
			}"#,
		)
		.unwrap();

		assert_eq!(event.item.type_field, ItemType::File);
		assert!(!event.is_message_reaction());
	}

	#[test]
	fn file_comment_items_are_not_message_reactions() {
		let event = serde_json::from_str::<ReactionEvent>(
			r#"{
				"type": "reaction_added",
				"user": "U024BE7LH",
				"reaction": "thumbsup",
				"item": {
					"type": "file_comment",
					"file_comment": "Fc0HS2KBEZ",
					"file": "F0HS27V1Z"
				},
				"event_ts": "1360782804.083113"
			}"#,
		)
		.unwrap();

		assert_eq!(event.item.type_field, ItemType::FileComment);
		assert!(!event.is_message_reaction());
	}

	#[test]
	fn unknown_types_do_not_fail_parsing() {
		let event = serde_json::from_str::<ReactionEvent>(
			r#"{
				"type": "reaction_removed",
				"user": "U024BE7LH",
				"reaction": "thumbsup",
				"item": { "type": "channel_canvas", "channel": "C1", "ts": "1" },
				"event_ts": "1360782804.083113"
			}"#,
		)
		.unwrap();

		assert_eq!(event.type_field, EventType::Other);
		assert_eq!(event.item.type_field, ItemType::Other);
		assert!(!event.is_message_reaction());
	}

	#[test]
	fn parses_envelopes() {
		let challenge = serde_json::from_str::<Envelope>(
			r#"{"token": "t", "challenge": "abc", "type": "url_verification"}"#,
		)
		.unwrap();
		assert_eq!(
			challenge,
			Envelope::UrlVerification {
				challenge: "abc".to_string()
			}
		);

		let callback = serde_json::from_str::<Envelope>(
			r#"{"type": "event_callback", "event_id": "Ev1", "event": {"type": "reaction_added"}}"#,
		)
		.unwrap();
		assert!(matches!(callback, Envelope::EventCallback { .. }));

		let other = serde_json::from_str::<Envelope>(
			r#"{"type": "app_rate_limited"}"#,
		)
		.unwrap();
		assert_eq!(other, Envelope::Other);
	}
}
