use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use snafu::ResultExt;

use crate::{
	client::{MessagingClient, ReactedMessage},
	config::MainConfig,
	error::{self, Error},
	types::Result,
};

#[derive(Debug, Deserialize)]
struct SlackReply {
	ok: bool,
	error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReactionsGetReply {
	message: Option<SlackMessage>,
}

#[derive(Debug, Deserialize)]
struct SlackMessage {
	#[serde(default)]
	text: String,
	permalink: Option<String>,
	#[serde(default)]
	reactions: Vec<SlackReaction>,
}

#[derive(Debug, Deserialize)]
struct SlackReaction {
	name: String,
}

#[derive(Debug, Deserialize)]
struct ConversationsInfoReply {
	channel: SlackChannel,
}

#[derive(Debug, Deserialize)]
struct SlackChannel {
	name: Option<String>,
}

/// Slack Web API client authenticated with a bot token.
pub struct SlackClient {
	client: crate::http::Client,
	slack_api_url: String,
}

impl SlackClient {
	pub fn new(config: &MainConfig) -> Result<Self> {
		let client = crate::http::Client::new(
			config.slack_api_token.clone(),
			"application/json",
			config.http_timeout,
		)?;

		Ok(Self {
			client,
			slack_api_url: config.slack_api_url.trim_end_matches('/').to_string(),
		})
	}

	fn method_url(&self, method: &str) -> String {
		format!("{}/{}", self.slack_api_url, method)
	}

	/// Slack reports failures in the body of a 200 response.
	fn decode<T: DeserializeOwned>(
		method: &str,
		value: serde_json::Value,
	) -> Result<T> {
		let reply = serde_json::from_value::<SlackReply>(value.clone())
			.context(error::Json)?;
		if !reply.ok {
			return Err(Error::SlackApi {
				method: method.to_string(),
				error: reply
					.error
					.unwrap_or_else(|| "unknown_error".to_string()),
			});
		}
		serde_json::from_value::<T>(value).context(error::Json)
	}

	async fn call_get<T: DeserializeOwned>(
		&self,
		method: &str,
		query: &[(&str, &str)],
	) -> Result<T> {
		let query = query
			.iter()
			.map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
			.collect::<Vec<_>>()
			.join("&");
		let url = format!("{}?{}", self.method_url(method), query);
		let value = self.client.get::<String, serde_json::Value>(url).await?;
		Self::decode(method, value)
	}

	async fn call_post<T: DeserializeOwned>(
		&self,
		method: &str,
		body: &serde_json::Value,
	) -> Result<T> {
		let value = self
			.client
			.post::<String, _, serde_json::Value>(self.method_url(method), body)
			.await?;
		Self::decode(method, value)
	}
}

#[async_trait]
impl MessagingClient for SlackClient {
	async fn get_reactions(
		&self,
		channel: &str,
		ts: &str,
	) -> Result<ReactedMessage> {
		let reply = self
			.call_get::<ReactionsGetReply>(
				"reactions.get",
				&[("channel", channel), ("timestamp", ts), ("full", "true")],
			)
			.await?;
		let message = reply.message.ok_or_else(|| Error::MissingField {
			field: "reactions.get message".to_string(),
		})?;

		Ok(ReactedMessage {
			text: message.text,
			permalink: message.permalink,
			reactions: message
				.reactions
				.into_iter()
				.map(|reaction| reaction.name)
				.collect(),
		})
	}

	async fn add_reaction(
		&self,
		name: &str,
		channel: &str,
		ts: &str,
	) -> Result<()> {
		let body = serde_json::json!({
			"channel": channel,
			"timestamp": ts,
			"name": name,
		});
		match self.call_post::<SlackReply>("reactions.add", &body).await {
			Ok(_) => Ok(()),
			Err(Error::SlackApi { ref error, .. })
				if error == "already_reacted" =>
			{
				log::info!("{} already on {} {}", name, channel, ts);
				Ok(())
			}
			Err(err) => Err(err),
		}
	}

	async fn post_message(
		&self,
		channel: &str,
		text: &str,
		thread_ts: Option<&str>,
	) -> Result<()> {
		let mut body = serde_json::json!({
			"channel": channel,
			"text": text,
		});
		if let Some(thread_ts) = thread_ts {
			body["thread_ts"] = serde_json::Value::String(thread_ts.to_string());
		}
		self.call_post::<SlackReply>("chat.postMessage", &body)
			.await
			.map(|_| ())
	}

	async fn resolve_channel_name(
		&self,
		channel_id: &str,
	) -> Result<Option<String>> {
		match self
			.call_get::<ConversationsInfoReply>(
				"conversations.info",
				&[("channel", channel_id)],
			)
			.await
		{
			Ok(reply) => Ok(reply.channel.name),
			Err(Error::SlackApi { ref error, .. })
				if error == "channel_not_found" =>
			{
				Ok(None)
			}
			Err(err) => Err(err),
		}
	}
}
