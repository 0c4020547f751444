//! In-memory collaborators recording every call in order.

use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
	time::Duration,
};

use async_trait::async_trait;

use crate::{
	client::{IssueTrackerClient, MessagingClient, ReactedMessage},
	error::Error,
	issue::NewIssue,
	types::Result,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
	GetReactions(String, String),
	AddReaction(String, String, String),
	PostMessage(String, String, Option<String>),
	ResolveChannel(String),
	FileIssue(String, String),
}

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
	fn push(&self, call: Call) {
		self.0.lock().unwrap().push(call);
	}

	pub fn take(&self) -> Vec<Call> {
		std::mem::take(&mut *self.0.lock().unwrap())
	}

	/// Waits up to two seconds for `count` calls from a spawned task, then
	/// takes whatever was recorded.
	pub async fn wait_for(&self, count: usize) -> Vec<Call> {
		for _ in 0..200 {
			if self.0.lock().unwrap().len() >= count {
				break;
			}
			tokio::time::sleep(Duration::from_millis(10)).await;
		}
		// Let a straggling call show up as a failure rather than be missed.
		tokio::time::sleep(Duration::from_millis(20)).await;
		self.take()
	}
}

pub struct FakeMessaging {
	calls: CallLog,
	reactions: Mutex<Vec<String>>,
	channel_names: Mutex<HashMap<String, String>>,
	failing: Mutex<Option<&'static str>>,
}

impl FakeMessaging {
	pub fn with_tracker() -> (Arc<FakeMessaging>, Arc<FakeIssueTracker>, CallLog)
	{
		let calls = CallLog::default();
		let messaging = FakeMessaging {
			calls: calls.clone(),
			reactions: Mutex::new(vec![]),
			channel_names: Mutex::new(HashMap::new()),
			failing: Mutex::new(None),
		};
		let tracker = FakeIssueTracker {
			calls: calls.clone(),
			failing: Mutex::new(false),
			delay: Mutex::new(None),
		};
		(Arc::new(messaging), Arc::new(tracker), calls)
	}

	pub fn set_reactions(&self, reactions: &[&str]) {
		*self.reactions.lock().unwrap() =
			reactions.iter().map(|r| r.to_string()).collect();
	}

	pub fn set_channel_name(&self, id: &str, name: &str) {
		self.channel_names
			.lock()
			.unwrap()
			.insert(id.to_string(), name.to_string());
	}

	pub fn fail_on(&self, method: &'static str) {
		*self.failing.lock().unwrap() = Some(method);
	}

	fn check(&self, method: &str) -> Result<()> {
		if *self.failing.lock().unwrap() == Some(method) {
			Err(Error::SlackApi {
				method: method.to_string(),
				error: "fatal_error".to_string(),
			})
		} else {
			Ok(())
		}
	}
}

#[async_trait]
impl MessagingClient for FakeMessaging {
	async fn get_reactions(
		&self,
		channel: &str,
		ts: &str,
	) -> Result<ReactedMessage> {
		self.calls
			.push(Call::GetReactions(channel.to_string(), ts.to_string()));
		self.check("get_reactions")?;
		Ok(ReactedMessage {
			text: "Hello".to_string(),
			permalink: None,
			reactions: self.reactions.lock().unwrap().clone(),
		})
	}

	async fn add_reaction(
		&self,
		name: &str,
		channel: &str,
		ts: &str,
	) -> Result<()> {
		self.calls.push(Call::AddReaction(
			name.to_string(),
			channel.to_string(),
			ts.to_string(),
		));
		self.check("add_reaction")?;
		self.reactions.lock().unwrap().push(name.to_string());
		Ok(())
	}

	async fn post_message(
		&self,
		channel: &str,
		text: &str,
		thread_ts: Option<&str>,
	) -> Result<()> {
		self.calls.push(Call::PostMessage(
			channel.to_string(),
			text.to_string(),
			thread_ts.map(str::to_string),
		));
		self.check("post_message")
	}

	async fn resolve_channel_name(
		&self,
		channel_id: &str,
	) -> Result<Option<String>> {
		self.calls.push(Call::ResolveChannel(channel_id.to_string()));
		self.check("resolve_channel_name")?;
		Ok(self.channel_names.lock().unwrap().get(channel_id).cloned())
	}
}

pub struct FakeIssueTracker {
	calls: CallLog,
	failing: Mutex<bool>,
	delay: Mutex<Option<Duration>>,
}

impl FakeIssueTracker {
	pub fn fail(&self) {
		*self.failing.lock().unwrap() = true;
	}

	/// Makes `file_issue` take `delay` before answering.
	pub fn set_delay(&self, delay: Duration) {
		*self.delay.lock().unwrap() = Some(delay);
	}
}

#[async_trait]
impl IssueTrackerClient for FakeIssueTracker {
	async fn file_issue(&self, issue: &NewIssue) -> Result<String> {
		self.calls.push(Call::FileIssue(
			issue.repository.to_string(),
			issue.title.clone(),
		));
		let delay = *self.delay.lock().unwrap();
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}
		if *self.failing.lock().unwrap() {
			return Err(Error::Response {
				status: reqwest::StatusCode::UNPROCESSABLE_ENTITY,
				body: serde_json::json!({ "message": "Validation Failed" }),
			});
		}
		Ok(format!("https://github.com/{}/issues/1", issue.repository))
	}
}
