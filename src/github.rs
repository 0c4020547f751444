use async_trait::async_trait;
use serde::Deserialize;

use crate::{
	client::IssueTrackerClient, config::MainConfig, issue::NewIssue,
	types::Result,
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
	pub number: i64,
	pub html_url: String,
}

pub struct GithubClient {
	client: crate::http::Client,
	github_api_url: String,
}

impl GithubClient {
	pub fn new(config: &MainConfig) -> Result<Self> {
		let client = crate::http::Client::new(
			config.github_api_token.clone(),
			"application/vnd.github.v3+json",
			config.http_timeout,
		)?;

		Ok(Self {
			client,
			github_api_url: config
				.github_api_url
				.trim_end_matches('/')
				.to_string(),
		})
	}

	pub async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue> {
		let url = format!(
			"{}/repos/{}/{}/issues",
			self.github_api_url, issue.repository.owner, issue.repository.name
		);
		self.client.post(url, issue).await
	}
}

#[async_trait]
impl IssueTrackerClient for GithubClient {
	async fn file_issue(&self, issue: &NewIssue) -> Result<String> {
		let created = self.create_issue(issue).await?;
		log::info!(
			"Created {}#{} at {}",
			issue.repository,
			created.number,
			created.html_url
		);
		Ok(created.html_url)
	}
}
