use std::{net::SocketAddr, sync::Arc};

use reaction_issue_bot::{
	config::{BotConfig, MainConfig},
	github::GithubClient,
	logging,
	middleware::Middleware,
	server,
	slack::SlackClient,
	webhook::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let config = MainConfig::from_env()?;
	logging::init(config.log_format);

	let bot_config = BotConfig::from_file(&config.rules_config_path)?;
	log::info!(
		"Loaded {} rules from {}; success reaction is :{}:",
		bot_config.rules.len(),
		config.rules_config_path,
		bot_config.success_reaction
	);

	log::info!("Using Slack API at {}", config.slack_api_url);
	let slack_client = SlackClient::new(&config)?;
	log::info!("Using Github API at {}", config.github_api_url);
	let github_client = GithubClient::new(&config)?;

	let state = AppState::new(
		Middleware::new(
			bot_config,
			Arc::new(slack_client),
			Arc::new(github_client),
		),
		config.slack_signing_secret.clone(),
	);

	server::init_server(
		SocketAddr::from(([0, 0, 0, 0], config.webhook_port)),
		state,
	)
	.await
}
