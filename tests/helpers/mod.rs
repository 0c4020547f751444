use std::{sync::Arc, time::Duration};

use httptest::Server;
use reaction_issue_bot::{
	config::{BotConfig, LogFormat, MainConfig},
	event::ReactionEvent,
	github::GithubClient,
	middleware::Middleware,
	slack::SlackClient,
};

pub const SUCCESS_REACTION: &str = "heavy_check_mark";

pub struct SetupOutput {
	pub slack_api: Server,
	pub github_api: Server,
	pub middleware: Middleware,
}

fn server_url(server: &Server) -> String {
	let url = server.url("").to_string();
	url[0..url.len() - 1].to_string()
}

/// Real clients pointed at two mock servers.
pub fn setup(rules_yaml: &str) -> SetupOutput {
	let _ = env_logger::builder().is_test(true).try_init();

	let slack_api = Server::run();
	let github_api = Server::run();

	let config = MainConfig {
		slack_api_url: server_url(&slack_api),
		slack_api_token: "xoxb-test".to_string(),
		slack_signing_secret: "secret".to_string(),
		github_api_url: server_url(&github_api),
		github_api_token: "ghp_test".to_string(),
		rules_config_path: "rules.yml".to_string(),
		webhook_port: 0,
		http_timeout: Duration::from_secs(5),
		log_format: LogFormat::Text,
	};
	let bot_config = BotConfig::from_yaml_str(&format!(
		"success_reaction: {}\n{}",
		SUCCESS_REACTION, rules_yaml
	))
	.unwrap();

	let middleware = Middleware::new(
		bot_config,
		Arc::new(SlackClient::new(&config).unwrap()),
		Arc::new(GithubClient::new(&config).unwrap()),
	);

	SetupOutput {
		slack_api,
		github_api,
		middleware,
	}
}

pub fn reaction_event(reaction: &str, item_type: &str) -> ReactionEvent {
	serde_json::from_value(serde_json::json!({
		"type": "reaction_added",
		"user": "U1",
		"reaction": reaction,
		"item_user": "U2",
		"item": { "type": item_type, "channel": "C1", "ts": "100" },
		"event_ts": "101"
	}))
	.unwrap()
}
