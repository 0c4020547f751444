pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_WEBHOOK_PORT: u16 = 4567;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const USER_AGENT: &str = "reaction-issue-bot/0.1.0";

pub const WEBHOOK_PATH: &str = "/slack/events";
pub const SLACK_SIGNATURE_HEADER: &str = "x-slack-signature";
pub const SLACK_TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SLACK_RETRY_NUM_HEADER: &str = "x-slack-retry-num";
pub const SLACK_SIGNATURE_VERSION: &str = "v0";
/// Requests signed longer ago than this are treated as replays.
pub const SLACK_SIGNATURE_MAX_AGE_SECS: i64 = 60 * 5;
/// Event payloads are a few kilobytes; anything past this is refused.
pub const MAX_WEBHOOK_BODY_BYTES: usize = 1024 * 1024;

pub const MAX_ISSUE_TITLE_CHARS: usize = 120;
