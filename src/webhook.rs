use std::sync::Arc;

use hyper::{body::HttpBody, Body, Method, Request, Response, StatusCode};
use ring::hmac;
use snafu::{OptionExt, ResultExt};
use tokio::sync::Mutex;

use crate::{
	constants::*,
	error::{self, Error},
	event::{Envelope, ReactionEvent},
	middleware::{Middleware, Outcome},
	types::Result,
};

/// This data gets passed along with each webhook to the webhook handler.
pub struct AppState {
	/// Held for the whole of one event so events are handled one at a time;
	/// a re-delivery must observe the success reaction added by the first.
	pub middleware: Mutex<Middleware>,
	pub signing_secret: String,
}

impl AppState {
	pub fn new(middleware: Middleware, signing_secret: String) -> Self {
		Self {
			middleware: Mutex::new(middleware),
			signing_secret,
		}
	}
}

/// Check the Slack request signature: a hex HMAC-SHA256 over
/// `v0:{timestamp}:{body}`.
fn verify(
	secret: &[u8],
	timestamp: &str,
	body: &[u8],
	signature: &[u8],
) -> Result<(), ring::error::Unspecified> {
	let key = hmac::Key::new(hmac::HMAC_SHA256, secret);
	let mut msg = format!("{}:{}:", SLACK_SIGNATURE_VERSION, timestamp)
		.into_bytes();
	msg.extend_from_slice(body);
	hmac::verify(&key, &msg, signature)
}

fn header<'a>(req: &'a Request<Body>, name: &str) -> Result<&'a str> {
	req.headers()
		.get(name)
		.context(error::Message {
			msg: format!("Missing {}", name),
		})?
		.to_str()
		.ok()
		.context(error::Message {
			msg: format!("Error parsing {}", name),
		})
}

fn authenticate(
	req: &Request<Body>,
	body: &[u8],
	signing_secret: &str,
	now: i64,
) -> Result<()> {
	let timestamp = header(req, SLACK_TIMESTAMP_HEADER)?;
	let sent_at = timestamp.parse::<i64>().ok().context(error::Message {
		msg: format!("Error parsing {}", SLACK_TIMESTAMP_HEADER),
	})?;
	if (now - sent_at).abs() > SLACK_SIGNATURE_MAX_AGE_SECS {
		return error::Message {
			msg: format!("Request timestamp {} is too old", timestamp),
		}
		.fail();
	}

	let signature = header(req, SLACK_SIGNATURE_HEADER)?;
	let signature = signature
		.strip_prefix(&format!("{}=", SLACK_SIGNATURE_VERSION))
		.context(error::Message {
			msg: format!("Unsupported signature version {}", signature),
		})?;
	let signature_bytes =
		base16::decode(signature.as_bytes()).ok().context(error::Message {
			msg: format!("Error decoding {}", SLACK_SIGNATURE_HEADER),
		})?;

	verify(
		signing_secret.trim().as_bytes(),
		timestamp,
		body,
		&signature_bytes,
	)
	.ok()
	.context(error::Message {
		msg: "Validation signature does not match".to_string(),
	})
}

fn respond(status: StatusCode, body: impl Into<Body>) -> Result<Response<Body>> {
	Response::builder()
		.status(status)
		.body(body.into())
		.ok()
		.context(error::Message {
			msg: "Error building response".to_string(),
		})
}

/// Reads the body unless it is larger than `MAX_WEBHOOK_BODY_BYTES`.
async fn read_body(body: &mut Body) -> Result<Option<Vec<u8>>> {
	let mut bytes = vec![];
	while let Some(chunk) = body.data().await {
		let chunk = chunk.context(error::Hyper)?;
		if bytes.len() + chunk.len() > MAX_WEBHOOK_BODY_BYTES {
			return Ok(None);
		}
		bytes.extend_from_slice(&chunk);
	}
	Ok(Some(bytes))
}

fn declared_length(req: &Request<Body>) -> Option<usize> {
	req.headers()
		.get(hyper::header::CONTENT_LENGTH)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.parse::<usize>().ok())
}

/// Receive a Slack Events API request, authenticate it and dispatch it.
/// Events are acknowledged as soon as they are queued.
pub async fn webhook(
	req: Request<Body>,
	state: Arc<AppState>,
) -> Result<Response<Body>> {
	if req.uri().path() != WEBHOOK_PATH || req.method() != Method::POST {
		return respond(StatusCode::NOT_FOUND, "Not found.");
	}
	if declared_length(&req).map_or(false, |len| len > MAX_WEBHOOK_BODY_BYTES)
	{
		return respond(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large.");
	}

	let (parts, mut body) = req.into_parts();
	let body = match read_body(&mut body).await? {
		Some(body) => body,
		None => {
			return respond(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large.")
		}
	};
	let req = Request::from_parts(parts, Body::empty());

	if let Err(e) = authenticate(
		&req,
		&body,
		&state.signing_secret,
		chrono::Utc::now().timestamp(),
	) {
		log::warn!("Rejecting webhook: {}", e);
		return respond(StatusCode::UNAUTHORIZED, "Unauthorized.");
	}

	let envelope = match serde_json::from_slice::<Envelope>(&body) {
		Ok(envelope) => envelope,
		Err(e) => {
			log::warn!("Unparseable webhook payload: {}", e);
			return respond(StatusCode::BAD_REQUEST, "Bad request.");
		}
	};

	match envelope {
		Envelope::UrlVerification { challenge } => {
			respond(StatusCode::OK, challenge)
		}
		Envelope::EventCallback { event, event_id } => {
			if let Some(retry) = req
				.headers()
				.get(SLACK_RETRY_NUM_HEADER)
				.and_then(|value| value.to_str().ok())
			{
				log::info!("Slack retry {} of {:?}", retry, event_id);
			}
			match serde_json::from_value::<ReactionEvent>(event) {
				// Detached from the request so a dropped connection cannot
				// stop the workflow between filing the issue and reacting.
				Ok(event) => {
					tokio::spawn(handle_event(event, Arc::clone(&state)));
				}
				Err(e) => {
					log::info!("Ignoring event which is not a reaction: {}", e)
				}
			}
			respond(StatusCode::OK, "")
		}
		Envelope::Other => respond(StatusCode::OK, ""),
	}
}

/// Runs the middleware for one event. Failures are logged here, since the
/// middleware leaves reporting to its caller.
async fn handle_event(event: ReactionEvent, state: Arc<AppState>) {
	let middleware = state.middleware.lock().await;

	match middleware.execute(&event).await {
		Ok(Outcome::NotHandled) => log::debug!(
			"No rule for :{}: in {}",
			event.reaction,
			event.item.channel
		),
		Ok(Outcome::AlreadyProcessed) => log::info!(
			"{} {} was already processed",
			event.item.channel,
			event.item.ts
		),
		Ok(Outcome::IssueFiled { issue_url }) => log::info!(
			"Filed {} for :{}: on {} {}",
			issue_url,
			event.reaction,
			event.item.channel,
			event.item.ts
		),
		Err(e) => log_failure(&event, e),
	}
}

fn log_failure(event: &ReactionEvent, e: Error) {
	log::error!(
		"Failed handling :{}: on {} {}: {}",
		event.reaction,
		event.item.channel,
		event.item.ts,
		e
	);
}
