use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use hyper::{
	service::{make_service_fn, service_fn},
	Body, Response, Server, StatusCode,
};
use crate::webhook::{webhook, AppState};

/// Serves the Slack webhook on `addr` until the process is stopped.
pub async fn init_server(
	addr: SocketAddr,
	state: AppState,
) -> anyhow::Result<()> {
	let state = Arc::new(state);

	let service = make_service_fn(move |_| {
		let state = Arc::clone(&state);
		async move {
			Ok::<_, Infallible>(service_fn(move |req| {
				let state = Arc::clone(&state);
				async move {
					let response =
						webhook(req, state).await.unwrap_or_else(|e| {
							log::error!("Webhook handler failed: {}", e);
							let mut response = Response::new(Body::empty());
							*response.status_mut() =
								StatusCode::INTERNAL_SERVER_ERROR;
							response
						});
					Ok::<_, Infallible>(response)
				}
			}))
		}
	});

	let server = Server::try_bind(&addr)?.serve(service);
	log::info!("Listening on {}", addr);

	server.await?;
	Ok(())
}
