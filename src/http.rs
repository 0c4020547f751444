use std::{borrow::Cow, time::Duration};

use serde::Serialize;
use snafu::ResultExt;

use crate::{constants::USER_AGENT, error, types::Result};

/// Bearer-authenticated JSON client shared by the Slack and GitHub clients.
pub struct Client {
	client: reqwest::Client,
	auth_key: String,
	accept: &'static str,
}

macro_rules! impl_methods_with_body {
    ($($method:ident : $method_response_fn:ident),*) => {
        $(
            pub async fn $method<'b, I, B, T>(&self, url: I, body: &B) -> Result<T>
            where
                I: Into<Cow<'b, str>>,
                B: Serialize,
                T: serde::de::DeserializeOwned,
            {
                self.$method_response_fn(url, body)
                    .await?
                    .json::<T>()
                    .await
                    .context(error::Http)
            }

            pub async fn $method_response_fn<'b, I, B>(
                &self,
                url: I,
                body: &B,
            ) -> Result<reqwest::Response>
            where
                I: Into<Cow<'b, str>>,
                B: Serialize,
            {
                self.request(
                    self.client
                    .$method(&*url.into())
                    .json(body),
                )
                    .await
            }

        )*
    }
}

impl Client {
	pub fn new<I: Into<String>>(
		auth_key: I,
		accept: &'static str,
		timeout: Duration,
	) -> Result<Self> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.context(error::Http)?;

		Ok(Self {
			client,
			auth_key: auth_key.into(),
			accept,
		})
	}

	impl_methods_with_body! {
		post: post_response
	}

	pub async fn request(
		&self,
		builder: reqwest::RequestBuilder,
	) -> Result<reqwest::Response> {
		let request = builder
			.bearer_auth(&self.auth_key)
			.header(reqwest::header::ACCEPT, self.accept)
			.header(reqwest::header::USER_AGENT, USER_AGENT)
			.build()
			.context(error::Http)?;

		log::debug!("{} {}", request.method(), request.url());

		let response =
			self.client.execute(request).await.context(error::Http)?;
		let status = response.status();

		if status.is_success() {
			Ok(response)
		} else {
			let text = response.text().await.context(error::Http)?;

			// Try to decode the response error as JSON otherwise store
			// it as plain text in a JSON object.
			let body: serde_json::Value = serde_json::from_str(&text).unwrap_or_else(
				|_| serde_json::json!({ "error_message": text }),
			);

			error::Response { status, body }.fail()
		}
	}

	async fn get_response<'b, I: Into<Cow<'b, str>>>(
		&self,
		url: I,
	) -> Result<reqwest::Response> {
		self.request(self.client.get(&*url.into())).await
	}

	/// Get a single resource and decode it from JSON.
	pub async fn get<'b, I, T>(&self, url: I) -> Result<T>
	where
		I: Into<Cow<'b, str>>,
		T: serde::de::DeserializeOwned,
	{
		self.get_response(url)
			.await?
			.json::<T>()
			.await
			.context(error::Http)
	}
}
