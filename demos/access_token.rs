//! Demonstrates credential injection, a signed token grant, and the cache hit
//! on the second acquisition, all against a local mock gateway.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use didi_es_sdk::{client::EsClient, config::Credentials, http::EsHttpClient};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/river/Auth/authorize");
			then.status(200).header("content-type", "application/json").body(
				"{\"errno\":0,\"errmsg\":\"SUCCESS\",\"access_token\":\"demo-access\",\"expires_in\":1800,\"request_id\":\"demo-1\"}",
			);
		})
		.await;
	let credentials =
		Credentials::new("demo-client", "demo-secret", "demo-sign-key")?.with_phone_number("13800000000");
	let client = EsClient::with_http_client(credentials, EsHttpClient::new()?)?
		.with_base_url(Url::parse(&server.base_url())?);
	let first = client.access_token().await?;
	let second = client.access_token().await?;

	println!("First acquisition from cache: {}.", first.from_cache);
	println!("Second acquisition from cache: {}.", second.from_cache);
	println!("Token expires at: {}.", second.expires_at);

	token_mock.assert_async().await;

	Ok(())
}
