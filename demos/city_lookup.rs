//! Fetches the open-city listing from a mock gateway and resolves city and
//! county names through an explicitly constructed lookup index.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use didi_es_sdk::{api::CityLookup, client::EsClient, config::Credentials, http::EsHttpClient};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/river/Auth/authorize");
			then.status(200).header("content-type", "application/json").body(
				"{\"errno\":0,\"errmsg\":\"SUCCESS\",\"access_token\":\"demo-access\",\"expires_in\":1800,\"request_id\":\"demo-2\"}",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/river/City/get");
			then.status(200).header("content-type", "application/json").body(
				"{\"errno\":0,\"errmsg\":\"SUCCESS\",\"data\":[{\"city_id\":1,\"city_name\":\"Beijing\",\"county_list\":[{\"county_id\":101,\"county_name\":\"Miyun\"}]},{\"city_id\":24,\"city_name\":\"Dalian\",\"county_list\":[]}],\"request_id\":\"demo-3\"}",
			);
		})
		.await;

	let credentials = Credentials::new("demo-client", "demo-secret", "demo-sign-key")?;
	let client = EsClient::with_http_client(credentials, EsHttpClient::new()?)?
		.with_base_url(Url::parse(&server.base_url())?);
	let cities = client
		.river_cities()
		.await?
		.into_data()?
		.unwrap_or_default();
	let lookup = CityLookup::from_entries(&cities);

	for name in ["beijing", "Miyun", "dalian"] {
		for hit in lookup.find(name) {
			println!("{name} -> {} (city_id {}).", hit.city_name, hit.city_id);
		}
	}

	Ok(())
}
