// crates.io
use httpmock::prelude::*;
use url::Url;
// self
use didi_es_sdk::{
	api::{ApprovalTicket, BudgetCenterQuery, CityLookup},
	client::EsClient,
	config::Credentials,
	error::{ApiError, Error},
	http::EsHttpClient,
};

const AUTHORIZE: &str = "/river/Auth/authorize";
const GRANT_BODY: &str = "{\"errno\":0,\"errmsg\":\"SUCCESS\",\"access_token\":\"endpoint-token\",\"expires_in\":1800,\"request_id\":\"r-0\"}";

fn build_client(server: &MockServer) -> EsClient {
	let credentials = Credentials::new("client-under-test", "secret-under-test", "sign-key-under-test")
		.expect("Test credentials should be valid.");
	let http = EsHttpClient::new().expect("Test transport should build.");

	EsClient::with_http_client(credentials, http)
		.expect("Test client construction should succeed.")
		.with_base_url(Url::parse(&server.base_url()).expect("Mock base URL should parse."))
}

async fn mock_authorize(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(AUTHORIZE);
			then.status(200).header("content-type", "application/json").body(GRANT_BODY);
		})
		.await
}

#[tokio::test]
async fn approval_ticket_creation_returns_the_receipt() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _authorize = mock_authorize(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/river/Approval/create");
			then.status(200).header("content-type", "application/json").body(
				"{\"errno\":0,\"errmsg\":\"SUCCESS\",\"data\":{\"approval_id\":\"1125978361736710\"},\"request_id\":\"r-4\"}",
			);
		})
		.await;
	let envelope = client
		.create_approval_ticket(ApprovalTicket::new().field("out_approval_id", "ext-7"))
		.await
		.expect("Approval creation should succeed.");
	let receipt = envelope
		.into_data()
		.expect("Status check should pass.")
		.expect("Receipt should be present.");

	assert_eq!(receipt.approval_id, "1125978361736710");

	mock.assert_async().await;
}

#[tokio::test]
async fn duplicate_approval_tickets_surface_as_business_errors() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _authorize = mock_authorize(&server).await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/river/Approval/create");
			then.status(200).header("content-type", "application/json").body(
				"{\"errno\":50506,\"errmsg\":\"external approval id already used\",\"data\":null,\"request_id\":\"r-5\"}",
			);
		})
		.await;

	let err = client
		.create_approval_ticket(ApprovalTicket::new().field("out_approval_id", "ext-7"))
		.await
		.expect_err("Duplicate ticket numbers should surface.");

	assert!(matches!(err, Error::Api(ApiError::Business { errno: 50506, .. })));
}

#[tokio::test]
async fn budget_center_listing_sends_signed_pagination() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _authorize = mock_authorize(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/river/BudgetCenter/get")
				.query_param("offset", "0")
				.query_param("length", "100")
				.query_param("access_token", "endpoint-token")
				.query_param_exists("sign")
				.query_param_exists("timestamp");
			then.status(200).header("content-type", "application/json").body(
				"{\"errno\":0,\"errmsg\":\"SUCCESS\",\"data\":{\"total\":0,\"budget_list\":[]},\"request_id\":\"r-6\"}",
			);
		})
		.await;
	let envelope = client
		.budget_center_list(BudgetCenterQuery::default())
		.await
		.expect("Budget listing should succeed.");

	assert!(envelope.is_ok());

	mock.assert_async().await;
}

#[tokio::test]
async fn city_listing_feeds_the_lookup_index() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _authorize = mock_authorize(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/river/City/get").query_param_exists("sign");
			then.status(200).header("content-type", "application/json").body(
				"{\"errno\":0,\"errmsg\":\"SUCCESS\",\"data\":[{\"city_id\":1,\"city_name\":\"Beijing\",\"county_list\":[{\"county_id\":101,\"county_name\":\"Miyun\"}]}],\"request_id\":\"r-7\"}",
			);
		})
		.await;
	let cities = client
		.river_cities()
		.await
		.expect("City listing should succeed.")
		.into_data()
		.expect("Status check should pass.")
		.expect("City data should be present.");
	let lookup = CityLookup::from_entries(&cities);

	assert_eq!(lookup.find("beijing")[0].city_id, 1);
	assert_eq!(lookup.find("Miyun")[0].city_name, "Beijing");

	mock.assert_async().await;
}

#[tokio::test]
async fn regulation_listing_is_typed() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _authorize = mock_authorize(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/river/Regulation/get").query_param_exists("sign");
			then.status(200).header("content-type", "application/json").body(
				"{\"errno\":0,\"errmsg\":\"SUCCESS\",\"data\":[{\"regulation_id\":\"42\",\"regulation_name\":\"business travel\",\"regulation_status\":\"1\",\"is_approve\":1,\"is_use_quota\":0,\"source\":1,\"city_type\":1,\"approval_type\":2}],\"request_id\":\"r-8\"}",
			);
		})
		.await;

	let regulations = client
		.river_regulations()
		.await
		.expect("Regulation listing should succeed.")
		.into_data()
		.expect("Status check should pass.")
		.expect("Regulation data should be present.");

	assert_eq!(regulations.len(), 1);
	assert_eq!(regulations[0].regulation_id, "42");
	assert_eq!(regulations[0].approval_type, 2);
}

#[tokio::test]
async fn one_token_refresh_serves_many_endpoint_calls() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let authorize = mock_authorize(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/river/City/get");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errno\":0,\"errmsg\":\"SUCCESS\",\"data\":[],\"request_id\":\"r-9\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/river/Regulation/get");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errno\":0,\"errmsg\":\"SUCCESS\",\"data\":[],\"request_id\":\"r-10\"}");
		})
		.await;

	client.river_cities().await.expect("City listing should succeed.");
	client.river_regulations().await.expect("Regulation listing should succeed.");

	authorize.assert_calls_async(1).await;
}
