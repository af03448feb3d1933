//! Core client: injected credentials, token caching with a singleflight
//! refresh guard, and the signed-request plumbing endpoint wrappers build on.

// crates.io
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	api::ApiResponse,
	config::Credentials,
	error::{ApiError, ConfigError, TransportError},
	http::{self, EsHttpClient},
	obs::{self, CallKind, CallOutcome, CallSpan},
	sign::{SignMethod, SignedPayload},
	token::{AccessToken, DEFAULT_EXPIRES_IN, TokenGrant, TokenRequest, TokenSlot},
};

/// Production base URL for the open API.
pub const DEFAULT_BASE_URL: &str = "https://api.es.xiaojukeji.com/";

const AUTHORIZE_PATH: &str = "river/Auth/authorize";
const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";

pub(crate) const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Client for the open API.
///
/// The client owns the HTTP wrapper, the resolved credentials, and a
/// single-slot token cache. Refreshes run behind a singleflight guard so
/// concurrent callers that observe an expired slot trigger at most one
/// network call and all receive the resulting token. Cloning is cheap and
/// clones share the cache.
#[derive(Clone)]
pub struct EsClient {
	http: EsHttpClient,
	credentials: Credentials,
	base_url: Url,
	token_slot: TokenSlot,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl EsClient {
	/// Creates a client with the crate's default transport settings.
	pub fn new(credentials: Credentials) -> Result<Self> {
		Ok(Self::with_http_client(credentials, EsHttpClient::new()?)?)
	}

	/// Creates a client that reuses a caller-provided transport.
	pub fn with_http_client(
		credentials: Credentials,
		http: EsHttpClient,
	) -> Result<Self, ConfigError> {
		let base_url =
			Url::parse(DEFAULT_BASE_URL).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(Self {
			http,
			credentials,
			base_url,
			token_slot: TokenSlot::default(),
			refresh_guard: Arc::new(AsyncMutex::new(())),
		})
	}

	/// Creates a client from the `DIDI_*` environment variables.
	pub fn from_env() -> Result<Self> {
		Self::new(Credentials::from_env()?)
	}

	/// Replaces the base URL (mock servers, regional gateways).
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = base_url;

		self
	}

	/// Returns the injected credentials.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Returns the base URL every endpoint path is joined onto.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Returns the token cache slot.
	pub fn token_slot(&self) -> &TokenSlot {
		&self.token_slot
	}

	/// Acquires an access token using the default request parameters.
	pub async fn access_token(&self) -> Result<AccessToken> {
		self.token(TokenRequest::new()).await
	}

	/// Acquires an access token, consulting the cache unless forced.
	///
	/// Cache hits return immediately with `from_cache = true` and no network
	/// call. Otherwise the singleflight guard is taken, the slot is
	/// re-checked (a concurrent caller may have refreshed while this one
	/// waited), and a single signed grant request is issued.
	pub async fn token(&self, request: TokenRequest) -> Result<AccessToken> {
		const KIND: CallKind = CallKind::Authorize;

		let span = CallSpan::new(KIND, "token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				if !request.force
					&& let Some(cached) =
						self.token_slot.fresh_at(OffsetDateTime::now_utc(), request.margin)
				{
					return Ok(cached);
				}

				let _singleflight = self.refresh_guard.lock().await;

				if !request.force
					&& let Some(cached) =
						self.token_slot.fresh_at(OffsetDateTime::now_utc(), request.margin)
				{
					return Ok(cached);
				}

				self.refresh_token().await
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	async fn refresh_token(&self) -> Result<AccessToken> {
		let issued_at = OffsetDateTime::now_utc();
		let payload = SignedPayload::new()
			.field("client_id", &self.credentials.client_id)
			.field("client_secret", self.credentials.client_secret.expose())
			.field("grant_type", GRANT_CLIENT_CREDENTIALS)
			.field("timestamp", issued_at.unix_timestamp());
		let body = payload.signed(self.credentials.sign_key.expose(), SignMethod::Md5);
		let url = self.endpoint(AUTHORIZE_PATH)?;
		let response =
			self.http.post(url).json(&body).send().await.map_err(TransportError::from)?;
		let status = response.status().as_u16();
		let bytes = response.bytes().await.map_err(TransportError::from)?;
		let grant: TokenGrant = http::decode_json(&bytes, Some(status))?;

		if grant.errno != 0 {
			return Err(ApiError::Business {
				errno: grant.errno,
				message: grant.errmsg,
				request_id: grant.request_id,
			}
			.into());
		}

		let value = grant.access_token.ok_or(ApiError::MissingAccessToken)?;
		let expires_in = grant.expires_in.map(Duration::seconds).unwrap_or(DEFAULT_EXPIRES_IN);
		let token = AccessToken::new(value, issued_at, expires_in);

		self.token_slot.store(token.clone());

		Ok(token)
	}

	/// Builds the signed-parameter base every business endpoint shares,
	/// acquiring a valid access token first (may trigger a refresh).
	pub(crate) async fn common_payload(&self) -> Result<SignedPayload> {
		let token = self.access_token().await?;

		Ok(SignedPayload::new()
			.field("client_id", &self.credentials.client_id)
			.field("access_token", token.token.expose())
			.field("timestamp", OffsetDateTime::now_utc().unix_timestamp()))
	}

	pub(crate) fn endpoint(&self, path: &'static str) -> Result<Url, ConfigError> {
		self.base_url.join(path).map_err(|source| ConfigError::InvalidEndpoint { path, source })
	}

	/// Signs the payload and issues a GET with the parameters in the query
	/// string, decoding and checking the response envelope.
	pub(crate) async fn signed_get<T>(
		&self,
		kind: CallKind,
		path: &'static str,
		payload: SignedPayload,
	) -> Result<ApiResponse<T>>
	where
		T: DeserializeOwned,
	{
		let span = CallSpan::new(kind, "signed_get");

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let query = payload.signed(self.credentials.sign_key.expose(), SignMethod::Md5);
				let url = self.endpoint(path)?;
				let response = self
					.http
					.get(url)
					.header(CONTENT_TYPE, FORM_URLENCODED)
					.query(&query)
					.send()
					.await
					.map_err(TransportError::from)?;

				self.read_envelope(response).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
		}

		result
	}

	/// Signs the payload and issues a POST with a JSON body, decoding and
	/// checking the response envelope.
	pub(crate) async fn signed_post_json<T>(
		&self,
		kind: CallKind,
		path: &'static str,
		payload: SignedPayload,
	) -> Result<ApiResponse<T>>
	where
		T: DeserializeOwned,
	{
		let span = CallSpan::new(kind, "signed_post_json");

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let body = payload.signed(self.credentials.sign_key.expose(), SignMethod::Md5);
				let url = self.endpoint(path)?;
				let response =
					self.http.post(url).json(&body).send().await.map_err(TransportError::from)?;

				self.read_envelope(response).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
		}

		result
	}

	async fn read_envelope<T>(&self, response: reqwest::Response) -> Result<ApiResponse<T>>
	where
		T: DeserializeOwned,
	{
		let status = response.status().as_u16();
		let bytes = response.bytes().await.map_err(TransportError::from)?;
		let envelope: ApiResponse<T> = http::decode_json(&bytes, Some(status))?;

		envelope.ensure_ok()?;

		Ok(envelope)
	}
}
impl Debug for EsClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EsClient")
			.field("base_url", &self.base_url.as_str())
			.field("client_id", &self.credentials.client_id)
			.field("token_cached", &self.token_slot.snapshot().is_some())
			.finish()
	}
}
