//! Transport wrapper shared by the token flow and the endpoint wrappers.

// std
use std::ops::Deref;
// crates.io
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::{ApiError, ConfigError}};

/// Connect timeout applied to every outbound call. No overall request deadline is set.
pub const CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(40);
/// Keep-alive connection ceiling per upstream host.
pub const POOL_MAX_IDLE_PER_HOST: usize = 200;

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The gateway returns results directly instead of delegating to another URI,
/// so redirect following stays disabled. Configure any custom
/// [`ReqwestClient`] the same way before handing it to
/// [`EsHttpClient::with_client`].
#[derive(Clone, Debug)]
pub struct EsHttpClient(pub ReqwestClient);
impl EsHttpClient {
	/// Builds the default transport with the crate's pool and timeout settings.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.connect_timeout(CONNECT_TIMEOUT)
			.pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
			.redirect(Policy::none())
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for EsHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for EsHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Decodes a response body, attaching the JSON path and HTTP status on failure.
pub(crate) fn decode_json<T>(bytes: &[u8], status: Option<u16>) -> Result<T, ApiError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ApiError::Parse { source, status })
}
