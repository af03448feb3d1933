//! Credential configuration resolved once by an explicit loader and injected into the client.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError, secret::Secret};

/// Environment variable supplying the client identifier.
pub const ENV_CLIENT_ID: &str = "DIDI_CLIENT_ID";
/// Environment variable supplying the client secret.
pub const ENV_CLIENT_SECRET: &str = "DIDI_CLIENT_SECRET";
/// Environment variable supplying the signing key.
pub const ENV_SIGN_KEY: &str = "DIDI_SIGN_KEY";
/// Environment variable supplying the optional account phone number.
pub const ENV_PHONE_NUMBER: &str = "DIDI_PHONE_NUMBER";

/// Immutable credential set required to talk to the open API.
///
/// All three mandatory values must be present at construction; the loader never
/// re-reads the environment afterwards.
#[derive(Clone, Debug)]
pub struct Credentials {
	/// OAuth-style client identifier issued by the platform.
	pub client_id: String,
	/// Client secret included in token-grant payloads.
	pub client_secret: Secret,
	/// Shared key mixed into every request signature.
	pub sign_key: Secret,
	/// Optional phone number some business endpoints require.
	pub phone_number: Option<String>,
}
impl Credentials {
	/// Builds a credential set from explicit arguments.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		sign_key: impl Into<String>,
	) -> Result<Self, ConfigError> {
		Ok(Self {
			client_id: required(ENV_CLIENT_ID, Some(client_id.into()))?,
			client_secret: Secret::new(required(ENV_CLIENT_SECRET, Some(client_secret.into()))?),
			sign_key: Secret::new(required(ENV_SIGN_KEY, Some(sign_key.into()))?),
			phone_number: None,
		})
	}

	/// Attaches the optional phone number.
	pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
		self.phone_number = Some(phone_number.into());

		self
	}

	/// Resolves the credential set from process environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Resolves the credential set from an arbitrary lookup function.
	///
	/// The seam exists so tests and alternative loaders (dotenv files, secret
	/// managers) can supply values without touching process state.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		Ok(Self {
			client_id: required(ENV_CLIENT_ID, lookup(ENV_CLIENT_ID))?,
			client_secret: Secret::new(required(ENV_CLIENT_SECRET, lookup(ENV_CLIENT_SECRET))?),
			sign_key: Secret::new(required(ENV_SIGN_KEY, lookup(ENV_SIGN_KEY))?),
			phone_number: lookup(ENV_PHONE_NUMBER).filter(|value| !value.trim().is_empty()),
		})
	}
}

fn required(name: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	value
		.filter(|view| !view.trim().is_empty())
		.ok_or(ConfigError::MissingCredential { name })
}
