//! Async client SDK for the DiDi Enterprise Solutions open API—signed requests, cached access
//! tokens, and typed endpoint wrappers in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod secret;
pub mod sign;
pub mod token;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{client::EsClient, config::Credentials, http::EsHttpClient};

	/// Client identifier baked into [`test_credentials`].
	pub const TEST_CLIENT_ID: &str = "client-under-test";
	/// Client secret baked into [`test_credentials`].
	pub const TEST_CLIENT_SECRET: &str = "secret-under-test";
	/// Signing key baked into [`test_credentials`].
	pub const TEST_SIGN_KEY: &str = "sign-key-under-test";

	/// Returns a fully populated credential set for tests.
	pub fn test_credentials() -> Credentials {
		Credentials::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET, TEST_SIGN_KEY)
			.expect("Test credentials should be valid.")
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_http_client() -> EsHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		EsHttpClient::with_client(client)
	}

	/// Constructs an [`EsClient`] pointed at a mock server base URL.
	pub fn build_test_client(base_url: &str) -> EsClient {
		let base = Url::parse(base_url).expect("Test base URL should parse successfully.");

		EsClient::with_http_client(test_credentials(), test_http_client())
			.expect("Test client construction should succeed.")
			.with_base_url(base)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
