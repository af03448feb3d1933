//! Typed endpoint wrappers over the signed-request plumbing.

pub mod approval;
pub mod budget;
pub mod city;
pub mod regulation;

pub use approval::*;
pub use budget::*;
pub use city::*;
pub use regulation::*;

// self
use crate::{_prelude::*, error::ApiError};

/// Response envelope shared by every open-API endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
	/// Business status code; zero signals success.
	pub errno: i64,
	/// Server-provided message accompanying the status code.
	#[serde(default)]
	pub errmsg: String,
	/// Endpoint-specific payload, absent on failure.
	#[serde(default)]
	pub data: Option<T>,
	/// Correlation identifier echoed by the gateway.
	#[serde(default)]
	pub request_id: Option<String>,
}
impl<T> ApiResponse<T> {
	/// Returns `true` when the gateway reported success.
	pub fn is_ok(&self) -> bool {
		self.errno == 0
	}

	/// Converts a non-zero status into [`ApiError::Business`].
	pub fn ensure_ok(&self) -> Result<(), ApiError> {
		if self.is_ok() {
			Ok(())
		} else {
			Err(ApiError::Business {
				errno: self.errno,
				message: self.errmsg.clone(),
				request_id: self.request_id.clone(),
			})
		}
	}

	/// Consumes the envelope, yielding the payload after the status check.
	pub fn into_data(self) -> Result<Option<T>, ApiError> {
		self.ensure_ok()?;

		Ok(self.data)
	}
}
