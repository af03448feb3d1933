//! Access-token records and the single-slot cache consulted before each refresh.

// self
use crate::{_prelude::*, secret::Secret};

/// Safety margin subtracted from token expiry when deciding cache validity.
pub const VALIDITY_MARGIN: Duration = Duration::seconds(60);
/// Fallback lifetime applied when the token endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN: Duration = Duration::seconds(1800);

/// Bearer credential issued by the token endpoint.
#[derive(Clone, Debug)]
pub struct AccessToken {
	/// Token value attached to subsequent API calls; redacted in logs.
	pub token: Secret,
	/// Instant the token was obtained.
	pub issued_at: OffsetDateTime,
	/// Instant the token stops being accepted upstream.
	pub expires_at: OffsetDateTime,
	/// `true` when the value was served from the cache instead of the network.
	pub from_cache: bool,
}
impl AccessToken {
	/// Builds a freshly issued token valid for `expires_in` from `issued_at`.
	pub fn new(token: impl Into<String>, issued_at: OffsetDateTime, expires_in: Duration) -> Self {
		Self {
			token: Secret::new(token),
			issued_at,
			expires_at: issued_at + expires_in,
			from_cache: false,
		}
	}

	/// Remaining validity at the provided instant (negative once expired).
	pub fn expires_in_at(&self, now: OffsetDateTime) -> Duration {
		self.expires_at - now
	}

	/// Returns `true` while more than `margin` of validity remains at `now`.
	pub fn is_fresh_at(&self, now: OffsetDateTime, margin: Duration) -> bool {
		self.expires_in_at(now) > margin
	}

	pub(crate) fn as_cached(mut self) -> Self {
		self.from_cache = true;

		self
	}
}

/// Single-slot, thread-safe cache holding the current access token.
///
/// Expiry is detected lazily on access; no timer runs. A failed refresh never
/// touches the slot, so a previously cached token stays retrievable.
#[derive(Clone, Debug, Default)]
pub struct TokenSlot(Arc<RwLock<Option<AccessToken>>>);
impl TokenSlot {
	/// Returns the cached token when it is still fresh beyond `margin`, marked
	/// as served from cache.
	pub fn fresh_at(&self, now: OffsetDateTime, margin: Duration) -> Option<AccessToken> {
		self.0
			.read()
			.as_ref()
			.filter(|token| token.is_fresh_at(now, margin))
			.cloned()
			.map(AccessToken::as_cached)
	}

	/// Overwrites the slot with a freshly issued token.
	pub fn store(&self, token: AccessToken) {
		*self.0.write() = Some(token);
	}

	/// Returns the raw slot contents regardless of freshness.
	pub fn snapshot(&self) -> Option<AccessToken> {
		self.0.read().clone()
	}

	/// Empties the slot.
	pub fn clear(&self) {
		self.0.write().take();
	}
}

/// Parameters controlling a single token acquisition.
#[derive(Clone, Debug)]
pub struct TokenRequest {
	/// Forces a network refresh regardless of remaining validity.
	pub force: bool,
	/// Freshness margin applied when consulting the cache.
	pub margin: Duration,
}
impl TokenRequest {
	/// Creates a request using the default 60-second margin.
	pub fn new() -> Self {
		Self { force: false, margin: VALIDITY_MARGIN }
	}

	/// Forces the client to bypass cache checks.
	pub fn force_refresh(mut self) -> Self {
		self.force = true;

		self
	}

	/// Overrides the force flag.
	pub fn with_force(mut self, force: bool) -> Self {
		self.force = force;

		self
	}

	/// Overrides the freshness margin (negative values clamp to zero).
	pub fn with_margin(mut self, margin: Duration) -> Self {
		self.margin = if margin.is_negative() { Duration::ZERO } else { margin };

		self
	}
}
impl Default for TokenRequest {
	fn default() -> Self {
		Self::new()
	}
}

/// Wire shape returned by the authorization endpoint.
///
/// The token endpoint flattens its payload into the envelope, so `errno` and
/// the grant fields arrive side by side.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenGrant {
	/// Business status code; zero signals success.
	pub errno: i64,
	/// Server-provided message accompanying the status code.
	#[serde(default)]
	pub errmsg: String,
	/// Issued bearer token, present on success.
	#[serde(default)]
	pub access_token: Option<String>,
	/// Validity in seconds; the client falls back to 1800 when absent.
	#[serde(default)]
	pub expires_in: Option<i64>,
	/// Token type hint, typically `Bearer`.
	#[serde(default)]
	pub token_type: Option<String>,
	/// Scope string echoed by the gateway, when present.
	#[serde(default)]
	pub scope: Option<String>,
	/// Correlation identifier echoed by the gateway.
	#[serde(default)]
	pub request_id: Option<String>,
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn freshness_honors_the_margin() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = AccessToken::new("tok", issued, Duration::seconds(1800));

		assert_eq!(token.expires_at, macros::datetime!(2025-01-01 00:30 UTC));
		assert!(token.is_fresh_at(issued, VALIDITY_MARGIN));
		assert!(token.is_fresh_at(issued + Duration::seconds(1739), VALIDITY_MARGIN));
		// Exactly the margin remaining counts as stale.
		assert!(!token.is_fresh_at(issued + Duration::seconds(1740), VALIDITY_MARGIN));
		assert!(!token.is_fresh_at(issued + Duration::seconds(1801), VALIDITY_MARGIN));
	}

	#[test]
	fn slot_marks_cache_hits() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let slot = TokenSlot::default();

		assert!(slot.fresh_at(issued, VALIDITY_MARGIN).is_none());

		slot.store(AccessToken::new("tok", issued, Duration::seconds(1800)));

		let hit = slot
			.fresh_at(issued + Duration::seconds(60), VALIDITY_MARGIN)
			.expect("Stored token should still be fresh.");

		assert!(hit.from_cache);
		assert_eq!(hit.token.expose(), "tok");
		// The slot itself keeps the original issuance flag.
		assert!(!slot.snapshot().expect("Snapshot should be present.").from_cache);
	}

	#[test]
	fn stale_tokens_never_leave_the_slot() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let slot = TokenSlot::default();

		slot.store(AccessToken::new("tok", issued, Duration::seconds(30)));

		assert!(slot.fresh_at(issued, VALIDITY_MARGIN).is_none());
		assert!(slot.snapshot().is_some(), "Staleness is lazy; the slot is not cleared.");
	}

	#[test]
	fn request_clamps_negative_margins() {
		let request = TokenRequest::new().with_margin(Duration::seconds(-5));

		assert_eq!(request.margin, Duration::ZERO);
		assert!(TokenRequest::new().force_refresh().force);
	}

	#[test]
	fn grant_deserializes_with_missing_optionals() {
		let grant: TokenGrant =
			serde_json::from_str("{\"errno\":0,\"errmsg\":\"SUCCESS\",\"access_token\":\"t\"}")
				.expect("Minimal grant payload should deserialize.");

		assert_eq!(grant.errno, 0);
		assert_eq!(grant.access_token.as_deref(), Some("t"));
		assert!(grant.expires_in.is_none());
		assert!(grant.token_type.is_none());
	}
}
