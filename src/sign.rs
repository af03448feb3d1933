//! Deterministic request signing for the open API's `sign` protocol.
//!
//! Every outbound payload carries a `sign` field computed over all other
//! fields plus the shared signing key: values are stringified and trimmed,
//! keys are sorted byte-wise ascending, pairs are rendered as `key=value` and
//! joined with `&`, and the resulting string is hashed (md5 by default). The
//! digest must match the gateway's computation exactly, so the canonical form
//! never changes with input ordering.

// crates.io
use md5::{Digest as _, Md5};
use sha2::Sha256;
// self
use crate::_prelude::*;

/// Reserved wire field carrying the computed signature.
pub const SIGN_FIELD: &str = "sign";
/// Reserved canonical-string key carrying the shared signing key.
pub const SIGN_KEY_FIELD: &str = "sign_key";

/// Digest algorithm accepted by the gateway.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SignMethod {
	/// MD5, the gateway default.
	#[default]
	Md5,
	/// SHA-256, accepted as an opt-in alternative.
	Sha256,
}
impl SignMethod {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignMethod::Md5 => "md5",
			SignMethod::Sha256 => "sha256",
		}
	}

	/// Hashes the input and emits the lowercase hexadecimal digest.
	pub fn digest_hex(self, input: &str) -> String {
		match self {
			SignMethod::Md5 => hex::encode(Md5::digest(input.as_bytes())),
			SignMethod::Sha256 => hex::encode(Sha256::digest(input.as_bytes())),
		}
	}
}
impl Display for SignMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Parameter mapping accumulated before signing.
///
/// Values are stringified on insertion and trimmed of leading/trailing
/// whitespace only; internal whitespace is preserved. Keys are kept sorted, so
/// insertion order never influences the digest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignedPayload(BTreeMap<String, String>);
impl SignedPayload {
	/// Creates an empty payload.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a field, stringifying and trimming the value.
	pub fn field(mut self, key: impl Into<String>, value: impl Display) -> Self {
		self.0.insert(key.into(), value.to_string().trim().to_owned());

		self
	}

	/// Inserts a field only when the value is present.
	pub fn field_opt(self, key: impl Into<String>, value: Option<impl Display>) -> Self {
		match value {
			Some(value) => self.field(key, value),
			None => self,
		}
	}

	/// Merges additional fields, trimming each value.
	pub fn merge(mut self, fields: impl IntoIterator<Item = (String, String)>) -> Self {
		for (key, value) in fields {
			self.0.insert(key, value.trim().to_owned());
		}

		self
	}

	/// Returns the current value for a key, if any.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Returns `true` when no fields have been inserted.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Renders the canonical string hashed by [`SignedPayload::signed`].
	///
	/// The signing key is inserted under [`SIGN_KEY_FIELD`], overriding any
	/// caller-supplied field of the same name, and participates in the sort.
	pub fn canonical_string(&self, sign_key: &str) -> String {
		let mut entries = self.0.clone();

		entries.insert(SIGN_KEY_FIELD.into(), sign_key.trim().to_owned());

		let mut buf = String::new();

		for (idx, (key, value)) in entries.iter().enumerate() {
			if idx > 0 {
				buf.push('&');
			}

			buf.push_str(key);
			buf.push('=');
			buf.push_str(value);
		}

		buf
	}

	/// Consumes the payload and produces the wire mapping with its `sign` field.
	///
	/// The signing key itself is hashed into the digest but never emitted.
	pub fn signed(self, sign_key: &str, method: SignMethod) -> BTreeMap<String, String> {
		let digest = method.digest_hex(&self.canonical_string(sign_key));
		let mut wire = self.0;

		wire.insert(SIGN_FIELD.into(), digest);

		wire
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn md5_matches_known_vector() {
		let payload = SignedPayload::new().field("a", 1).field("b", 2);

		assert_eq!(payload.canonical_string("k"), "a=1&b=2&sign_key=k");
		assert_eq!(
			payload.signed("k", SignMethod::Md5).get(SIGN_FIELD).map(String::as_str),
			Some("39c60f52782507fc231ae4e9656937ab"),
		);
	}

	#[test]
	fn sha256_matches_known_vector() {
		let digest = SignedPayload::new().field("a", 1).field("b", 2).signed("k", SignMethod::Sha256);

		assert_eq!(
			digest.get(SIGN_FIELD).map(String::as_str),
			Some("80368866e486065fe5014e31af4a836659657194ab59c63612b558a6647a0324"),
		);
	}

	#[test]
	fn insertion_order_never_changes_the_digest() {
		let forward = SignedPayload::new().field("a", 1).field("b", 2);
		let reverse = SignedPayload::new().field("b", 2).field("a", 1);

		assert_eq!(forward.canonical_string("k"), reverse.canonical_string("k"));
		assert_eq!(
			forward.signed("k", SignMethod::Md5).get(SIGN_FIELD),
			reverse.signed("k", SignMethod::Md5).get(SIGN_FIELD),
		);
	}

	#[test]
	fn values_are_trimmed_but_internal_whitespace_survives() {
		let payload = SignedPayload::new().field("name", "  Da Lian city \t");

		assert_eq!(payload.get("name"), Some("Da Lian city"));
		assert_eq!(payload.canonical_string("k"), "name=Da Lian city&sign_key=k");
	}

	#[test]
	fn signing_key_overrides_caller_supplied_field() {
		let payload = SignedPayload::new().field(SIGN_KEY_FIELD, "spoofed").field("a", 1);

		assert_eq!(payload.canonical_string("real"), "a=1&sign_key=real");
	}

	#[test]
	fn numbers_and_bools_are_stringified() {
		let payload = SignedPayload::new().field("count", 42_u64).field("flag", true);

		assert_eq!(payload.canonical_string("k"), "count=42&flag=true&sign_key=k");
	}

	#[test]
	fn merge_trims_and_overrides() {
		let payload = SignedPayload::new()
			.field("offset", 0)
			.merge([("offset".to_owned(), " 10 ".to_owned()), ("length".to_owned(), "100".to_owned())]);

		assert_eq!(payload.get("offset"), Some("10"));
		assert_eq!(payload.get("length"), Some("100"));
	}
}
