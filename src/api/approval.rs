//! Approval-ticket endpoint wrapper.

// self
use crate::{_prelude::*, api::ApiResponse, client::EsClient, obs::CallKind};

const APPROVAL_CREATE_PATH: &str = "river/Approval/create";

/// Flat string fields forwarded to the approval-ticket endpoint.
///
/// The gateway signs every parameter, so values must be flat strings; nested
/// structures are not representable in the signature protocol.
#[derive(Clone, Debug, Default)]
pub struct ApprovalTicket(Vec<(String, String)>);
impl ApprovalTicket {
	/// Creates an empty ticket.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a field, stringifying the value.
	pub fn field(mut self, key: impl Into<String>, value: impl Display) -> Self {
		self.0.push((key.into(), value.to_string()));

		self
	}
}

/// Payload returned when an approval ticket is created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApprovalReceipt {
	/// Identifier assigned by the platform to the new ticket.
	pub approval_id: String,
}

impl EsClient {
	/// Creates an approval ticket.
	///
	/// A reused external ticket number surfaces as a business error carrying
	/// the platform-assigned identifier in the message.
	pub async fn create_approval_ticket(
		&self,
		ticket: ApprovalTicket,
	) -> Result<ApiResponse<ApprovalReceipt>> {
		let payload = self.common_payload().await?.merge(ticket.0);

		self.signed_post_json(CallKind::ApprovalCreate, APPROVAL_CREATE_PATH, payload).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn ticket_fields_preserve_insertion() {
		let ticket = ApprovalTicket::new()
			.field("out_approval_id", "ext-1")
			.field("type", 1)
			.field("city", 10);

		assert_eq!(ticket.0.len(), 3);
		assert_eq!(ticket.0[0], ("out_approval_id".to_owned(), "ext-1".to_owned()));
		assert_eq!(ticket.0[1], ("type".to_owned(), "1".to_owned()));
	}
}
