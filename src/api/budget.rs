//! Budget-center endpoint wrapper.

// self
use crate::{_prelude::*, api::ApiResponse, client::EsClient, obs::CallKind};

const BUDGET_CENTER_PATH: &str = "river/BudgetCenter/get";

/// Pagination window for budget-center listings.
#[derive(Clone, Copy, Debug)]
pub struct BudgetCenterQuery {
	/// Zero-based offset into the listing.
	pub offset: u64,
	/// Page size requested from the gateway.
	pub length: u64,
}
impl BudgetCenterQuery {
	/// Creates the default window (offset 0, length 100).
	pub fn new() -> Self {
		Self { offset: 0, length: 100 }
	}

	/// Overrides the offset.
	pub fn with_offset(mut self, offset: u64) -> Self {
		self.offset = offset;

		self
	}

	/// Overrides the page size.
	pub fn with_length(mut self, length: u64) -> Self {
		self.length = length;

		self
	}
}
impl Default for BudgetCenterQuery {
	fn default() -> Self {
		Self::new()
	}
}

impl EsClient {
	/// Lists budget centers within the provided pagination window.
	///
	/// The payload shape varies by tenant configuration, so the data is left
	/// untyped.
	pub async fn budget_center_list(
		&self,
		query: BudgetCenterQuery,
	) -> Result<ApiResponse<serde_json::Value>> {
		let payload = self
			.common_payload()
			.await?
			.field("offset", query.offset)
			.field("length", query.length);

		self.signed_get(CallKind::BudgetCenterList, BUDGET_CENTER_PATH, payload).await
	}
}
