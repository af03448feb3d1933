//! Travel-regulation endpoint wrapper.

// self
use crate::{_prelude::*, api::ApiResponse, client::EsClient, obs::CallKind};

const REGULATION_PATH: &str = "river/Regulation/get";

/// Travel regulation entry returned by the regulation listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Regulation {
	/// Regulation identifier.
	pub regulation_id: String,
	/// Administrative name of the regulation.
	pub regulation_name: String,
	/// Name shown to employees.
	#[serde(default)]
	pub regulation_employee_name: String,
	/// Description shown to employees.
	#[serde(default)]
	pub regulation_employee_description: String,
	/// Lifecycle status string.
	pub regulation_status: String,
	/// Whether rides under this regulation require approval.
	pub is_approve: i64,
	/// Scene category the regulation belongs to.
	#[serde(default)]
	pub scene_type: String,
	/// Whether a quota applies.
	pub is_use_quota: i64,
	/// Origin of the regulation record.
	pub source: i64,
	/// City applicability category.
	pub city_type: i64,
	/// Approval workflow category.
	pub approval_type: i64,
}

impl EsClient {
	/// Lists the travel regulations configured for the company.
	pub async fn river_regulations(&self) -> Result<ApiResponse<Vec<Regulation>>> {
		let payload = self.common_payload().await?;

		self.signed_get(CallKind::RegulationList, REGULATION_PATH, payload).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::api::ApiResponse;

	#[test]
	fn regulation_listing_deserializes() {
		let body = r#"{
			"errno": 0,
			"errmsg": "SUCCESS",
			"data": [{
				"regulation_id": "9001",
				"regulation_name": "commute",
				"regulation_employee_name": "Commute rides",
				"regulation_employee_description": "Weekday commuting",
				"regulation_status": "1",
				"is_approve": 0,
				"scene_type": "2",
				"is_use_quota": 1,
				"source": 1,
				"city_type": 1,
				"approval_type": 0
			}],
			"request_id": "r-3"
		}"#;
		let envelope: ApiResponse<Vec<Regulation>> =
			serde_json::from_str(body).expect("Regulation envelope should deserialize.");
		let regulations = envelope
			.into_data()
			.expect("Status check should pass.")
			.expect("Data should be present.");

		assert_eq!(regulations.len(), 1);
		assert_eq!(regulations[0].regulation_id, "9001");
		assert_eq!(regulations[0].is_use_quota, 1);
	}
}
