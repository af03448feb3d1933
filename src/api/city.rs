//! Open-city endpoint wrapper and the read-only city-name index built from it.

// self
use crate::{_prelude::*, api::ApiResponse, client::EsClient, obs::CallKind};

const CITY_PATH: &str = "river/City/get";

/// City entry returned by the open-city listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CityEntry {
	/// Numeric city identifier used by other endpoints.
	pub city_id: i64,
	/// Display name of the city.
	pub city_name: String,
	/// Counties administered by the city.
	#[serde(default)]
	pub county_list: Vec<CountyEntry>,
}

/// County entry nested inside a [`CityEntry`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CountyEntry {
	/// Numeric county identifier, when the gateway provides one.
	#[serde(default)]
	pub county_id: Option<i64>,
	/// Display name of the county.
	pub county_name: String,
}

/// A resolved city match.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CityHit {
	/// Numeric city identifier.
	pub city_id: i64,
	/// Display name of the city.
	pub city_name: String,
}

impl EsClient {
	/// Lists the cities currently open on the platform.
	pub async fn river_cities(&self) -> Result<ApiResponse<Vec<CityEntry>>> {
		let payload = self.common_payload().await?;

		self.signed_get(CallKind::CityList, CITY_PATH, payload).await
	}
}

/// Read-only name index over a city listing.
///
/// Built explicitly from [`CityEntry`] values (typically the response of
/// [`EsClient::river_cities`]) and passed to whoever needs name resolution;
/// there is no global instance. County names resolve to their administering
/// city.
#[derive(Clone, Debug)]
pub struct CityLookup {
	case_sensitive: bool,
	city_map: HashMap<String, BTreeSet<CityHit>>,
	county_map: HashMap<String, BTreeSet<CityHit>>,
}
impl CityLookup {
	/// Builds a case-insensitive index from the provided entries.
	pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a CityEntry>) -> Self {
		Self::with_case_sensitivity(entries, false)
	}

	/// Builds an index with explicit case sensitivity.
	pub fn with_case_sensitivity<'a>(
		entries: impl IntoIterator<Item = &'a CityEntry>,
		case_sensitive: bool,
	) -> Self {
		let mut city_map: HashMap<String, BTreeSet<CityHit>> = HashMap::new();
		let mut county_map: HashMap<String, BTreeSet<CityHit>> = HashMap::new();

		for entry in entries {
			let hit = CityHit { city_id: entry.city_id, city_name: entry.city_name.clone() };

			city_map
				.entry(normalize(case_sensitive, &entry.city_name))
				.or_default()
				.insert(hit.clone());

			for county in &entry.county_list {
				county_map
					.entry(normalize(case_sensitive, &county.county_name))
					.or_default()
					.insert(hit.clone());
			}
		}

		Self { case_sensitive, city_map, county_map }
	}

	/// Returns `true` when the index holds no names.
	pub fn is_empty(&self) -> bool {
		self.city_map.is_empty() && self.county_map.is_empty()
	}

	/// Resolves an exact city or county name, sorted by city identifier.
	pub fn find(&self, name: &str) -> Vec<CityHit> {
		if name.trim().is_empty() {
			return Vec::new();
		}

		let needle = normalize(self.case_sensitive, name);
		let mut results = BTreeSet::new();

		if let Some(hits) = self.city_map.get(&needle) {
			results.extend(hits.iter().cloned());
		}
		if let Some(hits) = self.county_map.get(&needle) {
			results.extend(hits.iter().cloned());
		}

		results.into_iter().collect()
	}

	/// Resolves by substring match in either direction, sorted by city identifier.
	pub fn find_fuzzy(&self, name: &str) -> Vec<CityHit> {
		if name.trim().is_empty() {
			return Vec::new();
		}

		let needle = normalize(self.case_sensitive, name);
		let mut results = BTreeSet::new();

		for map in [&self.city_map, &self.county_map] {
			for (key, hits) in map {
				if key.contains(&needle) || needle.contains(key.as_str()) {
					results.extend(hits.iter().cloned());
				}
			}
		}

		results.into_iter().collect()
	}
}

fn normalize(case_sensitive: bool, name: &str) -> String {
	if case_sensitive { name.to_owned() } else { name.trim().to_lowercase() }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn entries() -> Vec<CityEntry> {
		vec![
			CityEntry {
				city_id: 1,
				city_name: "北京市".into(),
				county_list: vec![CountyEntry {
					county_id: Some(101),
					county_name: "密云区".into(),
				}],
			},
			CityEntry {
				city_id: 24,
				city_name: "Dalian".into(),
				county_list: vec![CountyEntry { county_id: None, county_name: "Changhai".into() }],
			},
		]
	}

	#[test]
	fn exact_lookup_covers_cities_and_counties() {
		let entries = entries();
		let lookup = CityLookup::from_entries(&entries);

		assert_eq!(lookup.find("北京市")[0].city_id, 1);
		// County names resolve to the administering city.
		assert_eq!(lookup.find("密云区")[0].city_id, 1);
		// Case-insensitive by default.
		assert_eq!(lookup.find("dalian")[0].city_id, 24);
		assert!(lookup.find("Atlantis").is_empty());
		assert!(lookup.find("  ").is_empty());
	}

	#[test]
	fn fuzzy_lookup_matches_substrings() {
		let entries = entries();
		let lookup = CityLookup::from_entries(&entries);

		assert_eq!(lookup.find_fuzzy("北京")[0].city_id, 1);
		assert_eq!(lookup.find_fuzzy("changhai")[0].city_id, 24);
	}

	#[test]
	fn case_sensitive_index_distinguishes_names() {
		let entries = entries();
		let lookup = CityLookup::with_case_sensitivity(&entries, true);

		assert!(lookup.find("dalian").is_empty());
		assert_eq!(lookup.find("Dalian")[0].city_id, 24);
	}

	#[test]
	fn empty_input_builds_an_empty_index() {
		let entries: Vec<CityEntry> = Vec::new();
		let lookup = CityLookup::from_entries(&entries);

		assert!(lookup.is_empty());
		assert!(lookup.find("anything").is_empty());
	}
}
