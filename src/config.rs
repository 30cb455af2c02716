//! Page-level settings read from the query string.

use leptos_router::params::ParamsMap;

/// Dataset served next to the app.
pub const DEFAULT_DATA_URL: &str = "/user_data.json";

/// Settings for the home page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
	/// Where to fetch the dataset from (`?data=`).
	pub data_url: String,
	/// Pin the root account at the center (`?anchor=0` disables).
	pub anchor_root: bool,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			data_url: DEFAULT_DATA_URL.to_string(),
			anchor_root: true,
		}
	}
}

impl AppConfig {
	/// Reads `data` and `anchor`; anything absent keeps its default.
	pub fn from_query(query: &ParamsMap) -> Self {
		let mut config = Self::default();
		if let Some(url) = query.get("data").filter(|u| !u.trim().is_empty()) {
			config.data_url = url;
		}
		if let Some(anchor) = query.get("anchor") {
			config.anchor_root = !matches!(anchor.as_str(), "0" | "false" | "no" | "off");
		}
		config
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn query(pairs: &[(&str, &str)]) -> ParamsMap {
		let mut map = ParamsMap::new();
		for (k, v) in pairs {
			map.insert(k.to_string(), v.to_string());
		}
		map
	}

	#[test]
	fn defaults_without_query() {
		assert_eq!(AppConfig::from_query(&query(&[])), AppConfig::default());
	}

	#[test]
	fn query_overrides() {
		let config = AppConfig::from_query(&query(&[("data", "/edges.csv"), ("anchor", "off")]));
		assert_eq!(config.data_url, "/edges.csv");
		assert!(!config.anchor_root);
	}

	#[test]
	fn blank_data_url_is_ignored() {
		let config = AppConfig::from_query(&query(&[("data", " ")]));
		assert_eq!(config.data_url, DEFAULT_DATA_URL);
	}
}
