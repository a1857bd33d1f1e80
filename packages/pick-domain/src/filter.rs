use serde::{Deserialize, Serialize};

use crate::item::CatalogItem;

pub const ONLINE_DELIVERY_METHOD: &str = "Online";

/// Structured constraints applied on top of similarity search. Every field
/// is independently optional; an absent field imposes no constraint.
/// Set-valued fields match by intersection with the item's metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSpec {
	#[serde(default, rename = "campus", skip_serializing_if = "Option::is_none")]
	pub campuses: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<Vec<String>>,
	#[serde(default, rename = "maxLevel", skip_serializing_if = "Option::is_none")]
	pub max_level: Option<u32>,
	#[serde(default, rename = "noPrerequisites", skip_serializing_if = "Option::is_none")]
	pub no_prerequisites: Option<bool>,
	#[serde(default, rename = "onlineOnly", skip_serializing_if = "Option::is_none")]
	pub online_only: Option<bool>,
	#[serde(default, rename = "excludeGroups", skip_serializing_if = "Option::is_none")]
	pub exclude_groups: Option<Vec<String>>,
}
impl FilterSpec {
	pub fn is_unconstrained(&self) -> bool {
		self.campuses.is_none()
			&& self.tags.is_none()
			&& self.max_level.is_none()
			&& !self.no_prerequisites.unwrap_or(false)
			&& !self.online_only.unwrap_or(false)
			&& self.exclude_groups.is_none()
	}

	pub fn matches(&self, item: &CatalogItem) -> bool {
		if let Some(campuses) = self.campuses.as_ref()
			&& !intersects(campuses, &item.campuses)
		{
			return false;
		}
		if let Some(tags) = self.tags.as_ref()
			&& !intersects(tags, &item.tags)
		{
			return false;
		}
		if let Some(max_level) = self.max_level
			&& item.level > max_level
		{
			return false;
		}
		if self.no_prerequisites.unwrap_or(false) && item.has_prerequisites {
			return false;
		}
		if self.online_only.unwrap_or(false)
			&& !item.delivery_methods.iter().any(|method| method == ONLINE_DELIVERY_METHOD)
		{
			return false;
		}
		if let Some(excluded) = self.exclude_groups.as_ref()
			&& excluded.iter().any(|group| group == &item.group)
		{
			return false;
		}

		true
	}
}

fn intersects(wanted: &[String], present: &[String]) -> bool {
	wanted.iter().any(|value| present.iter().any(|other| other == value))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn item() -> CatalogItem {
		CatalogItem {
			id: "PSYC 100".to_string(),
			embedding: vec![1.0, 0.0],
			title: "Introduction to Psychology".to_string(),
			description: "How people think and behave.".to_string(),
			group: "PSYC".to_string(),
			level: 100,
			units: 3,
			has_prerequisites: false,
			prerequisite_text: String::new(),
			tags: vec!["B-Soc".to_string()],
			campuses: vec!["Burnaby".to_string(), "Surrey".to_string()],
			delivery_methods: vec!["In Person".to_string()],
			instructor: "R. Adams".to_string(),
			static_quality_score: 20.0,
		}
	}

	#[test]
	fn unconstrained_filter_matches_everything() {
		assert!(FilterSpec::default().matches(&item()));
		assert!(FilterSpec::default().is_unconstrained());
	}

	#[test]
	fn campus_filter_matches_by_intersection() {
		let filter =
			FilterSpec { campuses: Some(vec!["Surrey".to_string()]), ..FilterSpec::default() };

		assert!(filter.matches(&item()));

		let filter =
			FilterSpec { campuses: Some(vec!["Vancouver".to_string()]), ..FilterSpec::default() };

		assert!(!filter.matches(&item()));
	}

	#[test]
	fn level_filter_is_an_upper_bound() {
		let filter = FilterSpec { max_level: Some(200), ..FilterSpec::default() };

		assert!(filter.matches(&item()));

		let filter = FilterSpec { max_level: Some(99), ..FilterSpec::default() };

		assert!(!filter.matches(&item()));
	}

	#[test]
	fn no_prerequisites_false_imposes_no_constraint() {
		let mut gated = item();

		gated.has_prerequisites = true;

		let filter = FilterSpec { no_prerequisites: Some(false), ..FilterSpec::default() };

		assert!(filter.matches(&gated));

		let filter = FilterSpec { no_prerequisites: Some(true), ..FilterSpec::default() };

		assert!(!filter.matches(&gated));
	}

	#[test]
	fn online_only_requires_online_delivery() {
		let filter = FilterSpec { online_only: Some(true), ..FilterSpec::default() };

		assert!(!filter.matches(&item()));

		let mut online = item();

		online.delivery_methods.push(ONLINE_DELIVERY_METHOD.to_string());

		assert!(filter.matches(&online));
	}

	#[test]
	fn exclude_groups_removes_the_department() {
		let filter =
			FilterSpec { exclude_groups: Some(vec!["PSYC".to_string()]), ..FilterSpec::default() };

		assert!(!filter.matches(&item()));
	}

	#[test]
	fn deserializes_wire_field_names() {
		let filter: FilterSpec = serde_json::from_str(
			r#"{"campus":["Surrey"],"maxLevel":200,"noPrerequisites":true,"excludeGroups":["CMPT"]}"#,
		)
		.expect("parse failed");

		assert_eq!(filter.campuses.as_deref(), Some(["Surrey".to_string()].as_slice()));
		assert_eq!(filter.max_level, Some(200));
		assert_eq!(filter.no_prerequisites, Some(true));
	}
}
