use serde::{Deserialize, Serialize};

/// One catalog entry as produced by the offline indexing pipeline.
/// Immutable once loaded; the embedding length must match the configured
/// vector dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
	/// Course code, e.g. "CMPT 120".
	pub id: String,
	pub embedding: Vec<f64>,
	pub title: String,
	pub description: String,
	/// Department-like code, e.g. "CMPT".
	pub group: String,
	pub level: u32,
	pub units: u32,
	pub has_prerequisites: bool,
	#[serde(default)]
	pub prerequisite_text: String,
	/// WQB-style breadth designations.
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default)]
	pub campuses: Vec<String>,
	#[serde(default)]
	pub delivery_methods: Vec<String>,
	#[serde(default)]
	pub instructor: String,
	pub static_quality_score: f64,
}

/// Outcome of the interpretation stage. Topics drive the embedding text;
/// the text is shown back to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Interpretation {
	#[serde(default)]
	pub topics: Vec<String>,
	#[serde(default)]
	pub text: String,
}

/// Derives the course level from the numeric part of a course code.
/// "CMPT 120" -> 100, "HIST 336W" -> 300. Unparsable codes map to 0.
pub fn level_from_id(id: &str) -> u32 {
	let digits: String = id
		.split_whitespace()
		.next_back()
		.unwrap_or("")
		.chars()
		.take_while(|c| c.is_ascii_digit())
		.collect();

	digits.parse::<u32>().map(|number| number / 100 * 100).unwrap_or(0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn derives_level_from_course_code() {
		assert_eq!(level_from_id("CMPT 120"), 100);
		assert_eq!(level_from_id("HIST 336W"), 300);
		assert_eq!(level_from_id("PSYC 100"), 100);
		assert_eq!(level_from_id("unparsable"), 0);
	}
}
