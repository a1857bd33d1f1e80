pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read catalog snapshot at {path:?}.")]
	ReadSnapshot { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to parse catalog snapshot at {path:?}.")]
	ParseSnapshot { path: std::path::PathBuf, source: serde_json::Error },
	#[error("Catalog item {id} has embedding length {actual}, expected {expected}.")]
	ItemDimensionMismatch { id: String, expected: usize, actual: usize },
	#[error("Duplicate catalog item id {id}.")]
	DuplicateItem { id: String },
	#[error("Query vector has length {actual}, expected {expected}.")]
	QueryDimensionMismatch { expected: usize, actual: usize },
}
