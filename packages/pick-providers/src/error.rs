pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidResponse { message: String },
	#[error("{message}")]
	Unavailable { message: String },
}
impl Error {
	/// True when the provider answered but the payload could not be parsed,
	/// as opposed to the provider being unreachable.
	pub fn is_malformed_response(&self) -> bool {
		matches!(self, Self::InvalidResponse { .. } | Self::SerdeJson(_))
	}
}
