pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Pipeline stages that talk to external services. Interpret, embed, and
/// search failures are fatal for the request; explain failures degrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	Interpret,
	Embed,
	Search,
	Explain,
}
impl std::fmt::Display for Stage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let label = match self {
			Self::Interpret => "interpreter",
			Self::Embed => "embedding",
			Self::Search => "search",
			Self::Explain => "explainer",
		};

		write!(f, "{label}")
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid input: {message}")]
	InvalidInput { message: String },
	#[error("The {stage} service is unavailable: {message}")]
	UpstreamUnavailable { stage: Stage, message: String },
	#[error("The {stage} service returned an unusable response: {message}")]
	MalformedUpstreamResponse { stage: Stage, message: String },
	#[error("Quota state for {owner} is busy; retry shortly.")]
	ResourceContention { owner: String },
	#[error("The request deadline expired before recommendations finished.")]
	Timeout,
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn provider(stage: Stage, err: pick_providers::Error) -> Self {
		if err.is_malformed_response() {
			Self::MalformedUpstreamResponse { stage, message: err.to_string() }
		} else {
			Self::UpstreamUnavailable { stage, message: err.to_string() }
		}
	}

	/// Text surfaced to the caller (and into history) when a request fails
	/// after admission. Internal details stay in the logs.
	pub fn user_message(&self) -> String {
		match self {
			Self::UpstreamUnavailable { .. } | Self::MalformedUpstreamResponse { .. } =>
				"Course recommendation service is temporarily unavailable. Please try again later."
					.to_string(),
			Self::Timeout =>
				"The request timed out before recommendations finished. Please try again later."
					.to_string(),
			Self::Storage { .. } => "An unexpected error occurred. Please try again later.".to_string(),
			other => other.to_string(),
		}
	}
}

impl From<pick_storage::Error> for Error {
	fn from(err: pick_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<pick_catalog::Error> for Error {
	fn from(err: pick_catalog::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
