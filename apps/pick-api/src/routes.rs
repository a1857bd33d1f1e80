use axum::{
	Json, Router,
	extract::State,
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use pick_service::{HistoryResponse, QuotaStatusResponse, SubmitRequest, SubmitResponse};

use crate::state::AppState;

/// Caller identity header. Requests without it are rejected before any
/// quota state is touched.
pub const OWNER_HEADER: &str = "x-user";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/recommend", post(recommend))
		.route("/api/query/limit", get(quota_status))
		.route("/api/query/history", get(history))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn recommend(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
	let owner = owner_from_headers(&headers)?;
	let response = state.service.submit(&owner, payload).await?;

	Ok(Json(response))
}

async fn quota_status(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<QuotaStatusResponse>, ApiError> {
	let owner = owner_from_headers(&headers)?;
	let response = state.service.quota_status(&owner).await?;

	Ok(Json(response))
}

async fn history(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<HistoryResponse>, ApiError> {
	let owner = owner_from_headers(&headers)?;
	let response = state.service.recent_history(&owner).await?;

	Ok(Json(response))
}

fn owner_from_headers(headers: &HeaderMap) -> Result<String, ApiError> {
	let Some(value) = headers.get(OWNER_HEADER) else {
		return Err(ApiError::new(
			StatusCode::UNAUTHORIZED,
			"missing_identity",
			format!("The {OWNER_HEADER} header is required."),
		));
	};
	let owner = value
		.to_str()
		.map_err(|_| {
			ApiError::new(
				StatusCode::BAD_REQUEST,
				"invalid_identity",
				format!("The {OWNER_HEADER} header must be visible ASCII."),
			)
		})?
		.trim();

	if owner.is_empty() {
		return Err(ApiError::new(
			StatusCode::UNAUTHORIZED,
			"missing_identity",
			format!("The {OWNER_HEADER} header must be non-empty."),
		));
	}

	Ok(owner.to_string())
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<pick_service::Error> for ApiError {
	fn from(err: pick_service::Error) -> Self {
		use pick_service::Error;

		let (status, error_code) = match &err {
			Error::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "invalid_input"),
			Error::ResourceContention { .. } =>
				(StatusCode::SERVICE_UNAVAILABLE, "resource_contention"),
			Error::Timeout => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
			Error::UpstreamUnavailable { .. } | Error::MalformedUpstreamResponse { .. } =>
				(StatusCode::BAD_GATEWAY, "upstream_error"),
			Error::Storage { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
		};

		Self::new(status, error_code, err.user_message())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
