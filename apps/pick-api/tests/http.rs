use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode, header},
	response::Response,
};
use tower::util::ServiceExt;

use pick_api::{routes, state::AppState};
use pick_testkit::{scripted_providers, service_with};

fn app() -> Router {
	let (service, _store) = service_with(scripted_providers());

	routes::router(AppState { service: Arc::new(service) })
}

fn recommend_request(owner: Option<&str>, payload: &serde_json::Value) -> Request<Body> {
	let mut builder = Request::builder()
		.method("POST")
		.uri("/api/recommend")
		.header(header::CONTENT_TYPE, "application/json");

	if let Some(owner) = owner {
		builder = builder.header("x-user", owner);
	}

	builder.body(Body::from(payload.to_string())).expect("Failed to build request.")
}

async fn json_body(response: Response) -> serde_json::Value {
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&bytes).expect("Failed to parse response body.")
}

#[tokio::test]
async fn health_ok() {
	let response = app()
		.oneshot(
			Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn rejects_requests_without_identity_header() {
	let payload = serde_json::json!({ "query": "easy breadth course" });
	let response = app()
		.oneshot(recommend_request(None, &payload))
		.await
		.expect("Failed to call recommend.");

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	let json = json_body(response).await;

	assert_eq!(json["error_code"], "missing_identity");
}

#[tokio::test]
async fn rejects_blank_identity_header() {
	let payload = serde_json::json!({ "query": "easy breadth course" });
	let response = app()
		.oneshot(recommend_request(Some("   "), &payload))
		.await
		.expect("Failed to call recommend.");

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejects_too_short_query() {
	let payload = serde_json::json!({ "query": "hi" });
	let response = app()
		.oneshot(recommend_request(Some("alice"), &payload))
		.await
		.expect("Failed to call recommend.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let json = json_body(response).await;

	assert_eq!(json["error_code"], "invalid_input");
}

#[tokio::test]
async fn rejects_out_of_range_top_k() {
	let payload = serde_json::json!({ "query": "easy breadth course", "top_k": 50 });
	let response = app()
		.oneshot(recommend_request(Some("alice"), &payload))
		.await
		.expect("Failed to call recommend.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recommend_returns_courses_and_quota_status() {
	let payload = serde_json::json!({ "query": "easy breadth course with no prerequisites" });
	let response = app()
		.oneshot(recommend_request(Some("alice"), &payload))
		.await
		.expect("Failed to call recommend.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["success"], true);
	assert_eq!(json["query"], "easy breadth course with no prerequisites");
	assert_eq!(json["remainingQueries"], 4);
	assert!(json["resetTime"].is_string());
	assert!(!json["courses"].as_array().expect("courses must be an array").is_empty());

	let first = &json["courses"][0];

	assert!(first["relevance_score"].as_f64().expect("relevance_score must be a number") >= 0.30);
	assert!(first["match_reason"].is_string());
}

#[tokio::test]
async fn filters_narrow_the_result_set() {
	// No fixture course is offered in Surrey; an impossible filter is an
	// empty success, not an error.
	let payload = serde_json::json!({
		"query": "easy breadth course",
		"filters": { "campus": ["Surrey"] }
	});
	let response = app()
		.oneshot(recommend_request(Some("alice"), &payload))
		.await
		.expect("Failed to call recommend.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["success"], true);
	assert_eq!(json["courses"].as_array().expect("courses must be an array").len(), 0);
}

#[tokio::test]
async fn sixth_query_in_window_is_rate_limited() {
	let app = app();
	let payload = serde_json::json!({ "query": "easy breadth course" });

	for _ in 0..5 {
		let response = app
			.clone()
			.oneshot(recommend_request(Some("alice"), &payload))
			.await
			.expect("Failed to call recommend.");

		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(json_body(response).await["success"], true);
	}

	let response = app
		.oneshot(recommend_request(Some("alice"), &payload))
		.await
		.expect("Failed to call recommend.");

	// Denial is a well-formed response, not an HTTP error.
	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["success"], false);
	assert_eq!(json["remainingQueries"], 0);
	assert_eq!(json["error"], "Query limit exceeded. Maximum 5 queries per 6 hours.");
	assert_eq!(json["courses"].as_array().expect("courses must be an array").len(), 0);
}

#[tokio::test]
async fn quota_endpoint_reports_a_fresh_window() {
	let response = app()
		.oneshot(
			Request::builder()
				.uri("/api/query/limit")
				.header("x-user", "alice")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call quota endpoint.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["remainingQueries"], 5);
	assert_eq!(json["maxQueries"], 5);
	assert!(json["resetTime"].is_string());
}

#[tokio::test]
async fn history_lists_served_queries() {
	let app = app();
	let payload = serde_json::json!({ "query": "easy breadth course with no prerequisites" });
	let response = app
		.clone()
		.oneshot(recommend_request(Some("alice"), &payload))
		.await
		.expect("Failed to call recommend.");

	assert_eq!(response.status(), StatusCode::OK);

	let response = app
		.oneshot(
			Request::builder()
				.uri("/api/query/history")
				.header("x-user", "alice")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call history endpoint.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;
	let items = json["items"].as_array().expect("items must be an array");

	assert_eq!(items.len(), 1);
	assert_eq!(items[0]["queryText"], "easy breadth course with no prerequisites");
	assert!(
		items[0]["responseText"]
			.as_str()
			.expect("responseText must be a string")
			.contains("**Recommended Courses:**")
	);
}

#[tokio::test]
async fn history_is_scoped_to_the_caller() {
	let app = app();
	let payload = serde_json::json!({ "query": "easy breadth course" });
	let response = app
		.clone()
		.oneshot(recommend_request(Some("alice"), &payload))
		.await
		.expect("Failed to call recommend.");

	assert_eq!(response.status(), StatusCode::OK);

	let response = app
		.oneshot(
			Request::builder()
				.uri("/api/query/history")
				.header("x-user", "bob")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call history endpoint.");
	let json = json_body(response).await;

	assert_eq!(json["items"].as_array().expect("items must be an array").len(), 0);
}
