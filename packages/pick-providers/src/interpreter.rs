use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use pick_domain::Interpretation;

use crate::{Error, Result};

/// Topic-extraction prompt carried over from the original service; the
/// pattern hints ("bird course", WQB, prerequisites) materially change what
/// the downstream embedding retrieves.
const INTERPRET_PROMPT: &str = r#"Extract the main topics and interests from this course search query.

Query: "{query}"

Return a JSON object with:
- "topics": list of 3-5 key topics/subjects the user is interested in
- "interpretation": one sentence describing what the user is looking for

Common patterns to recognize:
- "easy" or "bird course" -> introductory, beginner-friendly, accessible, low workload
- "breadth" or "WQB" -> general education, breadth requirement, diverse topics
- "no prereqs" or "no prerequisites" -> open enrollment, foundational, entry-level
- "interesting" -> engaging, unique perspectives, thought-provoking

Return ONLY valid JSON, no other text."#;

pub async fn interpret(
	cfg: &pick_config::LlmProviderConfig,
	raw_query: &str,
) -> Result<Interpretation> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let prompt = INTERPRET_PROMPT.replace("{query}", raw_query);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_output_tokens,
		"messages": [{ "role": "user", "content": prompt }],
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_interpretation(&json)
}

fn parse_interpretation(json: &Value) -> Result<Interpretation> {
	let content = crate::chat_content(json)?;
	let payload: Value = serde_json::from_str(content.trim()).map_err(|_| {
		Error::InvalidResponse { message: "Interpreter content is not valid JSON.".to_string() }
	})?;
	let topics = payload
		.get("topics")
		.and_then(|v| v.as_array())
		.map(|values| {
			values
				.iter()
				.filter_map(|value| value.as_str())
				.map(|topic| topic.to_string())
				.collect()
		})
		.unwrap_or_default();
	let text = payload
		.get("interpretation")
		.and_then(|v| v.as_str())
		.unwrap_or_default()
		.to_string();

	Ok(Interpretation { topics, text })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chat_payload(content: &str) -> Value {
		serde_json::json!({
			"choices": [
				{ "message": { "content": content } }
			]
		})
	}

	#[test]
	fn parses_topics_and_interpretation() {
		let payload = chat_payload(
			r#"{"topics": ["psychology", "cognition"], "interpretation": "Courses about how people think."}"#,
		);
		let parsed = parse_interpretation(&payload).expect("parse failed");

		assert_eq!(parsed.topics, vec!["psychology", "cognition"]);
		assert_eq!(parsed.text, "Courses about how people think.");
	}

	#[test]
	fn missing_topics_yields_an_empty_list_not_an_error() {
		let payload = chat_payload(r#"{"interpretation": "Something broad."}"#);
		let parsed = parse_interpretation(&payload).expect("parse failed");

		assert!(parsed.topics.is_empty());
		assert_eq!(parsed.text, "Something broad.");
	}

	#[test]
	fn non_json_content_is_a_malformed_response() {
		let payload = chat_payload("I could not help with that.");
		let err = parse_interpretation(&payload).expect_err("parse must fail");

		assert!(err.is_malformed_response());
	}

	#[test]
	fn missing_choices_is_a_malformed_response() {
		let err = parse_interpretation(&serde_json::json!({})).expect_err("parse must fail");

		assert!(err.is_malformed_response());
	}
}
