use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::Result;

/// Descriptions are truncated before prompting to keep per-result cost
/// bounded; explanations are only requested for surviving results anyway.
const MAX_DESCRIPTION_CHARS: usize = 500;
const DEFAULT_MATCH_REASON: &str = "Matches your search interests.";

const MATCH_REASON_PROMPT: &str = r#"The user is searching for courses with this interest:
"{query}"

Explain in 1-2 sentences why this course is a good match:

Course: {course_code} - {title}
Description: {description}

Be specific about how the course content relates to their interest. Focus on concrete connections."#;

pub async fn explain(
	cfg: &pick_config::LlmProviderConfig,
	query: &str,
	course_code: &str,
	title: &str,
	description: &str,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let truncated: String = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
	let prompt = MATCH_REASON_PROMPT
		.replace("{query}", query)
		.replace("{course_code}", course_code)
		.replace("{title}", title)
		.replace("{description}", &truncated);
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

	Ok(parse_match_reason(&json))
}

fn parse_match_reason(json: &Value) -> String {
	match crate::chat_content(json) {
		Ok(content) if !content.trim().is_empty() => content.trim().to_string(),
		_ => DEFAULT_MATCH_REASON.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn returns_trimmed_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "  Covers decision making in depth.  " } }
			]
		});

		assert_eq!(parse_match_reason(&json), "Covers decision making in depth.");
	}

	#[test]
	fn empty_content_falls_back_to_default_reason() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "" } }
			]
		});

		assert_eq!(parse_match_reason(&json), DEFAULT_MATCH_REASON);
	}
}
