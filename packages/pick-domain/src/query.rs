/// Query length bounds shared by the orchestrator and the HTTP surface.
pub const QUERY_MIN_CHARS: usize = 3;
pub const QUERY_MAX_CHARS: usize = 500;

pub fn validate_query(raw_query: &str) -> Result<(), String> {
	let chars = raw_query.chars().count();

	if chars < QUERY_MIN_CHARS {
		return Err(format!("query must be at least {QUERY_MIN_CHARS} characters."));
	}
	if chars > QUERY_MAX_CHARS {
		return Err(format!("query must be at most {QUERY_MAX_CHARS} characters."));
	}

	Ok(())
}
