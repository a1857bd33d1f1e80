use pick_domain::CatalogItem;

use crate::submit::CourseResult;

/// Markdown summary stored in history and suitable for direct display.
pub(crate) fn render_success(interpretation: &str, courses: &[CourseResult]) -> String {
	let mut out = String::new();

	if !interpretation.is_empty() {
		out.push_str("**Understanding your query:** ");
		out.push_str(interpretation);
		out.push_str("\n\n");
	}

	if courses.is_empty() {
		out.push_str("No courses found matching your criteria. Try broadening your search.");

		return out;
	}

	out.push_str("**Recommended Courses:**\n\n");

	for (index, course) in courses.iter().enumerate() {
		out.push_str(&format!(
			"{}. {} - {} (relevance {:.3})\n   {}\n\n",
			index + 1,
			course.id,
			course.title,
			course.relevance_score,
			course.match_reason,
		));
	}

	out
}

pub(crate) fn render_failure(message: &str) -> String {
	format!("Unable to complete this query: {message}")
}

/// Neutral substitute used when the explainer fails for one result. Built
/// purely from the item's own attributes so it never fabricates a
/// connection to the query.
pub(crate) fn fallback_explanation(item: &CatalogItem) -> String {
	let mut reason = format!(
		"{} - {} is a {}-level {} course",
		item.id, item.title, item.level, item.group,
	);

	if !item.tags.is_empty() {
		reason.push_str(&format!(" carrying {} credit", item.tags.join("/")));
	}
	if !item.has_prerequisites {
		reason.push_str(" with no prerequisites");
	}

	reason.push('.');

	reason
}
