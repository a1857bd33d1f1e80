use pick_domain::{
	CatalogItem, FilterSpec, ScoredItem,
	rank::{self, MAX_QUALITY_SCORE},
};

fn fixture_items() -> Vec<CatalogItem> {
	let specs: [(&str, &str, u32, bool, &[&str], &[&str], f64); 6] = [
		("PSYC 100", "PSYC", 100, false, &["Burnaby"], &["B-Soc"], 22.0),
		("CMPT 120", "CMPT", 100, false, &["Burnaby", "Surrey"], &["Q"], 18.0),
		("HIST 336", "HIST", 300, true, &["Vancouver"], &["B-Hum"], 12.0),
		("BISC 100", "BISC", 100, true, &["Burnaby"], &["B-Sci"], 15.0),
		("PHIL 201", "PHIL", 200, false, &["Surrey"], &["W", "B-Hum"], 20.0),
		("MATH 308", "MATH", 300, true, &["Burnaby"], &["Q"], 8.0),
	];

	specs
		.into_iter()
		.map(|(id, group, level, has_prerequisites, campuses, tags, quality)| CatalogItem {
			id: id.to_string(),
			embedding: vec![1.0, 0.0],
			title: id.to_string(),
			description: String::new(),
			group: group.to_string(),
			level,
			units: 3,
			has_prerequisites,
			prerequisite_text: String::new(),
			tags: tags.iter().map(|tag| tag.to_string()).collect(),
			campuses: campuses.iter().map(|campus| campus.to_string()).collect(),
			delivery_methods: vec!["In Person".to_string()],
			instructor: String::new(),
			static_quality_score: quality,
		})
		.collect()
}

fn match_count(filter: &FilterSpec) -> usize {
	fixture_items().iter().filter(|item| filter.matches(item)).count()
}

#[test]
fn adding_a_filter_field_never_grows_the_match_set() {
	let base = FilterSpec::default();
	let narrowings = [
		FilterSpec { campuses: Some(vec!["Burnaby".to_string()]), ..FilterSpec::default() },
		FilterSpec { tags: Some(vec!["Q".to_string()]), ..FilterSpec::default() },
		FilterSpec { max_level: Some(200), ..FilterSpec::default() },
		FilterSpec { no_prerequisites: Some(true), ..FilterSpec::default() },
		FilterSpec { online_only: Some(true), ..FilterSpec::default() },
		FilterSpec { exclude_groups: Some(vec!["CMPT".to_string()]), ..FilterSpec::default() },
	];
	let unfiltered = match_count(&base);

	for narrowed in narrowings {
		assert!(
			match_count(&narrowed) <= unfiltered,
			"filter {narrowed:?} grew the match set",
		);
	}
}

#[test]
fn stacked_filters_only_narrow() {
	let level_only = FilterSpec { max_level: Some(200), ..FilterSpec::default() };
	let level_and_prereq = FilterSpec {
		max_level: Some(200),
		no_prerequisites: Some(true),
		..FilterSpec::default()
	};

	assert!(match_count(&level_and_prereq) <= match_count(&level_only));
}

#[test]
fn ranking_is_stable_across_repeated_calls() {
	let candidates: Vec<ScoredItem> = fixture_items()
		.into_iter()
		.map(|item| ScoredItem { item, similarity: 0.6 })
		.collect();
	let orderings: Vec<Vec<String>> = (0..5)
		.map(|_| {
			rank::rank(candidates.clone(), 0.0, 10)
				.into_iter()
				.map(|candidate| candidate.item.id)
				.collect()
		})
		.collect();

	for ordering in &orderings[1..] {
		assert_eq!(ordering, &orderings[0]);
	}
}

#[test]
fn relevance_never_exceeds_one_for_bounded_inputs() {
	let blended = rank::relevance(1.0, MAX_QUALITY_SCORE);

	assert!(blended <= 1.0 + 1e-12);
}
