use std::collections::BTreeSet;

use super::errors::CoreError;
use super::models::{JobKeywords, MatchResult};

// The percentage divides by the raw keyword count while `missing_skills` is
// computed over the distinct keywords: `["sql", "sql"]` fully matched scores 50%.
pub fn score(matched: BTreeSet<String>, keywords: &JobKeywords) -> Result<MatchResult, CoreError> {
    if keywords.is_empty() {
        return Err(CoreError::InvalidInput(
            "job description must contain at least one keyword".to_string(),
        ));
    }

    let ratio = matched.len() as f64 / keywords.len() as f64;
    let percentage = round_to_hundredths(ratio * 100.0).clamp(0.0, 100.0);

    let missing_skills = keywords
        .unique()
        .into_iter()
        .filter(|keyword| !matched.contains(keyword))
        .collect();

    Ok(MatchResult {
        matched_skills: matched,
        missing_skills,
        percentage,
    })
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn percentage_is_rounded_to_two_places() {
        let keywords = JobKeywords::parse("python, sql, react");
        let result = score(set(&["python"]), &keywords).unwrap();
        assert_eq!(result.percentage, 33.33);
        assert_eq!(result.missing_skills, set(&["react", "sql"]));

        let result = score(set(&["python", "sql"]), &keywords).unwrap();
        assert_eq!(result.percentage, 66.67);
    }

    #[test]
    fn matched_and_missing_partition_the_keywords() {
        let keywords = JobKeywords::parse("rust, go, docker, kubernetes");
        let matched = set(&["go", "docker"]);
        let result = score(matched.clone(), &keywords).unwrap();

        assert!(result.matched_skills.is_disjoint(&result.missing_skills));
        let union: BTreeSet<String> = result
            .matched_skills
            .union(&result.missing_skills)
            .cloned()
            .collect();
        assert!(union.is_superset(&keywords.unique()));
        assert!((0.0..=100.0).contains(&result.percentage));
        assert_eq!(result.percentage, 50.0);
    }

    #[test]
    fn duplicate_keywords_count_in_denominator_only() {
        let keywords = JobKeywords::parse("sql, sql");
        let result = score(set(&["sql"]), &keywords).unwrap();
        assert_eq!(result.percentage, 50.0);
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn empty_keywords_are_invalid_input() {
        let err = score(set(&["python"]), &JobKeywords::default()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }
}
