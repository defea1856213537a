use std::collections::BTreeSet;

use super::models::{JobKeywords, DEFAULT_FUZZY_THRESHOLD};
use super::skill_catalog::SkillCatalog;

pub fn similarity(a: &str, b: &str) -> u8 {
    let a = processed(a);
    let b = processed(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let direct = indel_ratio(&a, &b);
    let sorted = indel_ratio(&sort_tokens(&a), &sort_tokens(&b));

    (direct.max(sorted) * 100.0).round() as u8
}

// Punctuation other than `+` and `#` separates words: "node.js" compares as "node js".
fn processed(value: &str) -> String {
    value
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn sort_tokens(value: &str) -> String {
    let mut tokens: Vec<&str> = value.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

// 2 * lcs / (|a| + |b|), so an inserted character costs one edit out of the
// combined length instead of a whole position in the longer string.
fn indel_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }

    let mut row = vec![0usize; b.len() + 1];
    for ca in &a {
        let mut diagonal = 0;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }

    2.0 * row[b.len()] as f64 / total as f64
}

pub struct FuzzyMatcher<'a> {
    catalog: &'a SkillCatalog,
    threshold: u8,
}

impl<'a> FuzzyMatcher<'a> {
    pub fn new(catalog: &'a SkillCatalog, threshold: u8) -> Self {
        Self {
            catalog,
            threshold: threshold.min(100),
        }
    }

    pub fn with_default_threshold(catalog: &'a SkillCatalog) -> Self {
        Self::new(catalog, DEFAULT_FUZZY_THRESHOLD)
    }

    // Ties go to the keyword that comes first.
    pub fn best_match<'k>(&self, skill: &str, keywords: &'k [String]) -> Option<&'k str> {
        if self.catalog.is_database_term(skill) {
            return self.database_match(skill, keywords);
        }

        let mut best: Option<(&'k str, u8)> = None;
        for keyword in keywords {
            let score = similarity(skill, keyword);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((keyword.as_str(), score));
            }
        }

        best.filter(|(_, score)| *score >= self.threshold)
            .map(|(keyword, _)| keyword)
    }

    fn database_match<'k>(&self, skill: &str, keywords: &'k [String]) -> Option<&'k str> {
        keywords
            .iter()
            .find(|keyword| keyword.as_str() == skill)
            .or_else(|| {
                keywords
                    .iter()
                    .find(|keyword| self.catalog.is_database_term(keyword))
            })
            .map(String::as_str)
    }

    pub fn match_skills<'s, I>(&self, skills: I, keywords: &JobKeywords) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'s String>,
    {
        skills
            .into_iter()
            .filter_map(|skill| {
                let matched = self.best_match(skill, keywords.as_slice());
                tracing::debug!(skill = %skill, matched = ?matched, "fuzzy match");
                matched.map(str::to_string)
            })
            .collect()
    }
}
