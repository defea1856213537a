use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{ContactInfo, ExtractedFields, ResumeText, VocabularyMode};
use super::skill_catalog::SkillCatalog;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(?\+?\d{1,4}?\)?[-.\s]?\(?\d{1,3}?\)?[-.\s]?\d{1,4}[-.\s]?\d{1,4}[-.\s]?\d{1,4}")
        .unwrap()
});
static YEAR_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:19|20)\d{2}\s*[-–]\s*(?:(?:19|20)\d{2}|present|current|now)\b").unwrap()
});
static USERNAME_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z]{2,}\d{2,}\b").unwrap());
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static NAME_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[._]").unwrap());
static SKILL_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9+#]+(?:[./-][a-z0-9+#]+)*").unwrap());
static COMPOUND_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[./-]").unwrap());

const MIN_PHONE_DIGITS: usize = 9;
const MAX_PHONE_DIGITS: usize = 15;

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_lowercase())
}

pub fn extract_phone(text: &str) -> Option<String> {
    // Year ranges are blanked out first so they cannot merge into the number after them.
    let masked = YEAR_RANGE_RE.replace_all(text, |caps: &regex::Captures| " ".repeat(caps[0].len()));

    PHONE_RE
        .find_iter(&masked)
        .map(|m| m.as_str().trim())
        .find(|candidate| {
            let digits = candidate.chars().filter(char::is_ascii_digit).count();
            (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
        })
        .map(str::to_string)
}

pub fn normalize_phone(raw: &str, region: Option<&str>) -> Option<String> {
    let country = match region {
        Some(code) => match code.parse::<phonenumber::country::Id>() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!(region = code, "unknown phone region, ignoring");
                None
            }
        },
        None => None,
    };

    let parsed = phonenumber::parse(country, raw).ok()?;
    if !phonenumber::is_valid(&parsed) {
        return None;
    }

    Some(parsed.format().mode(phonenumber::Mode::E164).to_string())
}

// `bscsf22.umair@school.edu` gives `Umair`.
pub fn name_from_email(email: &str) -> Option<String> {
    let local = email.split('@').next().unwrap_or_default();
    let without_username = USERNAME_SUFFIX_RE.replace_all(local, "");
    let without_digits = DIGITS_RE.replace_all(&without_username, "");

    NAME_SPLIT_RE
        .split(without_digits.trim())
        .find(|part| !part.is_empty())
        .map(capitalize)
}

pub fn name_from_first_line(first_line: &str) -> Option<String> {
    let words: Vec<&str> = first_line
        .split_whitespace()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .take(2)
        .collect();

    if words.len() < 2 {
        return None;
    }

    Some(words.join(" "))
}

pub fn extract_contact(text: &ResumeText, phone_region: Option<&str>) -> ContactInfo {
    let email = extract_email(text.as_str());
    let name = email
        .as_deref()
        .and_then(name_from_email)
        .or_else(|| name_from_first_line(text.original_first_line()));
    let phone = extract_phone(text.as_str());
    let phone_e164 = phone
        .as_deref()
        .and_then(|raw| normalize_phone(raw, phone_region));

    ContactInfo {
        name,
        email,
        phone,
        phone_e164,
    }
}

pub fn extract_skills(
    text: &str,
    catalog: &SkillCatalog,
    mode: VocabularyMode,
) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<regex::Match<'_>> = SKILL_TOKEN_RE.find_iter(&lowered).collect();

    let mut skills = BTreeSet::new();
    for token in tokens.iter().map(|m| m.as_str()) {
        if mode == VocabularyMode::Open || catalog.is_known_skill(token) {
            skills.insert(token.to_string());
            continue;
        }

        // "python/django" or "html-css": the parts may be skills on their own.
        for part in COMPOUND_SPLIT_RE.split(token) {
            if catalog.is_known_skill(part) {
                skills.insert(part.to_string());
            }
        }
    }

    for width in 2..=catalog.max_phrase_words() {
        for window in tokens.windows(width) {
            let spaced = window
                .windows(2)
                .all(|pair| lowered[pair[0].end()..pair[1].start()].trim().is_empty());
            if !spaced {
                continue;
            }

            let phrase = window
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            if catalog.is_known_skill(&phrase) {
                skills.insert(phrase);
            }
        }
    }

    skills
}

pub fn extract_fields(
    text: &ResumeText,
    catalog: &SkillCatalog,
    mode: VocabularyMode,
    phone_region: Option<&str>,
) -> ExtractedFields {
    ExtractedFields {
        contact: extract_contact(text, phone_region),
        skills: extract_skills(text.as_str(), catalog, mode),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(text: &str) -> Vec<String> {
        extract_skills(text, &SkillCatalog::builtin(), VocabularyMode::Curated)
            .into_iter()
            .collect()
    }

    #[test]
    fn extract_email_finds_first_address() {
        assert_eq!(
            extract_email("contact: john.doe@example.com, alt jd@other.org"),
            Some("john.doe@example.com".to_string())
        );
        assert_eq!(
            extract_email("jane.smith@company.co.uk"),
            Some("jane.smith@company.co.uk".to_string())
        );
        assert_eq!(extract_email("no email here"), None);
        assert_eq!(extract_email("broken@domain.c"), None);
    }

    #[test]
    fn name_from_email_strips_username_noise() {
        assert_eq!(
            name_from_email("bscsf22.umair@school.edu"),
            Some("Umair".to_string())
        );
        assert_eq!(
            name_from_email("john_smith@example.com"),
            Some("John".to_string())
        );
        assert_eq!(name_from_email("alice99@example.com"), None);
        assert_eq!(name_from_email("12345@example.com"), None);
    }

    #[test]
    fn name_from_first_line_needs_two_capitalized_words() {
        assert_eq!(
            name_from_first_line("John Smith resume"),
            Some("John Smith".to_string())
        );
        assert_eq!(
            name_from_first_line("Curriculum vitae of Jane Doe"),
            Some("Curriculum Jane".to_string())
        );
        assert_eq!(name_from_first_line("john smith"), None);
        assert_eq!(name_from_first_line("Resume"), None);
    }

    #[test]
    fn contact_name_falls_back_to_original_case_first_line() {
        let text = ResumeText::new("John Smith\nSoftware Engineer\nPython, Rust");
        let contact = extract_contact(&text, None);
        assert_eq!(contact.name.as_deref(), Some("John Smith"));
        assert_eq!(contact.email, None);
        assert_eq!(contact.phone, None);
    }

    #[test]
    fn contact_name_prefers_email() {
        let text = ResumeText::new("JOHN SMITH\nbscsf22.umair@school.edu\n");
        let contact = extract_contact(&text, None);
        assert_eq!(contact.name.as_deref(), Some("Umair"));
        assert_eq!(contact.email.as_deref(), Some("bscsf22.umair@school.edu"));
    }

    #[test]
    fn extract_phone_skips_year_ranges() {
        assert_eq!(
            extract_phone("experience 2019 - 2021\nphone: 0300-1234567"),
            Some("0300-1234567".to_string())
        );
        assert_eq!(
            extract_phone("call +1 (555) 123-4567 today"),
            Some("+1 (555) 123-4567".to_string())
        );
        assert_eq!(extract_phone("room 12, floor 3"), None);
    }

    #[test]
    fn extract_phone_ignores_year_range_next_to_number() {
        assert_eq!(
            extract_phone("worked 2019-2021 0300 1234567"),
            Some("0300 1234567".to_string())
        );
        assert_eq!(
            extract_phone("2020 - present\n+92 300 1234567"),
            Some("+92 300 1234567".to_string())
        );
    }

    #[test]
    fn normalize_phone_uses_default_region() {
        assert_eq!(
            normalize_phone("+1 (202) 555-0143", None),
            normalize_phone("(202) 555-0143", Some("US"))
        );
        assert_eq!(normalize_phone("12345", Some("US")), None);
        assert_eq!(normalize_phone("0300-1234567", Some("not-a-region")), None);
    }

    #[test]
    fn extract_skills_keeps_vocabulary_tokens() {
        assert_eq!(
            skills("python, mysql and reactjs; c++ and c# on linux"),
            vec!["c#", "c++", "linux", "mysql", "python", "reactjs"]
        );
    }

    #[test]
    fn extract_skills_splits_unknown_compounds_and_scans_phrases() {
        assert_eq!(
            skills("built python/django services with machine learning and ci/cd."),
            vec!["ci/cd", "django", "machine learning", "python"]
        );
        assert_eq!(skills("node.js and scikit-learn"), vec!["node.js", "scikit-learn"]);
    }

    #[test]
    fn phrases_do_not_span_punctuation() {
        assert_eq!(skills("machine. learning"), Vec::<String>::new());
        assert_eq!(skills("machine, learning"), Vec::<String>::new());
        assert_eq!(skills("machine\n  learning"), vec!["machine learning"]);
    }

    #[test]
    fn open_mode_keeps_every_token() {
        let found = extract_skills(
            "haskell and elixir",
            &SkillCatalog::builtin(),
            VocabularyMode::Open,
        );
        assert!(found.contains("haskell"));
        assert!(found.contains("elixir"));
        assert!(found.contains("and"));
    }

    #[test]
    fn capitalize_matches_title_case_of_a_single_word() {
        assert_eq!(capitalize("uMAIR"), "Umair");
        assert_eq!(capitalize(""), "");
    }
}
