use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NOT_FOUND: &str = "Not Found";

pub fn display_field(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_FOUND)
}

#[derive(Debug, Clone)]
pub struct ResumeText {
    lowered: String,
    first_line: String,
}

impl ResumeText {
    pub fn new(raw: &str) -> Self {
        let first_line = raw
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string();

        Self {
            lowered: raw.to_lowercase(),
            first_line,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.lowered
    }

    pub fn original_first_line(&self) -> &str {
        &self.first_line
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub phone_e164: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    pub contact: ContactInfo,
    pub skills: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobKeywords(Vec<String>);

impl JobKeywords {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        )
    }

    pub fn parse(job_description: &str) -> Self {
        Self::new(job_description.split(','))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn unique(&self) -> BTreeSet<String> {
        self.0.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartArtifacts {
    pub bar_chart: PathBuf,
    pub pie_chart: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMatchReport {
    pub request_id: Uuid,
    pub source_file: Option<String>,
    pub contact: ContactInfo,
    pub extracted_skills: BTreeSet<String>,
    pub normalized_skills: BTreeSet<String>,
    pub match_result: Option<MatchResult>,
    pub charts: Option<ChartArtifacts>,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ResumeMatchReport {
    pub fn empty(request_id: Uuid, source_file: Option<String>, errors: Vec<String>) -> Self {
        Self {
            request_id,
            source_file,
            contact: ContactInfo::default(),
            extracted_skills: BTreeSet::new(),
            normalized_skills: BTreeSet::new(),
            match_result: None,
            charts: None,
            generated_at: Utc::now(),
            errors,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VocabularyMode {
    /// Only tokens in the master skill vocabulary count as skills.
    #[default]
    Curated,
    /// Every token counts as a skill.
    Open,
}

pub const DEFAULT_FUZZY_THRESHOLD: u8 = 90;
pub const LOOSE_FUZZY_THRESHOLD: u8 = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatcherSettings {
    pub fuzzy_threshold: u8,
    pub vocabulary_mode: VocabularyMode,
    pub render_charts: bool,
    pub chart_output_dir: PathBuf,
    pub default_phone_region: Option<String>,
    pub catalog_path: Option<PathBuf>,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            vocabulary_mode: VocabularyMode::Curated,
            render_charts: true,
            chart_output_dir: PathBuf::from("static"),
            default_phone_region: None,
            catalog_path: None,
        }
    }
}

impl MatcherSettings {
    pub fn sanitized(mut self) -> Self {
        self.fuzzy_threshold = self.fuzzy_threshold.min(100);
        self.default_phone_region = self
            .default_phone_region
            .map(|region| region.trim().to_ascii_uppercase())
            .filter(|region| !region.is_empty());
        self
    }
}
