use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use uuid::Uuid;

use super::document_parser::{DocumentFormat, ResumeDocumentParser};
use super::errors::CoreError;
use super::field_extractor;
use super::fuzzy_matcher::FuzzyMatcher;
use super::models::{
    ExtractedFields, JobKeywords, MatchResult, MatcherSettings, ResumeMatchReport, ResumeText,
};
use super::scorer;
use super::skill_catalog::SkillCatalog;
use super::skill_normalizer::normalize_skills;
use super::visualization::SvgChartSink;

#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub fields: ExtractedFields,
    pub normalized_skills: BTreeSet<String>,
    pub result: MatchResult,
}

pub struct MatchService {
    settings: MatcherSettings,
    catalog: Arc<SkillCatalog>,
    parser: ResumeDocumentParser,
    chart_sink: Option<SvgChartSink>,
}

impl MatchService {
    pub async fn new(settings: MatcherSettings) -> anyhow::Result<Self> {
        let catalog = match &settings.catalog_path {
            Some(path) => SkillCatalog::from_file(path).await?,
            None => SkillCatalog::builtin(),
        };

        Ok(Self::with_catalog(settings, Arc::new(catalog)))
    }

    pub fn with_catalog(settings: MatcherSettings, catalog: Arc<SkillCatalog>) -> Self {
        let settings = settings.sanitized();
        let chart_sink = settings
            .render_charts
            .then(|| SvgChartSink::new(settings.chart_output_dir.clone()));

        Self {
            settings,
            catalog,
            parser: ResumeDocumentParser::default(),
            chart_sink,
        }
    }

    pub fn extract_text_fields(&self, text: &ResumeText) -> ExtractedFields {
        field_extractor::extract_fields(
            text,
            &self.catalog,
            self.settings.vocabulary_mode,
            self.settings.default_phone_region.as_deref(),
        )
    }

    pub fn match_text(
        &self,
        text: &ResumeText,
        keywords: &JobKeywords,
    ) -> Result<MatchOutcome, CoreError> {
        let fields = self.extract_text_fields(text);
        let normalized_skills = normalize_skills(&fields.skills, self.catalog.synonyms());
        tracing::debug!(
            extracted = ?fields.skills,
            normalized = ?normalized_skills,
            "skills normalized"
        );

        let matcher = FuzzyMatcher::new(&self.catalog, self.settings.fuzzy_threshold);
        let matched = matcher.match_skills(&normalized_skills, keywords);
        let result = scorer::score(matched, keywords)?;

        Ok(MatchOutcome {
            fields,
            normalized_skills,
            result,
        })
    }

    pub async fn extract_file(&self, path: &Path) -> anyhow::Result<ExtractedFields> {
        let file_name = file_name_of(path);
        DocumentFormat::from_file_name(&file_name)?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        let raw = self.parser.extract_text(&file_name, &bytes)?;
        Ok(self.extract_text_fields(&ResumeText::new(&raw)))
    }

    pub async fn process_resume_file(
        &self,
        path: &Path,
        job_description: &str,
    ) -> anyhow::Result<ResumeMatchReport> {
        let file_name = file_name_of(path);
        // Unsupported files are rejected before they are read.
        if let Err(err) = DocumentFormat::from_file_name(&file_name) {
            return Ok(self.unsupported(file_name, err));
        }

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.process_resume_bytes(&file_name, &bytes, job_description)
            .await
    }

    pub async fn process_resume_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
        job_description: &str,
    ) -> anyhow::Result<ResumeMatchReport> {
        let request_id = Uuid::new_v4();
        let keywords = JobKeywords::parse(job_description);
        tracing::info!(
            %request_id,
            file = file_name,
            keywords = keywords.len(),
            "processing resume"
        );

        let raw = match self.parser.extract_text(file_name, bytes) {
            Ok(raw) => raw,
            Err(err @ CoreError::UnsupportedFormat(_)) => {
                return Ok(self.unsupported(file_name.to_string(), err));
            }
            Err(err) => return Err(err.into()),
        };

        let outcome = self.match_text(&ResumeText::new(&raw), &keywords)?;
        tracing::info!(
            %request_id,
            matched = outcome.result.matched_skills.len(),
            percentage = outcome.result.percentage,
            "resume scored"
        );

        let charts = match &self.chart_sink {
            Some(sink) => Some(sink.publish(request_id, &outcome.result).await?),
            None => None,
        };

        Ok(ResumeMatchReport {
            request_id,
            source_file: Some(file_name.to_string()),
            contact: outcome.fields.contact,
            extracted_skills: outcome.fields.skills,
            normalized_skills: outcome.normalized_skills,
            match_result: Some(outcome.result),
            charts,
            generated_at: Utc::now(),
            errors: Vec::new(),
        })
    }

    fn unsupported(&self, file_name: String, err: CoreError) -> ResumeMatchReport {
        tracing::warn!(file = %file_name, "{err}");
        ResumeMatchReport::empty(Uuid::new_v4(), Some(file_name), vec![err.to_string()])
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|v| v.to_str())
        .unwrap_or_default()
        .to_string()
}
