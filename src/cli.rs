use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use resume_matcher_lib::core::models::{
    display_field, ContactInfo, ExtractedFields, MatcherSettings, ResumeMatchReport,
    VocabularyMode,
};

#[derive(Debug, Parser)]
#[command(
    name = "resume-matcher",
    version,
    about = "Extract contact details and skills from a resume and score them against job keywords"
)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the per-user default
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score a resume against a comma-separated job description
    Match(MatchArgs),
    /// Print the contact details and skills found in a resume
    Extract(ExtractArgs),
    /// Inspect or create the settings file
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print the effective settings
    Show,
    /// Write default settings to the settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// JSON skill catalog replacing the built-in vocabulary and synonyms
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Treat every token as a skill instead of only known ones
    #[arg(long)]
    pub open_vocabulary: bool,
}

impl CatalogArgs {
    fn apply(&self, settings: &mut MatcherSettings) {
        if let Some(catalog) = &self.catalog {
            settings.catalog_path = Some(catalog.clone());
        }
        if self.open_vocabulary {
            settings.vocabulary_mode = VocabularyMode::Open;
        }
    }
}

#[derive(Debug, Args)]
pub struct MatchArgs {
    /// Resume document (.pdf or .docx)
    pub resume: PathBuf,

    /// Job description keywords, comma separated
    #[arg(short, long)]
    pub keywords: String,

    /// Minimum similarity (0-100) for a fuzzy match
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub threshold: Option<u8>,

    /// Directory for the chart files
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl MatchArgs {
    pub fn apply(&self, mut settings: MatcherSettings) -> MatcherSettings {
        if let Some(threshold) = self.threshold {
            settings.fuzzy_threshold = threshold;
        }
        if let Some(dir) = &self.output_dir {
            settings.chart_output_dir = dir.clone();
        }
        if self.no_charts {
            settings.render_charts = false;
        }
        self.catalog.apply(&mut settings);
        settings
    }
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Resume document (.pdf or .docx)
    pub resume: PathBuf,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Print the fields as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExtractArgs {
    pub fn apply(&self, mut settings: MatcherSettings) -> MatcherSettings {
        self.catalog.apply(&mut settings);
        settings.render_charts = false;
        settings
    }
}

fn write_contact(out: &mut String, contact: &ContactInfo) {
    let _ = writeln!(out, "Name:  {}", display_field(contact.name.as_deref()));
    let _ = writeln!(out, "Email: {}", display_field(contact.email.as_deref()));
    let _ = write!(out, "Phone: {}", display_field(contact.phone.as_deref()));
    if let Some(e164) = &contact.phone_e164 {
        let _ = write!(out, " ({e164})");
    }
    out.push('\n');
}

fn join<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    let joined = values
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

pub fn render_fields(fields: &ExtractedFields) -> String {
    let mut out = String::new();
    write_contact(&mut out, &fields.contact);
    let _ = writeln!(out, "Skills: {}", join(&fields.skills));
    out
}

pub fn render_report(report: &ResumeMatchReport) -> String {
    let mut out = String::new();
    if let Some(file) = &report.source_file {
        let _ = writeln!(out, "Resume: {file}");
    }
    write_contact(&mut out, &report.contact);

    if let Some(result) = &report.match_result {
        let _ = writeln!(out, "Match:   {:.2}%", result.percentage);
        let _ = writeln!(out, "Matched: {}", join(&result.matched_skills));
        let _ = writeln!(out, "Missing: {}", join(&result.missing_skills));
    }

    if let Some(charts) = &report.charts {
        let _ = writeln!(out, "Bar chart: {}", charts.bar_chart.display());
        let _ = writeln!(out, "Pie chart: {}", charts.pie_chart.display());
    }

    for error in &report.errors {
        let _ = writeln!(out, "Error: {error}");
    }
    out
}
