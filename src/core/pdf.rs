use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_text(&self, data: &[u8]) -> anyhow::Result<String> {
        let text = pdf_extract::extract_text_from_mem(data)?;
        Ok(collapse_blank_lines(&text))
    }
}

fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN_RE
        .replace_all(text.trim_start_matches('\n'), "\n\n")
        .into_owned()
}
