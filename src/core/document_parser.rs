use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::errors::CoreError;
use super::pdf::PdfTextExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, CoreError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(CoreError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResumeDocumentParser {
    pdf_text_extractor: PdfTextExtractor,
}

impl ResumeDocumentParser {
    pub fn extract_text(&self, file_name: &str, data: &[u8]) -> Result<String, CoreError> {
        let format = DocumentFormat::from_file_name(file_name)?;
        let extracted = match format {
            DocumentFormat::Pdf => self.pdf_text_extractor.extract_text(data),
            DocumentFormat::Docx => extract_docx_text(data),
        };

        extracted.map_err(|err| CoreError::DocumentParse(format!("{file_name}: {err:#}")))
    }
}

fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut document_file = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    document_file.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:p" {
                    in_paragraph = true;
                    current.clear();
                }
            }
            Ok(Event::Empty(e)) if in_paragraph => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" => current.push(' '),
                _ => {}
            },
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"w:p" {
                    if !current.trim().is_empty() {
                        lines.push(current.trim().to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_paragraph {
                    let value = e.xml_content()?.into_owned();
                    current.push_str(&value);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_paragraph {
                    match e.resolve_char_ref()? {
                        Some(ch) => current.push(ch),
                        None => {
                            let name = e.decode()?;
                            if let Some(value) = resolve_predefined_entity(&name) {
                                current.push_str(value);
                            }
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {}
        }

        buf.clear();
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use super::*;

    pub(crate) fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(
                "word/document.xml",
                zip::write::SimpleFileOptions::default(),
            )
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn format_is_chosen_by_extension() {
        assert_eq!(
            DocumentFormat::from_file_name("Resume.PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_file_name("cv.docx").unwrap(),
            DocumentFormat::Docx
        );
        assert!(matches!(
            DocumentFormat::from_file_name("cv.doc"),
            Err(CoreError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            DocumentFormat::from_file_name("resume"),
            Err(CoreError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn docx_paragraphs_become_lines_with_case_preserved() {
        let bytes = docx_bytes(&["John Smith", "", "Python\tand SQL"]);
        let text = ResumeDocumentParser::default()
            .extract_text("resume.docx", &bytes)
            .unwrap();
        assert_eq!(text, "John Smith\nPython\tand SQL");
    }

    #[test]
    fn docx_entity_references_are_resolved() {
        let bytes = docx_bytes(&["R&amp;D with C&amp;C++ and a &lt;b&gt; tag &#43;1"]);
        let text = ResumeDocumentParser::default()
            .extract_text("resume.docx", &bytes)
            .unwrap();
        assert_eq!(text, "R&D with C&C++ and a <b> tag +1");
    }

    #[test]
    fn corrupt_docx_is_a_parse_error() {
        let err = ResumeDocumentParser::default()
            .extract_text("resume.docx", b"PK not really")
            .unwrap_err();
        assert!(matches!(err, CoreError::DocumentParse(_)));
    }

    #[test]
    fn unsupported_extension_is_rejected_before_parsing() {
        let err = ResumeDocumentParser::default()
            .extract_text("resume.txt", b"John Smith")
            .unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFormat(_)));
    }
}
