//! Resume text extraction from uploaded files.

use std::io::{Cursor, Read};
use std::path::Path;

use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;
use zip::ZipArchive;

use crate::extract::ExtractError;

/// Lowercased extension of `filename`, without the dot.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Extracts plain text from an uploaded resume.
///
/// PDF and DOCX parsing are CPU-bound and run on the blocking pool.
pub async fn load_resume_text(filename: &str, data: Bytes) -> Result<String, ExtractError> {
    let extension = file_extension(filename).unwrap_or_default();

    let text = match extension.as_str() {
        "pdf" => {
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
                .await?
                .map_err(|e| ExtractError::Pdf(e.to_string()))?
        }
        "docx" => tokio::task::spawn_blocking(move || docx_text(&data)).await??,
        "txt" | "md" => String::from_utf8_lossy(&data).into_owned(),
        _ => {
            let shown = if extension.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{extension}")
            };
            return Err(ExtractError::UnsupportedFileType(shown));
        }
    };

    let text = text.trim().to_string();
    debug!("Extracted {} chars from {}", text.len(), filename);
    Ok(text)
}

/// Paragraph text of a `.docx` package, one paragraph per line.
fn docx_text(data: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(format!("word/document.xml: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    paragraphs_text(&xml)
}

/// Concatenates `<w:t>` runs per `<w:p>`. Tabs and breaks are kept.
fn paragraphs_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(text)) if in_text => {
                let text = text.unescape().map_err(|e| ExtractError::Docx(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Docx(e.to_string())),
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[test]
    fn test_file_extension_is_lowercased() {
        assert_eq!(file_extension("Resume.PDF").as_deref(), Some("pdf"));
        assert_eq!(file_extension("notes.md").as_deref(), Some("md"));
        assert_eq!(file_extension("README"), None);
    }

    #[tokio::test]
    async fn test_text_resume_is_trimmed() {
        let text = load_resume_text("cv.txt", Bytes::from_static(b"  \nJane Doe\nRust engineer\n\n"))
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe\nRust engineer");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_decoded_lossily() {
        let text = load_resume_text("cv.md", Bytes::from_static(b"caf\xff ok"))
            .await
            .unwrap();
        assert!(text.starts_with("caf"));
        assert!(text.ends_with("ok"));
    }

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p>
      <w:r><w:t xml:space="preserve">Backend engineer: </w:t></w:r>
      <w:r><w:t>Python &amp; AWS</w:t></w:r>
    </w:p>
    <w:p/>
    <w:p><w:r><w:t>Skills</w:t><w:tab/><w:t>Rust</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    pub(crate) fn docx_bytes(document_xml: &str) -> Bytes {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        Bytes::from(writer.finish().unwrap().into_inner())
    }

    #[tokio::test]
    async fn test_docx_paragraphs_are_joined_by_newlines() {
        let text = load_resume_text("Resume.DOCX", docx_bytes(DOCUMENT_XML))
            .await
            .unwrap();
        assert_eq!(
            text,
            "Jane Doe\nBackend engineer: Python & AWS\n\nSkills\tRust"
        );
    }

    #[tokio::test]
    async fn test_docx_without_document_part_is_an_error() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        let data = Bytes::from(writer.finish().unwrap().into_inner());

        let err = load_resume_text("cv.docx", data).await.unwrap_err();
        assert!(matches!(err, ExtractError::Docx(ref m) if m.contains("word/document.xml")));
    }

    #[tokio::test]
    async fn test_corrupt_docx_is_an_error() {
        let err = load_resume_text("cv.docx", Bytes::from_static(b"PK not a zip"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_rejected() {
        let err = load_resume_text("cv.odt", Bytes::from_static(b"data"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFileType(ref ext) if ext == ".odt"));
    }

    #[tokio::test]
    async fn test_missing_extension_is_rejected() {
        let err = load_resume_text("resume", Bytes::new()).await.unwrap_err();
        assert!(err.to_string().contains("(none)"));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_reports_pdf_error() {
        let err = load_resume_text("cv.pdf", Bytes::from_static(b"not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_) | ExtractError::Task(_)));
    }
}
