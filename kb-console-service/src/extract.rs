//! Document ingestion dispatcher.
//!
//! Maps an uploaded file's declared type to a text-extraction strategy by
//! filename extension and returns plain text for the knowledge base. The
//! whole file is buffered before dispatch; there is no streaming, no
//! retries, and no partial results.

use lopdf::Document as PdfDocument;
use tracing::{debug, warn};

use crate::error::ExtractionError;

/// Fixed text returned for image uploads. OCR is not implemented; callers
/// get this marker instead of a failure so image uploads still land in the
/// knowledge base as a visible stub.
pub const IMAGE_PLACEHOLDER: &str = "Image text extraction not implemented yet";

/// A file as received from the upload endpoint. Owned transiently by a
/// single `extract` call.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Extract plain text from an uploaded document.
///
/// The strategy is chosen by the filename extension, case-insensitively:
/// PDF pages and DOCX paragraphs are each concatenated in order with a
/// trailing newline per unit, `.txt` bytes are decoded as UTF-8 verbatim,
/// and image formats return [`IMAGE_PLACEHOLDER`]. Anything else is
/// rejected as unsupported, naming the extension.
pub fn extract(document: &UploadedDocument) -> Result<String, ExtractionError> {
    let extension = file_extension(&document.name);
    debug!(name = %document.name, extension = %extension, bytes = document.bytes.len(), "Dispatching extraction");

    match extension.as_str() {
        ".pdf" => extract_pdf(&document.bytes),
        ".docx" => extract_docx(&document.bytes),
        ".txt" => extract_plain_text(&document.bytes),
        ".jpg" | ".jpeg" | ".png" => {
            warn!(name = %document.name, "OCR is not implemented; substituting placeholder text");
            Ok(IMAGE_PLACEHOLDER.to_string())
        }
        _ => Err(ExtractionError::UnsupportedFormat { extension }),
    }
}

/// Lowercased extension including the leading dot, or an empty string when
/// the filename has none. A leading dot alone (hidden files) does not count
/// as an extension.
fn file_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(index) if index > 0 => name[index..].to_lowercase(),
        _ => String::new(),
    }
}

/// Each page's text, trailing whitespace trimmed, followed by a newline,
/// in page order.
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document = PdfDocument::load_mem(bytes).map_err(|e| ExtractionError::ExtractionFailed {
        message: format!("failed to load PDF: {e}"),
    })?;

    let mut text = String::new();
    for page_number in document.get_pages().keys() {
        let page_text = document.extract_text(&[*page_number]).map_err(|e| {
            ExtractionError::ExtractionFailed {
                message: format!("failed to extract text from page {page_number}: {e}"),
            }
        })?;
        text.push_str(page_text.trim_end());
        text.push('\n');
    }

    Ok(text)
}

/// Each paragraph's text followed by a newline, in paragraph order. Empty
/// paragraphs still contribute their newline.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::ExtractionFailed {
        message: format!("failed to read DOCX: {e}"),
    })?;

    Ok(docx_text(&docx))
}

fn docx_text(docx: &docx_rs::Docx) -> String {
    let mut text = String::new();

    for child in docx.document.children.iter() {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            text.push_str(&paragraph_text(paragraph));
            text.push('\n');
        }
    }

    text
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();

    for child in &paragraph.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => collect_run_text(&mut text, run),
            docx_rs::ParagraphChild::Hyperlink(link) => {
                for child in &link.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        collect_run_text(&mut text, run);
                    }
                }
            }
            _ => {}
        }
    }

    text
}

fn collect_run_text(text: &mut String, run: &docx_rs::Run) {
    for child in &run.children {
        if let docx_rs::RunChild::Text(t) = child {
            text.push_str(&t.text);
        }
    }
}

/// UTF-8 decode, returned verbatim.
fn extract_plain_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::ExtractionFailed {
        message: format!("file is not valid UTF-8: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Build a minimal PDF with one page per entry in `pages`, each page
    /// drawing its text with a single Tj operation.
    fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page_text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 48.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*page_text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn txt_is_returned_verbatim() {
        let text = "  hello\nworld  \n";
        let doc = UploadedDocument::new("notes.txt", text.as_bytes().to_vec());
        assert_eq!(extract(&doc).unwrap(), text);
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        let upper = UploadedDocument::new("NOTES.TXT", b"same".to_vec());
        let lower = UploadedDocument::new("notes.txt", b"same".to_vec());
        assert_eq!(extract(&upper).unwrap(), extract(&lower).unwrap());
    }

    #[test]
    fn unsupported_extension_is_named_in_the_error() {
        let doc = UploadedDocument::new("table.csv", b"a,b,c".to_vec());
        match extract(&doc) {
            Err(ExtractionError::UnsupportedFormat { extension }) => {
                assert_eq!(extension, ".csv");
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn filename_without_extension_is_unsupported() {
        let doc = UploadedDocument::new("README", b"text".to_vec());
        match extract(&doc) {
            Err(ExtractionError::UnsupportedFormat { extension }) => {
                assert!(extension.is_empty());
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn image_formats_return_the_placeholder() {
        for name in ["photo.jpg", "photo.jpeg", "photo.png", "PHOTO.PNG"] {
            let doc = UploadedDocument::new(name, vec![0xff, 0xd8, 0xff]);
            assert_eq!(extract(&doc).unwrap(), IMAGE_PLACEHOLDER, "for {name}");
        }
    }

    #[test]
    fn non_utf8_txt_fails_without_panicking() {
        let doc = UploadedDocument::new("broken.txt", vec![0xff, 0xfe, 0x00, 0x80]);
        match extract(&doc) {
            Err(ExtractionError::ExtractionFailed { message }) => {
                assert!(message.contains("UTF-8") || message.contains("utf-8"));
            }
            other => panic!("expected ExtractionFailed, got {other:?}"),
        }
    }

    #[test]
    fn pdf_pages_are_joined_with_newlines() {
        let doc = UploadedDocument::new("pages.pdf", pdf_bytes(&["Hello", "World"]));
        assert_eq!(extract(&doc).unwrap(), "Hello\nWorld\n");
    }

    #[test]
    fn malformed_pdf_fails_with_extraction_error() {
        let doc = UploadedDocument::new("broken.pdf", b"%PDF-1.5 garbage".to_vec());
        assert!(matches!(
            extract(&doc),
            Err(ExtractionError::ExtractionFailed { .. })
        ));
    }

    #[test]
    fn docx_paragraphs_are_joined_with_newlines() {
        use docx_rs::{Docx, Paragraph, Run};

        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("alpha")))
            .add_paragraph(Paragraph::new())
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("beta")));

        assert_eq!(docx_text(&docx), "alpha\n\nbeta\n");
    }

    #[test]
    fn malformed_docx_fails_with_extraction_error() {
        let doc = UploadedDocument::new("broken.docx", b"not a zip archive".to_vec());
        assert!(matches!(
            extract(&doc),
            Err(ExtractionError::ExtractionFailed { .. })
        ));
    }
}
