//! PDF page text adapter for line-based statements.
//!
//! Turns a text PDF into pages of trimmed, non-empty lines. Table statements
//! need a real table extractor and are not read from PDF here.

use lopdf::Document;
use tracing::{debug, warn};

use crate::error::PdfError;
use crate::models::config::PdfConfig;
use crate::statement::LinePage;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A loaded PDF document providing per-page text lines.
pub struct PdfPageSource {
    document: Document,
}

impl PdfPageSource {
    /// Load a PDF from bytes, decrypting documents protected by an empty password.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(Self { document })
    }

    /// Get the number of pages in the PDF.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Extract every page as a list of lines, in page order.
    ///
    /// A page whose text cannot be extracted becomes an empty page rather than
    /// failing the document. Fails only when the whole document yields less
    /// text than `config.min_text_length`.
    pub fn line_pages(&self, config: &PdfConfig) -> Result<Vec<LinePage>> {
        let mut page_numbers: Vec<u32> = self.document.get_pages().keys().copied().collect();
        if config.max_pages > 0 {
            page_numbers.truncate(config.max_pages);
        }

        let mut pages = Vec::with_capacity(page_numbers.len());
        let mut total_text_len = 0;

        for page in page_numbers {
            let text = match self.document.extract_text(&[page]) {
                Ok(text) => text,
                Err(e) => {
                    warn!(
                        "{}",
                        PdfError::TextExtraction {
                            page,
                            reason: e.to_string()
                        }
                    );
                    String::new()
                }
            };

            let lines: LinePage = text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect();

            total_text_len += lines.iter().map(|l| l.chars().count()).sum::<usize>();
            debug!("Page {}: {} lines", page, lines.len());
            pages.push(lines);
        }

        if total_text_len < config.min_text_length {
            return Err(PdfError::NoText(total_text_len));
        }

        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn single_page_pdf(line: &str) -> Vec<u8> {
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
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    #[test]
    fn test_load_garbage_fails() {
        assert!(matches!(
            PdfPageSource::load(b"not a pdf"),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn test_line_pages_from_text_pdf() {
        let data = single_page_pdf("17.12.2025 -500,00 KZT Purchase Coffee");
        let source = PdfPageSource::load(&data).unwrap();
        assert_eq!(source.page_count(), 1);

        let pages = source
            .line_pages(&PdfConfig {
                max_pages: 0,
                min_text_length: 10,
            })
            .unwrap();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].join(" ").contains("17.12.2025"));
    }

    #[test]
    fn test_min_text_length_enforced() {
        let data = single_page_pdf("x");
        let source = PdfPageSource::load(&data).unwrap();

        let result = source.line_pages(&PdfConfig {
            max_pages: 0,
            min_text_length: 50,
        });
        assert!(matches!(result, Err(PdfError::NoText(_))));
    }
}
