//! Built-in extraction for plain-text documents.
//!
//! Pages are separated by form feed (`\x0c`), the page break most text
//! exporters emit. Binary formats (PDF and friends) are served by an external
//! `TextExtractor` implementation.

use crate::traits::TextExtractor;
use crate::types::PageText;

const PAGE_BREAK: char = '\u{000C}';

#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self { Self }
}

impl TextExtractor for PlainTextExtractor {
    fn extract_pages(&self, bytes: &[u8], name: &str) -> anyhow::Result<Vec<PageText>> {
        let text = match std::str::from_utf8(bytes) {
            Ok(s) => std::borrow::Cow::Borrowed(s),
            Err(_) => String::from_utf8_lossy(bytes),
        };
        let pages = text
            .split(PAGE_BREAK)
            .zip(1u32..)
            .map(|(page_text, page)| PageText { source_id: name.to_string(), page, text: page_text.to_string() })
            .collect();
        Ok(pages)
    }
}
