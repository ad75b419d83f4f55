//! Page segmentation into fixed-size, overlapping character windows.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{PageText, Passage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentParams {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self { chunk_size: 1000, overlap: 200 }
    }
}

impl SegmentParams {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        let params = Self { chunk_size, overlap };
        params.validate()?;
        Ok(params)
    }

    /// `overlap >= chunk_size` would never advance the window.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.overlap >= self.chunk_size {
            return Err(Error::InvalidSegmentationParameters {
                chunk_size: self.chunk_size,
                overlap: self.overlap,
            });
        }
        Ok(())
    }

    fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

fn blank_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{2,}").expect("static regex"))
}

/// Normalize line endings, collapse runs of blank lines to one, trim the page.
pub fn clean_text(raw: &str) -> String {
    let unix = raw.replace("\r\n", "\n");
    blank_runs().replace_all(&unix, "\n\n").trim().to_string()
}

/// Character ranges `[start, end)` visited by the sliding window over a text of
/// `char_len` characters. The terminal window is visited exactly once.
pub fn window_ranges(char_len: usize, params: SegmentParams) -> Result<Vec<Range<usize>>> {
    params.validate()?;
    let mut ranges = Vec::new();
    let mut start = 0usize;
    while start < char_len {
        let end = (start + params.chunk_size).min(char_len);
        ranges.push(start..end);
        if end == char_len {
            break;
        }
        start += params.step();
    }
    Ok(ranges)
}

/// Split one page into passages.
///
/// Windows are measured in characters, not bytes. Each window is trimmed and
/// dropped if nothing is left, so every returned passage has non-empty text.
pub fn segment(source_id: &str, page: u32, page_text: &str, params: SegmentParams) -> Result<Vec<Passage>> {
    params.validate()?;
    let cleaned = clean_text(page_text);
    if cleaned.is_empty() {
        return Ok(Vec::new());
    }
    // Byte offset of every char boundary, including the end of the string.
    let bounds: Vec<usize> = cleaned
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(cleaned.len()))
        .collect();
    let char_len = bounds.len() - 1;

    let passages: Vec<Passage> = window_ranges(char_len, params)?
        .into_iter()
        .filter_map(|r| {
            let text = cleaned[bounds[r.start]..bounds[r.end]].trim();
            (!text.is_empty()).then(|| Passage::new(text, source_id, page))
        })
        .collect();
    debug!(source_id, page, chars = char_len, passages = passages.len(), "segmented page");
    Ok(passages)
}

/// Segment every page in order and flatten the result.
pub fn segment_pages(pages: &[PageText], params: SegmentParams) -> Result<Vec<Passage>> {
    params.validate()?;
    let mut out = Vec::new();
    for p in pages {
        out.extend(segment(&p.source_id, p.page, &p.text, params)?);
    }
    Ok(out)
}
