//! Text vs binary classification
//!
//! Classifies a file from a bounded sample of its leading bytes, so the
//! cost is the same for a 1 KB file and a 40 MB one.
//!
//! ## Algorithm
//!
//! 1. Empty sample - text
//! 2. No `0x00` byte - text (the common case for source files)
//! 3. UTF-16 byte order mark (`FF FE` / `FE FF`) - text
//! 4. Otherwise look at *where* the nulls are. UTF-16 without a BOM puts a
//!    null next to every ASCII character, always on the same parity. Fewer
//!    than [`MIN_NULLS_FOR_UTF16_HEURISTIC`] nulls is too little signal and
//!    counts as binary; more than [`UTF16_PATTERN_THRESHOLD`] of them on
//!    one parity is text; anything else is scattered nulls, i.e. binary.

use super::{FileFilter, FilterDecision};
use crate::scan::types::Candidate;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Bytes read from the start of a file
pub const FILE_HEADER_SAMPLE_SIZE: usize = 512;

/// Fewer nulls than this is not a pattern
pub const MIN_NULLS_FOR_UTF16_HEURISTIC: usize = 4;

/// Share of nulls that must sit on one parity to call it UTF-16
pub const UTF16_PATTERN_THRESHOLD: f64 = 0.90;

const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF16_BE: &[u8] = &[0xFE, 0xFF];

/// Outcome of classifying a header sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextClass {
    Empty,
    NoNulls,
    Utf16LeBom,
    Utf16BeBom,
    Utf16Heuristic,
    SparseNulls,
    RandomNulls,
}

impl TextClass {
    pub fn classify(sample: &[u8]) -> Self {
        if sample.is_empty() {
            return TextClass::Empty;
        }
        if !sample.contains(&0x00) {
            return TextClass::NoNulls;
        }
        if let Some(bom) = check_bom(sample) {
            return bom;
        }
        check_utf16_heuristic(sample)
    }

    pub fn is_text(self) -> bool {
        matches!(
            self,
            TextClass::Empty
                | TextClass::NoNulls
                | TextClass::Utf16LeBom
                | TextClass::Utf16BeBom
                | TextClass::Utf16Heuristic
        )
    }

    pub fn reason(self) -> &'static str {
        match self {
            TextClass::Empty => "empty",
            TextClass::NoNulls => "no-nulls",
            TextClass::Utf16LeBom => "utf-16-le-bom",
            TextClass::Utf16BeBom => "utf-16-be-bom",
            TextClass::Utf16Heuristic => "utf-16-heuristic",
            TextClass::SparseNulls => "has-null-sparse",
            TextClass::RandomNulls => "has-null-random",
        }
    }
}

/// Whether `sample` looks like text. Pure function of its input.
pub fn is_text_content(sample: &[u8]) -> bool {
    TextClass::classify(sample).is_text()
}

fn check_bom(sample: &[u8]) -> Option<TextClass> {
    if sample.starts_with(BOM_UTF16_LE) {
        Some(TextClass::Utf16LeBom)
    } else if sample.starts_with(BOM_UTF16_BE) {
        Some(TextClass::Utf16BeBom)
    } else {
        None
    }
}

fn check_utf16_heuristic(sample: &[u8]) -> TextClass {
    let (even, odd) = sample
        .iter()
        .enumerate()
        .filter(|&(_, &byte)| byte == 0x00)
        .fold((0usize, 0usize), |(even, odd), (i, _)| {
            if i % 2 == 0 { (even + 1, odd) } else { (even, odd + 1) }
        });
    let total = even + odd;

    if total < MIN_NULLS_FOR_UTF16_HEURISTIC {
        return TextClass::SparseNulls;
    }

    let even_share = even as f64 / total as f64;
    let odd_share = odd as f64 / total as f64;
    if even_share > UTF16_PATTERN_THRESHOLD || odd_share > UTF16_PATTERN_THRESHOLD {
        TextClass::Utf16Heuristic
    } else {
        TextClass::RandomNulls
    }
}

/// Read at most `limit` leading bytes of a file
pub fn read_file_header(path: &Path, limit: usize) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(limit);
    file.take(limit as u64).read_to_end(&mut header)?;
    Ok(header)
}

/// Text Filter - keeps only files whose header sample classifies as text
#[derive(Debug, Clone)]
pub struct TextFilter {
    sample_size: usize,
}

impl TextFilter {
    pub fn new(sample_size: usize) -> Self {
        Self {
            sample_size: sample_size.max(1),
        }
    }
}

impl Default for TextFilter {
    fn default() -> Self {
        Self::new(FILE_HEADER_SAMPLE_SIZE)
    }
}

impl FileFilter for TextFilter {
    fn name(&self) -> &'static str {
        "TextFilter"
    }

    fn filter(&self, candidate: &Candidate) -> FilterDecision {
        let header = match read_file_header(candidate.path(), self.sample_size) {
            Ok(header) => header,
            Err(e) => {
                tracing::debug!(
                    "Failed to read file header of {}: {}",
                    candidate.path().display(),
                    e
                );
                return FilterDecision::Skip("unreadable");
            }
        };

        let class = TextClass::classify(&header);
        if class.is_text() {
            FilterDecision::Process
        } else {
            FilterDecision::Skip(class.reason())
        }
    }
}
