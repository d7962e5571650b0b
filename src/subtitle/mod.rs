// SRT subtitle handling
//
// - timestamp: HH:MM:SS,mmm -> seconds
// - scanner: lazy block-by-block scan of an SRT document

pub mod scanner;
pub mod timestamp;

pub use scanner::{match_time_range, BlockScanner};
pub use timestamp::parse_timestamp;

use crate::error::Result;

/// One timed subtitle entry as read from the file.
///
/// Timestamps are kept raw; conversion happens when the block is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleBlock {
    pub start_raw: String,
    pub end_raw: String,
    /// Block lines joined with a single space, case preserved
    pub text: String,
}

impl SubtitleBlock {
    pub fn new<S1: Into<String>, S2: Into<String>>(start_raw: S1, end_raw: S2) -> Self {
        Self {
            start_raw: start_raw.into(),
            end_raw: end_raw.into(),
            text: String::new(),
        }
    }

    pub(crate) fn push_line(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(line);
    }

    pub fn start_seconds(&self) -> Result<f64> {
        parse_timestamp(&self.start_raw)
    }

    pub fn end_seconds(&self) -> Result<f64> {
        parse_timestamp(&self.end_raw)
    }
}
