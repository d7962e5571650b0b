use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, Split};

use crate::error::Result;
use super::SubtitleBlock;

/// `<start> --> <end>` with anything after the end timestamp ignored
/// (positioning metadata and similar annotations). Digits are ASCII only
/// and the start timestamp must not continue another word.
static TIME_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([0-9]+:[0-9]{2}:[0-9]{2},[0-9]{3})\s*-->\s*([0-9]+:[0-9]{2}:[0-9]{2},[0-9]{3})")
        .expect("time range pattern is valid")
});

/// Match a time range line, returning the raw start and end timestamps.
pub fn match_time_range(line: &str) -> Option<(&str, &str)> {
    let caps = TIME_RANGE_REGEX.captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

enum ScanState {
    Outside,
    Inside(SubtitleBlock),
}

/// Single forward pass over an SRT document, yielding one block per
/// time range line.
///
/// Lines are split on raw bytes and decoded lossily, so legacy encodings
/// only degrade the affected characters.
///
/// Outside a block, only a time range line matters; everything else
/// (sequence numbers, preamble) is skipped. Inside a block, a blank line or
/// end of input closes it and every other line, another time range line
/// included, is appended to the block text.
pub struct BlockScanner<R: BufRead> {
    lines: Split<R>,
    state: ScanState,
    finished: bool,
}

impl<R: BufRead> BlockScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.split(b'\n'),
            state: ScanState::Outside,
            finished: false,
        }
    }

    fn take_block(&mut self) -> Option<SubtitleBlock> {
        match std::mem::replace(&mut self.state, ScanState::Outside) {
            ScanState::Inside(block) => Some(block),
            ScanState::Outside => None,
        }
    }
}

impl<R: BufRead> Iterator for BlockScanner<R> {
    type Item = Result<SubtitleBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.finished = true;
                    return self.take_block().map(Ok);
                }
            };
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();

            match &mut self.state {
                ScanState::Outside => {
                    if let Some((start, end)) = match_time_range(line) {
                        self.state = ScanState::Inside(SubtitleBlock::new(start, end));
                    }
                }
                ScanState::Inside(block) => {
                    if line.is_empty() {
                        return self.take_block().map(Ok);
                    }
                    block.push_line(line);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scan(content: &str) -> Vec<SubtitleBlock> {
        BlockScanner::new(Cursor::new(content))
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_scan_blocks() {
        let content = "1\n00:00:01,000 --> 00:00:02,500\nHello there\nGeneral Kenobi\n\n2\n00:00:03,000 --> 00:00:04,000\nSecond\n\n";
        let blocks = scan(content);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].start_raw, "00:00:01,000");
        assert_eq!(blocks[0].end_raw, "00:00:02,500");
        assert_eq!(blocks[0].text, "Hello there General Kenobi");
        assert_eq!(blocks[1].text, "Second");
    }

    #[test]
    fn test_last_block_without_trailing_blank_line() {
        let blocks = scan("1\n00:00:05,000 --> 00:00:06,000\nfinal words");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "final words");
    }

    #[test]
    fn test_trailing_annotation_is_ignored() {
        let blocks = scan("00:00:05,000 --> 00:00:06,000 X1:100 X2:200 Y1:10 Y2:20\ntext\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].end_raw, "00:00:06,000");
    }

    #[test]
    fn test_time_range_inside_block_is_text() {
        let blocks = scan("00:00:01,000 --> 00:00:02,000\nfirst\n00:00:03,000 --> 00:00:04,000\nsecond\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_raw, "00:00:01,000");
        assert_eq!(blocks[0].text, "first 00:00:03,000 --> 00:00:04,000 second");
    }

    #[test]
    fn test_whitespace_only_line_ends_block() {
        let blocks = scan("00:00:01,000 --> 00:00:02,000\n  Padded  \n   \t\nignored preamble\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Padded");
    }

    #[test]
    fn test_malformed_range_lines_are_skipped() {
        let blocks = scan("00:00:01.000 --> 00:00:02.000\nperiod separated\n\n00:00:01,000 -> 00:00:02,000\nshort arrow\n");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let blocks = scan("1\r\n00:00:01,000 --> 00:00:02,000\r\nWindows text\r\n\r\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Windows text");
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let content: &[u8] = b"1\n00:00:01,000 --> 00:00:02,000\ncaf\xE9\n\n2\n00:00:05,000 --> 00:00:06,000\nfuck\n";
        let blocks: Vec<_> = BlockScanner::new(content)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "caf\u{FFFD}");
        assert_eq!(blocks[1].start_raw, "00:00:05,000");
        assert_eq!(blocks[1].text, "fuck");
    }

    #[test]
    fn test_non_ascii_digits_do_not_start_block() {
        assert!(match_time_range("\u{0660}0:00:01,000 --> 00:00:02,000").is_none());

        let blocks = scan("\u{0660}0:00:01,000 --> 00:00:02,000\nhi\n\n00:00:05,000 --> 00:00:06,000\nfuck\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_raw, "00:00:05,000");
    }

    #[test]
    fn test_empty_input() {
        assert!(scan("").is_empty());
    }
}
