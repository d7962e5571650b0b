use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Result, SubmuteError};
use crate::subtitle::BlockScanner;
use crate::vocabulary::Vocabulary;

/// Intervals whose gap is at most this many seconds are coalesced
pub const MERGE_THRESHOLD_SECS: f64 = 1.0;

/// Time range in seconds whose audio is silenced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Finds the blocks of a subtitle source that contain flagged terms and
/// turns them into offset-adjusted intervals.
pub struct IntervalExtractor<'a> {
    vocabulary: &'a Vocabulary,
    offset: f64,
}

impl<'a> IntervalExtractor<'a> {
    pub fn new(vocabulary: &'a Vocabulary, offset: f64) -> Self {
        Self { vocabulary, offset }
    }

    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Interval>> {
        let path = path.as_ref();
        info!("Scanning subtitles: {}", path.display());

        let file = File::open(path).map_err(|source| SubmuteError::SubtitleRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.extract(BufReader::new(file))
    }

    pub fn extract_str(&self, content: &str) -> Result<Vec<Interval>> {
        self.extract(Cursor::new(content))
    }

    /// One pass over `reader`. Order follows the source; overlaps are left
    /// for [`merge_intervals`].
    pub fn extract<R: BufRead>(&self, reader: R) -> Result<Vec<Interval>> {
        let mut intervals = Vec::new();

        for block in BlockScanner::new(reader) {
            let block = block?;
            let start = block.start_seconds()?;
            let end = block.end_seconds()?;

            let Some(term) = self.vocabulary.find_match(&block.text) else {
                continue;
            };
            debug!("Matched '{}' in block {} --> {}", term, block.start_raw, block.end_raw);

            if end < start {
                warn!(
                    "Block {} --> {} ends before it starts, skipping",
                    block.start_raw, block.end_raw
                );
                continue;
            }

            let adjusted_start = start + self.offset;
            let adjusted_end = end + self.offset;
            if adjusted_start < 0.0 || adjusted_end < 0.0 {
                warn!(
                    "Offset {:.3} makes segment ({:.3}, {:.3}) negative, skipping",
                    self.offset, start, end
                );
                continue;
            }

            intervals.push(Interval::new(adjusted_start, adjusted_end));
        }

        info!("Found {} segments to mute", intervals.len());
        Ok(intervals)
    }
}

/// Collapse overlapping intervals and those separated by at most
/// [`MERGE_THRESHOLD_SECS`] into a sorted, disjoint set.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    if intervals.is_empty() {
        return intervals;
    }

    intervals.sort_unstable_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged = Vec::with_capacity(intervals.len());
    let mut current = intervals[0];
    for next in intervals.into_iter().skip(1) {
        if next.start <= current.end + MERGE_THRESHOLD_SECS {
            current.end = current.end.max(next.end);
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intervals(pairs: &[(f64, f64)]) -> Vec<Interval> {
        pairs.iter().map(|&(s, e)| Interval::new(s, e)).collect()
    }

    fn vocabulary() -> Vocabulary {
        Vocabulary::new(["fuck", "shit"])
    }

    #[test]
    fn test_extract_with_negative_offset() {
        let vocabulary = vocabulary();
        let extractor = IntervalExtractor::new(&vocabulary, -0.5);
        let result = extractor
            .extract_str("1\n00:00:05,000 --> 00:00:06,000\nWhat the fuck\n\n")
            .unwrap();
        assert_eq!(result, intervals(&[(4.5, 5.5)]));
    }

    #[test]
    fn test_extract_drops_negative_candidates() {
        let vocabulary = vocabulary();
        let extractor = IntervalExtractor::new(&vocabulary, -10.0);
        let content = "1\n00:00:05,000 --> 00:00:06,000\nfuck\n\n2\n00:00:20,000 --> 00:00:21,000\nshit\n";
        let result = extractor.extract_str(content).unwrap();
        assert_eq!(result, intervals(&[(10.0, 11.0)]));
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_extract_warns_on_dropped_candidate() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let vocabulary = vocabulary();
        let extractor = IntervalExtractor::new(&vocabulary, -10.0);
        let content = "1\n00:00:05,000 --> 00:00:06,000\nfuck\n\n2\n00:00:20,000 --> 00:00:21,000\nshit\n";
        let result = tracing::subscriber::with_default(subscriber, || extractor.extract_str(content).unwrap());
        assert_eq!(result, intervals(&[(10.0, 11.0)]));

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        let warning = output
            .lines()
            .find(|line| line.contains("WARN"))
            .expect("no warning emitted");
        assert!(warning.contains("-10.000"), "{}", warning);
        assert!(warning.contains("(5.000, 6.000)"), "{}", warning);
        assert_eq!(output.lines().filter(|line| line.contains("WARN")).count(), 1);
    }

    #[test]
    fn test_extract_last_block_without_blank_line() {
        let vocabulary = vocabulary();
        let extractor = IntervalExtractor::new(&vocabulary, 0.0);
        let result = extractor
            .extract_str("1\n00:00:01,000 --> 00:00:02,000\nclean\n\n2\n00:00:07,250 --> 00:00:08,000\nOh SHIT")
            .unwrap();
        assert_eq!(result, intervals(&[(7.25, 8.0)]));
    }

    #[test]
    fn test_extract_one_interval_per_block() {
        let vocabulary = vocabulary();
        let extractor = IntervalExtractor::new(&vocabulary, 0.0);
        let result = extractor
            .extract_str("00:00:01,000 --> 00:00:02,000\nfuck this\nshit\n")
            .unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_extract_preserves_source_order() {
        let vocabulary = vocabulary();
        let extractor = IntervalExtractor::new(&vocabulary, 0.0);
        let content = "00:00:09,000 --> 00:00:10,000\nshit\n\n00:00:01,000 --> 00:00:02,000\nfuck\n";
        let result = extractor.extract_str(content).unwrap();
        assert_eq!(result, intervals(&[(9.0, 10.0), (1.0, 2.0)]));
    }

    #[test]
    fn test_extract_skips_inverted_block() {
        let vocabulary = vocabulary();
        let extractor = IntervalExtractor::new(&vocabulary, 0.0);
        let result = extractor
            .extract_str("00:00:06,000 --> 00:00:05,000\nfuck\n")
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_extract_malformed_timestamp_is_fatal() {
        let vocabulary = vocabulary();
        let extractor = IntervalExtractor::new(&vocabulary, 0.0);
        let err = extractor
            .extract_str("00:00:01,000 --> 00:00:02,000\nfuck\n\n00:61:00,000 --> 00:61:01,000\nclean\n")
            .unwrap_err();
        assert!(matches!(err, SubmuteError::MalformedTimestamp(_)));
    }

    #[test]
    fn test_extract_missing_file() {
        let vocabulary = vocabulary();
        let extractor = IntervalExtractor::new(&vocabulary, 0.0);
        let err = extractor.extract_file("/nonexistent/movie.srt").unwrap_err();
        assert!(matches!(err, SubmuteError::SubtitleRead { .. }));
    }

    #[test]
    fn test_merge_example() {
        let merged = merge_intervals(intervals(&[(1.0, 2.0), (2.5, 3.0), (10.0, 11.0)]));
        assert_eq!(merged, intervals(&[(1.0, 3.0), (10.0, 11.0)]));
    }

    #[test]
    fn test_merge_unsorted_and_contained() {
        let merged = merge_intervals(intervals(&[(10.0, 11.0), (1.0, 8.0), (2.0, 3.0), (9.0, 9.5)]));
        assert_eq!(merged, intervals(&[(1.0, 11.0)]));
    }

    #[test]
    fn test_merge_threshold_boundary() {
        let merged = merge_intervals(intervals(&[(1.0, 2.0), (3.0, 4.0)]));
        assert_eq!(merged, intervals(&[(1.0, 4.0)]));

        let merged = merge_intervals(intervals(&[(1.0, 2.0), (3.001, 4.0)]));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_intervals(Vec::new()).is_empty());
    }

    #[test]
    fn test_merge_idempotent_and_separated() {
        let input = intervals(&[
            (30.0, 31.0), (0.5, 1.0), (1.2, 1.4), (5.0, 9.0), (6.0, 7.0),
            (10.5, 12.0), (45.0, 45.5), (44.0, 44.2), (100.0, 100.0),
        ]);
        let merged = merge_intervals(input);

        for interval in &merged {
            assert!(interval.start <= interval.end);
        }
        for pair in merged.windows(2) {
            assert!(pair[1].start > pair[0].end + MERGE_THRESHOLD_SECS);
        }
        assert_eq!(merge_intervals(merged.clone()), merged);
    }
}
