use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Current output position in seconds from an ffmpeg `-progress` line.
///
/// Only `out_time_us=` is used; ffmpeg writes microseconds into
/// `out_time_ms=` as well, so that key is not trusted.
pub fn parse_progress_line(line: &str) -> Option<f64> {
    let value = line.trim().strip_prefix("out_time_us=")?;
    let micros: i64 = value.parse().ok()?;
    if micros < 0 {
        return None;
    }
    Some(micros as f64 / 1_000_000.0)
}

/// Progress of a run at `current` seconds into a `total` second media file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub percentage: f64,
    pub remaining: f64,
}

impl ProgressSnapshot {
    pub fn new(current: f64, total: f64) -> Self {
        let percentage = if total > 0.0 {
            (current / total * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            percentage,
            remaining: (total - current).max(0.0),
        }
    }
}

/// Terminal progress display: a percentage bar when the duration is known,
/// a spinner otherwise.
pub struct ProgressReporter {
    bar: ProgressBar,
    duration: Option<f64>,
}

impl ProgressReporter {
    pub fn new(duration: Option<f64>, visible: bool) -> Self {
        let bar = match (visible, duration) {
            (false, _) => ProgressBar::hidden(),
            (true, Some(_)) => {
                let bar = ProgressBar::new(1000);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("#>-"),
                );
                bar
            }
            (true, None) => {
                let bar = ProgressBar::new_spinner();
                bar.enable_steady_tick(Duration::from_millis(120));
                bar.set_message("Processing video...");
                bar
            }
        };

        Self { bar, duration }
    }

    /// Feed one line of `-progress` output, returning the snapshot when the
    /// line carried a position and the duration is known.
    pub fn update(&self, line: &str) -> Option<ProgressSnapshot> {
        let current = parse_progress_line(line)?;
        let duration = self.duration?;
        let snapshot = ProgressSnapshot::new(current, duration);

        self.bar.set_position((snapshot.percentage * 10.0) as u64);
        self.bar.set_message(format!(
            "{:.1}% complete ({:.1}s remaining)",
            snapshot.percentage, snapshot.remaining
        ));
        Some(snapshot)
    }

    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    pub fn abandon(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}
