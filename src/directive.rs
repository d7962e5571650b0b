use crate::interval::Interval;
use crate::media::{MediaCommand, MediaCommandBuilder};

/// The ffmpeg invocation that mutes a set of intervals.
///
/// `command_line` is the exact text shown to users and is stable for a
/// given ordered interval set. `filter_expression` is the `enable`
/// predicate on its own, so callers never need to cut it back out of the
/// command line. `command` is the same invocation as an argument vector,
/// with `-y` added so the output is overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct MuteDirective {
    pub command_line: String,
    pub filter_expression: Option<String>,
    pub command: MediaCommand,
}

impl MuteDirective {
    pub fn generate(intervals: &[Interval], input: &str, output: &str) -> Self {
        Self::generate_with(&MediaCommandBuilder::new("ffmpeg", "ffprobe"), intervals, input, output)
    }

    /// Same as [`MuteDirective::generate`] but the executable command uses
    /// the builder's binaries.
    pub fn generate_with(
        builder: &MediaCommandBuilder,
        intervals: &[Interval],
        input: &str,
        output: &str,
    ) -> Self {
        if intervals.is_empty() {
            return Self {
                command_line: format!("ffmpeg -i \"{}\" -c copy \"{}\"", input, output),
                filter_expression: None,
                command: builder.stream_copy(input, output),
            };
        }

        let expression = enable_expression(intervals);
        let filter = volume_filter(&expression);

        Self {
            command_line: format!(
                "ffmpeg -i \"{}\" -af \"{}\" -c:v copy -c:a aac \"{}\"",
                input, filter, output
            ),
            command: builder.mute_audio(input, output, &filter),
            filter_expression: Some(expression),
        }
    }

    pub fn is_copy_only(&self) -> bool {
        self.filter_expression.is_none()
    }
}

/// `between(t,S,E)` per interval joined with `+`, millisecond precision
pub fn enable_expression(intervals: &[Interval]) -> String {
    intervals
        .iter()
        .map(|i| format!("between(t,{:.3},{:.3})", i.start, i.end))
        .collect::<Vec<_>>()
        .join("+")
}

/// Zero the volume whenever `expression` is non-zero
pub fn volume_filter(expression: &str) -> String {
    format!("volume=enable='{}':volume=0", expression)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_only_directive() {
        let directive = MuteDirective::generate(&[], "C:\\Videos\\my movie.mkv", "out put.mp4");
        assert_eq!(
            directive.command_line,
            "ffmpeg -i \"C:\\Videos\\my movie.mkv\" -c copy \"out put.mp4\""
        );
        assert!(directive.is_copy_only());
        assert_eq!(directive.command.args[1], "C:\\Videos\\my movie.mkv");
    }

    #[test]
    fn test_filtered_directive() {
        let intervals = [Interval::new(1.0, 3.0), Interval::new(10.0, 11.5)];
        let directive = MuteDirective::generate(&intervals, "in.mkv", "out.mp4");

        assert_eq!(
            directive.command_line,
            "ffmpeg -i \"in.mkv\" -af \"volume=enable='between(t,1.000,3.000)+between(t,10.000,11.500)':volume=0\" -c:v copy -c:a aac \"out.mp4\""
        );
        assert_eq!(
            directive.filter_expression.as_deref(),
            Some("between(t,1.000,3.000)+between(t,10.000,11.500)")
        );
    }

    #[test]
    fn test_filter_expression_is_recoverable_from_command_line() {
        let intervals = [Interval::new(4.5, 5.5), Interval::new(83.456, 84.0)];
        let directive = MuteDirective::generate(&intervals, "a.mp4", "b.mp4");
        let line = &directive.command_line;

        let start = line.find("between(").unwrap();
        let end = line.rfind(')').unwrap();
        assert_eq!(Some(&line[start..=end]), directive.filter_expression.as_deref());
    }

    #[test]
    fn test_deterministic_output() {
        let intervals = [Interval::new(0.1234, 0.5), Interval::new(2.0, 2.25)];
        let a = MuteDirective::generate(&intervals, "in", "out");
        let b = MuteDirective::generate(&intervals, "in", "out");
        assert_eq!(a, b);
        assert_eq!(
            a.filter_expression.as_deref(),
            Some("between(t,0.123,0.500)+between(t,2.000,2.250)")
        );
    }

    #[test]
    fn test_executable_command_uses_builder_binary() {
        let builder = MediaCommandBuilder::new("/usr/local/bin/ffmpeg", "ffprobe");
        let directive = MuteDirective::generate_with(&builder, &[Interval::new(1.0, 2.0)], "in", "out");
        assert_eq!(directive.command.binary_path, "/usr/local/bin/ffmpeg");
        assert!(directive.command_line.starts_with("ffmpeg -i "));
        assert!(directive.command.args.contains(&"-y".to_string()));
    }
}
