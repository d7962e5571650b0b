use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::debug;

use crate::error::{Result, SubmuteError};

/// Abstract media processing command representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media processing command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Set video codec
    pub fn video_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Set audio codec
    pub fn audio_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Copy video stream
    pub fn copy_video(self) -> Self {
        self.video_codec("copy")
    }

    /// Copy every stream
    pub fn copy_all(self) -> Self {
        self.arg("-c").arg("copy")
    }

    /// Add audio filter
    pub fn audio_filter<S: Into<String>>(self, filter: S) -> Self {
        self.arg("-af").arg(filter)
    }

    /// Insert arguments just before the last one (the output path)
    pub fn before_output<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let output = self.args.pop();
        self.args.extend(extra.into_iter().map(|s| s.into()));
        self.args.extend(output);
        self
    }

    /// Run to completion, returning stdout
    pub async fn execute(&self) -> Result<String> {
        debug!("Executing media processing command: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| SubmuteError::Media(format!("Failed to execute {}: {}", self.binary_path, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SubmuteError::Media(format!(
                "{} failed: {}",
                self.description,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Launch without waiting, stdout piped for progress reading
    pub fn spawn(&self) -> Result<Child> {
        debug!("Spawning media processing command: {} {:?}", self.binary_path, self.args);

        Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SubmuteError::Media(format!("Failed to start {}: {}", self.binary_path, e)))
    }
}

/// Builder for the ffmpeg/ffprobe invocations used here
pub struct MediaCommandBuilder {
    binary_path: String,
    probe_path: String,
}

impl MediaCommandBuilder {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, probe_path: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            probe_path: probe_path.into(),
        }
    }

    /// Plain remux, nothing filtered
    pub fn stream_copy(&self, input: &str, output: &str) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Stream copy")
            .input(input)
            .copy_all()
            .overwrite()
            .output(output)
    }

    /// Apply `audio_filter`, copy video, re-encode audio to AAC
    pub fn mute_audio(&self, input: &str, output: &str, audio_filter: &str) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Audio muting")
            .input(input)
            .audio_filter(audio_filter)
            .copy_video()
            .audio_codec("aac")
            .overwrite()
            .output(output)
    }

    /// Print the container duration in seconds on stdout
    pub fn probe_duration<P: AsRef<Path>>(&self, media: P) -> MediaCommand {
        MediaCommand::new(&self.probe_path, "Duration probe")
            .args(["-v", "quiet", "-show_entries", "format=duration", "-of", "csv=p=0"])
            .output(media)
    }
}
