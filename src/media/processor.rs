use async_trait::async_trait;
use std::path::Path;
use std::process::Command as StdCommand;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::config::MediaConfig;
use crate::directive::MuteDirective;
use crate::error::{Result, SubmuteError};
use super::{MediaCommandBuilder, MediaProcessorTrait, ProgressReporter};

/// Concrete implementation of media processor (FFmpeg-based)
pub struct MediaProcessorImpl {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl MediaProcessorImpl {
    /// Create a new media processor implementation
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path, &config.probe_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl MediaProcessorTrait for MediaProcessorImpl {
    /// Check if media processor is available
    fn check_availability(&self) -> Result<()> {
        let output = StdCommand::new(&self.config.binary_path)
            .arg("-version")
            .output()
            .map_err(|e| SubmuteError::Media(format!("Media processor not found: {}", e)))?;

        if output.status.success() {
            info!("Media processor is available");
            Ok(())
        } else {
            Err(SubmuteError::Media("Media processor version check failed".to_string()))
        }
    }

    async fn probe_duration(&self, media_path: &Path) -> Result<f64> {
        let stdout = self.command_builder.probe_duration(media_path).execute().await?;
        let text = stdout.trim();

        let duration: f64 = text
            .parse()
            .map_err(|_| SubmuteError::Media(format!("Unexpected duration output: '{}'", text)))?;
        debug!("Probed duration of {}: {:.3}s", media_path.display(), duration);
        Ok(duration)
    }

    async fn execute_directive(&self, directive: &MuteDirective, duration: Option<f64>) -> Result<()> {
        let command = directive
            .command
            .clone()
            .before_output(["-progress", "pipe:1", "-nostats"]);

        info!("Running: {} {}", command.binary_path, command.args.join(" "));
        match duration {
            Some(d) => info!("Video duration: {:.1} minutes", d / 60.0),
            None => info!("Processing video... This may take several minutes depending on video length."),
        }

        let reporter = ProgressReporter::new(duration, self.config.show_progress);
        let mut child = command.spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SubmuteError::Media("Progress pipe unavailable".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| SubmuteError::Media("Error pipe unavailable".to_string()))?;

        // Drain stderr concurrently so a chatty ffmpeg cannot block on a full pipe.
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        });

        let mut lines = BufReader::new(stdout).lines();
        let progress = async {
            let mut last_logged = -1i64;
            while let Some(line) = lines.next_line().await? {
                if let Some(snapshot) = reporter.update(&line) {
                    let decile = (snapshot.percentage / 10.0) as i64;
                    if decile > last_logged {
                        last_logged = decile;
                        debug!("Progress: {:.1}% complete", snapshot.percentage);
                    }
                }
            }
            child.wait().await.map_err(SubmuteError::from)
        };

        let status = tokio::select! {
            status = progress => status?,
            _ = tokio::signal::ctrl_c() => {
                reporter.abandon("Cancelled");
                warn!("Interrupted, stopping ffmpeg");
                // child is dropped with kill_on_drop set
                return Err(SubmuteError::Cancelled);
            }
        };

        let stderr_output = stderr_task.await.unwrap_or_default();
        if !status.success() {
            reporter.abandon("Failed");
            return Err(SubmuteError::Media(format!(
                "{} failed ({}): {}",
                command.description,
                status,
                stderr_output.trim()
            )));
        }

        reporter.finish("Processing complete");
        info!("Processing complete: {}", command.args.last().map(String::as_str).unwrap_or_default());
        Ok(())
    }
}
