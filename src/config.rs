use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, SubmuteError};

fn default_output_suffix() -> String {
    "-CLEAN".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mute: MuteConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuteConfig {
    /// Seconds added to every subtitle timestamp.
    /// Positive when subtitles appear too early, negative when too late.
    #[serde(default)]
    pub offset: f64,
    /// Suffix appended to the input file stem when no output path is given
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Path to ffprobe binary, used for duration probing
    pub probe_path: String,
    /// Show a progress bar while ffmpeg runs
    pub show_progress: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Location of the JSON vocabulary settings file.
    /// Defaults to `~/.submute-settings.json`.
    pub settings_path: Option<PathBuf>,
}

impl Default for MuteConfig {
    fn default() -> Self {
        Self {
            offset: 0.0,
            output_suffix: default_output_suffix(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffmpeg".to_string(),
            probe_path: "ffprobe".to_string(),
            show_progress: true,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SubmuteError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SubmuteError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SubmuteError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SubmuteError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Derive the default output path for `video`: same directory,
    /// `<stem><output_suffix>.mp4`.
    pub fn default_output_path(&self, video: &Path) -> PathBuf {
        let stem = video
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        let file_name = format!("{}{}.mp4", stem, self.mute.output_suffix);

        match video.parent() {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}
