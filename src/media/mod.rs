// Media processing layer
//
// - commands: ffmpeg/ffprobe argument builders and process launch
// - processor: ffmpeg-backed implementation of MediaProcessorTrait
// - progress: `-progress pipe:1` parsing and terminal display

pub mod commands;
pub mod processor;
pub mod progress;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use processor::*;
pub use progress::*;

use crate::config::MediaConfig;
use crate::directive::MuteDirective;
use crate::error::Result;

/// Main trait for media processing operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProcessorTrait: Send + Sync {
    /// Check if media processor is available
    fn check_availability(&self) -> Result<()>;

    /// Total media duration in seconds
    async fn probe_duration(&self, media_path: &Path) -> Result<f64>;

    /// Run a mute directive to completion, reporting progress against
    /// `duration` when it is known
    async fn execute_directive(&self, directive: &MuteDirective, duration: Option<f64>) -> Result<()>;
}

/// Factory for creating media processor instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default media processor implementation (FFmpeg-based)
    pub fn create_processor(config: MediaConfig) -> Box<dyn MediaProcessorTrait> {
        Box::new(processor::MediaProcessorImpl::new(config))
    }
}
