use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::directive::MuteDirective;
use crate::error::{Result, SubmuteError};
use crate::interval::{merge_intervals, Interval, IntervalExtractor};
use crate::media::{MediaCommandBuilder, MediaProcessorFactory, MediaProcessorTrait};
use crate::vocabulary::Vocabulary;

/// Everything one mute run needs
#[derive(Debug, Clone)]
pub struct MuteRequest {
    pub subtitle_path: PathBuf,
    pub input_media: PathBuf,
    pub output_media: PathBuf,
    /// Seconds added to both boundaries of every matched block
    pub offset: f64,
    pub vocabulary: Vocabulary,
}

/// Result of planning a request: the intervals found and the directive
/// that mutes them
#[derive(Debug, Clone)]
pub struct MutePlan {
    pub raw_intervals: Vec<Interval>,
    pub merged_intervals: Vec<Interval>,
    pub directive: MuteDirective,
}

/// Build the mute plan for `request`, using `builder` for the executable
/// command. Reads the subtitle file once and has no other side effects.
pub fn plan_request(request: &MuteRequest, builder: &MediaCommandBuilder) -> Result<MutePlan> {
    info!("Using offset: {:.1} seconds", request.offset);
    info!("Input video: {}", request.input_media.display());
    info!("Output video: {}", request.output_media.display());

    let extractor = IntervalExtractor::new(&request.vocabulary, request.offset);
    let raw_intervals = extractor.extract_file(&request.subtitle_path)?;

    let merged_intervals = merge_intervals(raw_intervals.clone());
    info!("Merged to {} segments", merged_intervals.len());

    let directive = MuteDirective::generate_with(
        builder,
        &merged_intervals,
        &request.input_media.to_string_lossy(),
        &request.output_media.to_string_lossy(),
    );

    Ok(MutePlan {
        raw_intervals,
        merged_intervals,
        directive,
    })
}

pub struct Workflow {
    config: Config,
    media: Box<dyn MediaProcessorTrait>,
}

impl Workflow {
    pub fn new(config: Config) -> Self {
        let media = MediaProcessorFactory::create_processor(config.media.clone());
        Self::with_processor(config, media)
    }

    pub fn with_processor(config: Config, media: Box<dyn MediaProcessorTrait>) -> Self {
        Self { config, media }
    }

    pub fn plan(&self, request: &MuteRequest) -> Result<MutePlan> {
        let builder = MediaCommandBuilder::new(&self.config.media.binary_path, &self.config.media.probe_path);
        plan_request(request, &builder)
    }

    /// Run a plan's directive. A failed duration probe only disables
    /// percentage progress.
    pub async fn execute(&self, plan: &MutePlan, input_media: &Path) -> Result<()> {
        self.media.check_availability()?;

        if !input_media.exists() {
            return Err(SubmuteError::FileNotFound(input_media.display().to_string()));
        }

        let duration = match self.media.probe_duration(input_media).await {
            Ok(d) if d > 0.0 => Some(d),
            Ok(d) => {
                warn!("Ignoring non-positive video duration {}", d);
                None
            }
            Err(e) => {
                warn!("Could not get video duration: {}", e);
                None
            }
        };

        if plan.directive.is_copy_only() {
            info!("No segments to mute, copying input to output");
        }

        self.media.execute_directive(&plan.directive, duration).await
    }

    /// Plan and execute in one go
    pub async fn process(&self, request: &MuteRequest) -> Result<MutePlan> {
        let plan = self.plan(request)?;
        self.execute(&plan, &request.input_media).await?;
        Ok(plan)
    }
}
