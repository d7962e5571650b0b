//! Submute - mute flagged words in a video using its subtitles
//!
//! Command line entry point: plans the ffmpeg mute command from an SRT
//! file, optionally runs it, and manages the saved vocabulary.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use submute::cli::{Args, Commands, MuteArgs, WordsAction};
use submute::config::Config;
use submute::vocabulary::{Vocabulary, VocabularyStore};
use submute::workflow::{MuteRequest, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    let store = match &config.vocabulary.settings_path {
        Some(path) => VocabularyStore::new(path),
        None => VocabularyStore::default_location(),
    };

    match args.command {
        Commands::Plan(mute_args) => {
            let request = build_request(&config, &store, &mute_args)?;
            let plan = Workflow::new(config).plan(&request)?;

            println!("Generated FFmpeg command:");
            println!("{}", plan.directive.command_line);
        }
        Commands::Run(mute_args) => {
            let request = build_request(&config, &store, &mute_args)?;
            let workflow = Workflow::new(config);
            let plan = workflow.plan(&request)?;

            println!("{}", plan.directive.command_line);
            workflow.execute(&plan, &request.input_media).await?;
            println!("Wrote {}", request.output_media.display());
        }
        Commands::Words { action } => manage_words(&store, action)?,
    }

    Ok(())
}

/// Resolve CLI arguments and config into a request. Vocabulary comes from
/// `--swears`, then saved settings, then the built-in list.
fn build_request(config: &Config, store: &VocabularyStore, args: &MuteArgs) -> Result<MuteRequest> {
    let vocabulary = match &args.swears {
        Some(path) => Vocabulary::from_file(path)?,
        None => store.load().unwrap_or_else(Vocabulary::default_terms),
    };
    if vocabulary.is_empty() {
        anyhow::bail!("Vocabulary is empty, nothing to mute");
    }
    info!("Using {} vocabulary terms", vocabulary.len());

    let output_media = args
        .output
        .clone()
        .unwrap_or_else(|| config.default_output_path(&args.video));

    Ok(MuteRequest {
        subtitle_path: args.srt.clone(),
        input_media: args.video.clone(),
        output_media,
        offset: args.offset.unwrap_or(config.mute.offset),
        vocabulary,
    })
}

fn manage_words(store: &VocabularyStore, action: WordsAction) -> Result<()> {
    let current = || store.load().unwrap_or_else(Vocabulary::default_terms);

    match action {
        WordsAction::List => {
            let vocabulary = current();
            println!("Vocabulary ({} terms, settings: {}):", vocabulary.len(), store.path().display());
            for term in vocabulary.terms() {
                println!("  {}", term);
            }
        }
        WordsAction::Add { word } => {
            let mut vocabulary = current();
            if vocabulary.add(&word) {
                store.save(&vocabulary)?;
                println!("Added '{}'", word.trim());
            } else {
                println!("'{}' is already in the vocabulary", word.trim());
            }
        }
        WordsAction::Remove { word } => {
            let mut vocabulary = current();
            if vocabulary.remove(&word) {
                store.save(&vocabulary)?;
                println!("Removed '{}'", word.trim());
            } else {
                println!("'{}' is not in the vocabulary", word.trim());
            }
        }
        WordsAction::Import { file } => {
            let vocabulary = Vocabulary::from_file(&file)?;
            if vocabulary.is_empty() {
                anyhow::bail!("{} contains no words", file.display());
            }
            store.save(&vocabulary)?;
            println!("Imported {} terms from {}", vocabulary.len(), file.display());
        }
        WordsAction::Reset => {
            store.reset()?;
            println!("Saved vocabulary removed, using built-in list");
        }
    }

    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".submute").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "submute.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("submute.log").display());

    Ok(())
}
