use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the ffmpeg command that mutes flagged words
    Plan(MuteArgs),

    /// Generate the ffmpeg command and run it
    Run(MuteArgs),

    /// Manage the saved vocabulary
    Words {
        #[command(subcommand)]
        action: WordsAction,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct MuteArgs {
    /// SRT subtitle file
    #[arg(short, long)]
    pub srt: PathBuf,

    /// Input video file
    #[arg(short = 'i', long)]
    pub video: PathBuf,

    /// Output video file (default: <video>-CLEAN.mp4 next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seconds added to subtitle timestamps
    /// (positive = subtitles too early, negative = subtitles too late)
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<f64>,

    /// File with words to mute, one per line
    #[arg(short = 'w', long)]
    pub swears: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum WordsAction {
    /// Show the vocabulary currently in effect
    List,

    /// Add a word or phrase
    Add {
        word: String,
    },

    /// Remove a word or phrase
    Remove {
        word: String,
    },

    /// Replace the saved vocabulary with the contents of a file
    Import {
        file: PathBuf,
    },

    /// Delete saved vocabulary and go back to the built-in list
    Reset,
}
