//! Submute - mute flagged words in a video using its subtitles
//!
//! Scans an SRT file for blocks containing flagged vocabulary, turns them
//! into merged time intervals and renders an ffmpeg `volume` filter that
//! silences exactly those intervals.

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod interval;
pub mod media;
pub mod subtitle;
pub mod vocabulary;
pub mod workflow;
