use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Result, SubmuteError};

/// Terms used when neither a vocabulary file nor saved settings exist
pub const DEFAULT_TERMS: &[&str] = &[
    "asshole", "cunt", "shit", "fuck", "fucker", "mother fucker", "bullshit",
    "fucking", "shithead", "cock", "jesus", "Jesus", "Christ", "christ",
    "Jesus Christ", "jesus christ", "Goddammit", "goddammit", "Goddamn",
    "goddamn", "God damn", "god damn", "bitch", "dickhead",
];

const SETTINGS_FILE_NAME: &str = ".submute-settings.json";

/// Ordered set of flagged terms, matched case-insensitively as substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
    folded: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary, trimming each term and dropping blank ones.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.into().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        let folded = terms.iter().map(|t| t.to_lowercase()).collect();

        Self { terms, folded }
    }

    pub fn default_terms() -> Self {
        Self::new(DEFAULT_TERMS.iter().copied())
    }

    /// Read a vocabulary file: one term per line, blank lines skipped
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SubmuteError::Vocabulary(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let vocabulary = Self::new(content.lines());
        info!("Loaded {} terms from {}", vocabulary.len(), path.display());
        Ok(vocabulary)
    }

    /// First term contained in `text`, ignoring case
    pub fn find_match(&self, text: &str) -> Option<&str> {
        let text = text.to_lowercase();
        self.folded
            .iter()
            .position(|term| text.contains(term.as_str()))
            .map(|i| self.terms[i].as_str())
    }

    pub fn matches(&self, text: &str) -> bool {
        self.find_match(text).is_some()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Append a term unless an identical one is already present
    pub fn add(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() || self.terms.iter().any(|t| t == term) {
            return false;
        }
        self.terms.push(term.to_string());
        self.folded.push(term.to_lowercase());
        true
    }

    /// Remove every occurrence of `term` (exact match)
    pub fn remove(&mut self, term: &str) -> bool {
        let term = term.trim();
        let before = self.terms.len();
        let mut i = 0;
        while i < self.terms.len() {
            if self.terms[i] == term {
                self.terms.remove(i);
                self.folded.remove(i);
            } else {
                i += 1;
            }
        }
        self.terms.len() != before
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Settings {
    swear_words: Vec<String>,
}

/// JSON-backed persistence of the vocabulary, `{"swear_words": [...]}`.
pub struct VocabularyStore {
    path: PathBuf,
}

impl VocabularyStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.submute-settings.json`, falling back to the working
    /// directory when no home directory is known.
    pub fn default_location() -> Self {
        let base = dirs::home_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_default();
        Self::new(base.join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved vocabulary, or `None` when the file is missing, unreadable or
    /// holds no terms.
    pub fn load(&self) -> Option<Vocabulary> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                debug!("No vocabulary settings at {}: {}", self.path.display(), e);
                return None;
            }
        };

        let settings: Settings = match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring unreadable settings file {}: {}", self.path.display(), e);
                return None;
            }
        };

        let vocabulary = Vocabulary::new(settings.swear_words);
        if vocabulary.is_empty() {
            None
        } else {
            Some(vocabulary)
        }
    }

    pub fn save(&self, vocabulary: &Vocabulary) -> Result<()> {
        let settings = Settings {
            swear_words: vocabulary.terms().to_vec(),
        };
        let data = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&self.path, data)?;

        info!("Saved {} terms to {}", vocabulary.len(), self.path.display());
        Ok(())
    }

    pub fn reset(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
