//! Identifier word lists
//!
//! `SectionNames.txt` and `FieldNames.txt` hold one identifier per line.
//! They are read once at startup; a missing or unreadable list degrades to
//! an empty one.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// File holding section identifiers
pub const SECTION_NAMES_FILE: &str = "SectionNames.txt";
/// File holding field identifiers
pub const FIELD_NAMES_FILE: &str = "FieldNames.txt";

/// An ordered, immutable list of identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Build from text, one identifier per line.
    ///
    /// Blank lines and trailing `\r` are dropped; order and duplicates are
    /// kept.
    pub fn parse(contents: &str) -> Self {
        let words = contents
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        Self { words }
    }

    /// Load a list from disk, falling back to an empty list
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let list = Self::parse(&contents);
                if list.is_empty() {
                    warn!(path = %path.display(), "word list is empty");
                } else {
                    info!(path = %path.display(), count = list.len(), "loaded word list");
                }
                list
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "word list unavailable");
                Self::default()
            }
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<Vec<String>> for WordList {
    fn from(words: Vec<String>) -> Self {
        Self { words }
    }
}

/// The section and field lists from a data directory
#[derive(Debug, Clone, Default)]
pub struct WordLists {
    pub sections: WordList,
    pub fields: WordList,
}

impl WordLists {
    /// Load both lists from `data_dir`
    pub fn load(data_dir: &Path) -> Self {
        Self {
            sections: WordList::load(&data_dir.join(SECTION_NAMES_FILE)),
            fields: WordList::load(&data_dir.join(FIELD_NAMES_FILE)),
        }
    }

    /// Default location, relative to the working directory
    pub fn default_dir() -> PathBuf {
        PathBuf::from("./Data")
    }
}
