use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single fully-resolved (book, chapter, verse) lookup, the smallest unit
/// the reference parser produces. The version is attached by the caller
/// after parsing, before the text lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseReference {
    pub book_abbrev: String,
    pub chapter: i32,
    pub verse: i32,
    pub version_abbrev: Option<String>,
}

impl VerseReference {
    pub fn new(book_abbrev: &str, chapter: i32, verse: i32) -> Self {
        VerseReference {
            book_abbrev: book_abbrev.to_string(),
            chapter,
            verse,
            version_abbrev: None,
        }
    }

    pub fn with_version(mut self, version_abbrev: &str) -> Self {
        self.version_abbrev = Some(version_abbrev.to_string());
        self
    }
}

impl fmt::Display for VerseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version_abbrev {
            Some(v) => write!(f, "{} {}:{} {}", self.book_abbrev, self.chapter, self.verse, v),
            None => write!(f, "{} {}:{}", self.book_abbrev, self.chapter, self.verse),
        }
    }
}

/// One row of the book catalog as seen by the name resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookCatalogEntry {
    pub abbrev: String,
    pub full_name: String,
}

/// Parse failures are user-input errors. Any failure aborts the whole
/// parse; partial results are never returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid reference format: '{segment}'")]
    InvalidFormat { segment: String },

    #[error("Invalid verse range: '{token}'")]
    InvalidRange { token: String },

    #[error("Invalid verse number: '{token}'")]
    InvalidVerse { token: String },
}

/// Raised by the resolver when a name is missing from the index; the parser
/// reports it to callers as `ParseError::InvalidFormat`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown book name: '{book_name}'")]
pub struct BookNotFound {
    pub book_name: String,
}
