use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::book_index::BookNameResolver;
use crate::types::{ParseError, VerseReference};

lazy_static! {
    // "João 3:16-18, 20" / "1Pe 2:22" / "Cântico dos Cânticos 2:1"
    // The book name is one or more words of letters and digits; the lazy
    // quantifier leaves the chapter number to the second group.
    static ref RE_SEGMENT: Regex = Regex::new(r"^([\p{L}\d][\p{L}\d ]*?)\s+(\d+):(.*)$").unwrap();

    static ref RE_COMMA_SPACING: Regex = Regex::new(r",\s*").unwrap();
}

/// Expands a free-text reference string like
/// `"João 3:16-18, 20; 1Pe 2:22"` into the ordered sequence of
/// single-verse lookups it denotes.
pub struct ReferenceParser {
    resolver: Arc<BookNameResolver>,
}

impl ReferenceParser {
    pub fn new(resolver: Arc<BookNameResolver>) -> Self {
        ReferenceParser { resolver }
    }

    /// Parse one reference string. Book segments are separated by `;`
    /// (empty segments are skipped); within a segment, verse tokens are
    /// separated by `,` and expanded left to right. Any malformed segment
    /// or token fails the whole parse; no partial output is returned.
    pub fn parse(&self, input: &str) -> Result<Vec<VerseReference>, ParseError> {
        let mut refs = Vec::new();
        for segment in input.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            self.parse_segment(segment, &mut refs)?;
        }
        Ok(refs)
    }

    fn parse_segment(&self, segment: &str, out: &mut Vec<VerseReference>) -> Result<(), ParseError> {
        // Tolerate "16,17" and "16, 17" alike.
        let segment = RE_COMMA_SPACING.replace_all(segment, ", ");

        let caps = RE_SEGMENT
            .captures(&segment)
            .ok_or_else(|| ParseError::InvalidFormat { segment: segment.to_string() })?;

        let book_name = caps[1].trim();
        let chapter: i32 = caps[2].parse().map_err(|_| ParseError::InvalidFormat {
            segment: segment.to_string(),
        })?;
        if chapter < 1 {
            return Err(ParseError::InvalidFormat { segment: segment.to_string() });
        }
        let verse_list = &caps[3];

        // An unresolved book is reported the same way as a malformed
        // segment, carrying the book text the user typed.
        let book_abbrev = self
            .resolver
            .resolve(book_name)
            .map_err(|_| ParseError::InvalidFormat { segment: book_name.to_string() })?;

        for token in verse_list.split(',') {
            let token = token.trim();
            if token.contains(':') {
                // A chapter crossing within the same book ("16, 4:2"):
                // re-enter the grammar with the canonical book name, which
                // always resolves since abbreviations map to themselves.
                self.parse_segment(&format!("{} {}", book_abbrev, token), out)?;
            } else if token.contains('-') {
                let Some((start, end)) = token.split_once('-') else {
                    return Err(ParseError::InvalidRange { token: token.to_string() });
                };
                let start = parse_verse_number(start)
                    .ok_or_else(|| ParseError::InvalidRange { token: token.to_string() })?;
                let end = parse_verse_number(end)
                    .ok_or_else(|| ParseError::InvalidRange { token: token.to_string() })?;
                // An inverted range ("16-14") expands to nothing.
                for verse in start..=end {
                    out.push(VerseReference::new(&book_abbrev, chapter, verse));
                }
            } else {
                let verse = parse_verse_number(token)
                    .ok_or_else(|| ParseError::InvalidVerse { token: token.to_string() })?;
                out.push(VerseReference::new(&book_abbrev, chapter, verse));
            }
        }

        Ok(())
    }
}

fn parse_verse_number(s: &str) -> Option<i32> {
    s.trim().parse::<i32>().ok().filter(|v| *v >= 1)
}
