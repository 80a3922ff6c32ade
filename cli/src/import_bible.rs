use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use biblia_backend::book_index::{BookNameResolver, FALLBACK_BOOKS};
use biblia_backend::db::DbManager;
use biblia_backend::db::bible::BibleDbHandle;
use biblia_backend::db::bible_models::{NewBook, NewChapterVerseCount, NewVerse, NewVersion};
use biblia_backend::logger::{info, warn};

const OLD_TESTAMENT_BOOKS: usize = 39;

/// One book as found in the source JSON: chapters are arrays of verse
/// texts, both 1-indexed by position.
#[derive(Debug, Deserialize)]
struct SourceBook {
    abbrev: String,
    chapters: Vec<Vec<String>>,
}

/// Import a Bible JSON file as a new version. Seeds the testaments and
/// books tables from the built-in book table on first run. Source book
/// abbreviations may carry accents ("Êx"); they are canonicalized through
/// the name resolver, and unknown ones are logged and skipped.
pub fn import_bible_json(
    path: &Path,
    version_abbrev: &str,
    version_name: &str,
    active: bool,
) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let source_books: Vec<SourceBook> =
        serde_json::from_str(&raw).context("Failed to parse the Bible JSON file")?;
    info(&format!("Loaded {} books from {}", source_books.len(), path.display()));

    let dbm = DbManager::new()?;
    let db = &dbm.bible;

    seed_books(db)?;

    let version = db.create_version(&NewVersion {
        name: version_name,
        abbrev: version_abbrev,
        active,
    })?;
    info(&format!("Created version {} (id {})", version.abbrev, version.id));

    let resolver = BookNameResolver::fallback_only();

    let mut total_verses = 0usize;
    let mut imported_books = 0usize;

    for source in &source_books {
        let abbrev = match resolver.resolve(&source.abbrev) {
            Ok(a) => a,
            Err(_) => {
                warn(&format!("Skipping unknown book abbreviation '{}'", source.abbrev));
                continue;
            }
        };

        let book = db
            .get_book_by_abbrev(&abbrev)?
            .ok_or_else(|| anyhow!("Book '{}' missing from the books table", abbrev))?;

        let mut counts = Vec::with_capacity(source.chapters.len());
        for (chapter_idx, chapter) in source.chapters.iter().enumerate() {
            let chapter_no = (chapter_idx + 1) as i32;

            let new_verses: Vec<NewVerse> = chapter
                .iter()
                .enumerate()
                .map(|(verse_idx, text)| NewVerse {
                    chapter: chapter_no,
                    number: (verse_idx + 1) as i32,
                    text: text.trim(),
                    book_id: book.id,
                    version_id: version.id,
                })
                .collect();

            total_verses += db.create_verses_batch(&new_verses)?;
            counts.push(NewChapterVerseCount {
                chapter: chapter_no,
                verse_count: chapter.len() as i32,
                book_id: book.id,
            });
        }
        db.replace_chapter_verse_counts(book.id, &counts)?;

        imported_books += 1;
        info(&format!("Imported {} ({} chapters)", book.name, source.chapters.len()));
    }

    info(&format!(
        "Import finished: {}/{} books, {} verses",
        imported_books,
        source_books.len(),
        total_verses
    ));
    Ok(())
}

/// Create the two testaments and the 66 canonical books if the books
/// table is empty.
fn seed_books(db: &BibleDbHandle) -> Result<()> {
    if !db.get_books()?.is_empty() {
        return Ok(());
    }

    let old = db.get_or_create_testament("Antigo Testamento")?;
    let new = db.get_or_create_testament("Novo Testamento")?;

    for (idx, (abbrev, name)) in FALLBACK_BOOKS.iter().copied().enumerate() {
        let testament_id = if idx < OLD_TESTAMENT_BOOKS { old.id } else { new.id };
        db.create_book(&NewBook {
            position: (idx + 1) as i32,
            name,
            abbrev,
            testament_id,
        })?;
    }

    info("Seeded testaments and the 66-book table");
    Ok(())
}
