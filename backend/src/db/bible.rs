use anyhow::Result;
use diesel::prelude::*;

use crate::book_index::BookCatalog;
use crate::db::DatabaseHandle;
use crate::db::bible_models::*;
use crate::types::BookCatalogEntry;

pub type BibleDbHandle = DatabaseHandle;

impl BibleDbHandle {
    pub fn get_books(&self) -> Result<Vec<Book>> {
        use crate::db::bible_schema::books::dsl::*;

        self.do_read(|db_conn| {
            books
                .order(position.asc())
                .select(Book::as_select())
                .load(db_conn)
        })
    }

    pub fn get_book_by_abbrev(&self, book_abbrev: &str) -> Result<Option<Book>> {
        use crate::db::bible_schema::books::dsl::*;

        self.do_read(|db_conn| {
            books
                .filter(abbrev.eq(book_abbrev))
                .select(Book::as_select())
                .first(db_conn)
                .optional()
        })
    }

    pub fn get_versions(&self) -> Result<Vec<Version>> {
        use crate::db::bible_schema::versions::dsl::*;

        self.do_read(|db_conn| {
            versions
                .order(id.asc())
                .select(Version::as_select())
                .load(db_conn)
        })
    }

    /// The newest active version carrying the given abbreviation.
    pub fn get_version_by_abbrev(&self, version_abbrev: &str) -> Result<Option<Version>> {
        use crate::db::bible_schema::versions::dsl::*;

        self.do_read(|db_conn| {
            versions
                .filter(abbrev.eq(version_abbrev))
                .filter(active.eq(true))
                .order(id.desc())
                .select(Version::as_select())
                .first(db_conn)
                .optional()
        })
    }

    /// One verse text, or None if the verse does not exist in the given
    /// version. Invoked once per atomic reference by the caller.
    pub fn get_verse_text(
        &self,
        version_abbrev: &str,
        book_abbrev: &str,
        chapter_no: i32,
        verse_no: i32,
    ) -> Result<Option<String>> {
        use crate::db::bible_schema::{books, verses, versions};

        self.do_read(|db_conn| {
            verses::table
                .inner_join(books::table)
                .inner_join(versions::table)
                .filter(versions::abbrev.eq(version_abbrev))
                .filter(versions::active.eq(true))
                .filter(books::abbrev.eq(book_abbrev))
                .filter(verses::chapter.eq(chapter_no))
                .filter(verses::number.eq(verse_no))
                .order(verses::version_id.desc())
                .select(verses::text)
                .first::<String>(db_conn)
                .optional()
        })
    }

    pub fn get_or_create_testament(&self, testament_name: &str) -> Result<Testament> {
        use crate::db::bible_schema::testaments;

        let existing = self.do_read(|db_conn| {
            testaments::table
                .filter(testaments::name.eq(testament_name))
                .select(Testament::as_select())
                .first(db_conn)
                .optional()
        })?;
        if let Some(t) = existing {
            return Ok(t);
        }

        self.do_write(|db_conn| {
            diesel::insert_into(testaments::table)
                .values(NewTestament { name: testament_name })
                .returning(Testament::as_returning())
                .get_result(db_conn)
        })
    }

    pub fn create_book(&self, new_book: &NewBook) -> Result<Book> {
        use crate::db::bible_schema::books;

        self.do_write(|db_conn| {
            diesel::insert_into(books::table)
                .values(new_book)
                .returning(Book::as_returning())
                .get_result(db_conn)
        })
    }

    pub fn create_version(&self, new_version: &NewVersion) -> Result<Version> {
        use crate::db::bible_schema::versions;

        self.do_write(|db_conn| {
            diesel::insert_into(versions::table)
                .values(new_version)
                .returning(Version::as_returning())
                .get_result(db_conn)
        })
    }

    pub fn create_verses_batch(&self, new_verses: &[NewVerse]) -> Result<usize> {
        use crate::db::bible_schema::verses;

        self.do_write(|db_conn| {
            diesel::insert_into(verses::table)
                .values(new_verses)
                .execute(db_conn)
        })
    }

    /// Replace the per-chapter verse counts recorded for a book.
    pub fn replace_chapter_verse_counts(
        &self,
        for_book_id: i32,
        counts: &[NewChapterVerseCount],
    ) -> Result<usize> {
        use crate::db::bible_schema::chapter_verse_counts;

        self.do_write(|db_conn| {
            diesel::delete(
                chapter_verse_counts::table.filter(chapter_verse_counts::book_id.eq(for_book_id)),
            )
            .execute(db_conn)?;

            diesel::insert_into(chapter_verse_counts::table)
                .values(counts)
                .execute(db_conn)
        })
    }

    pub fn create_reading_list(&self, new_list: &NewReadingList) -> Result<ReadingList> {
        use crate::db::bible_schema::reading_lists;

        self.do_write(|db_conn| {
            diesel::insert_into(reading_lists::table)
                .values(new_list)
                .returning(ReadingList::as_returning())
                .get_result(db_conn)
        })
    }

    /// Reading lists, optionally filtered by a LIKE match on the title.
    pub fn search_reading_lists(&self, title_filter: Option<&str>) -> Result<Vec<ReadingList>> {
        use crate::db::bible_schema::reading_lists::dsl::*;

        let pattern = title_filter.map(|q| format!("%{}%", q));

        self.do_read(|db_conn| {
            let mut query = reading_lists
                .select(ReadingList::as_select())
                .into_boxed();
            if let Some(pattern) = &pattern {
                query = query.filter(title.like(pattern.clone()));
            }
            query.order(id.asc()).load(db_conn)
        })
    }
}

impl BookCatalog for BibleDbHandle {
    fn list_books(&self) -> Result<Vec<BookCatalogEntry>> {
        let books = self.get_books()?;
        Ok(books
            .into_iter()
            .map(|b| BookCatalogEntry {
                abbrev: b.abbrev,
                full_name: b.name,
            })
            .collect())
    }
}
