use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::db::bible_schema::{
    books, chapter_verse_counts, reading_lists, testaments, verses, versions,
};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = testaments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Testament {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = testaments)]
pub struct NewTestament<'a> {
    pub name: &'a str,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Book {
    pub id: i32,
    pub position: i32,
    pub name: String,
    pub abbrev: String,
    pub testament_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = books)]
pub struct NewBook<'a> {
    pub position: i32,
    pub name: &'a str,
    pub abbrev: &'a str,
    pub testament_id: i32,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize)]
#[diesel(table_name = versions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Version {
    pub id: i32,
    pub name: String,
    pub abbrev: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = versions)]
pub struct NewVersion<'a> {
    pub name: &'a str,
    pub abbrev: &'a str,
    pub active: bool,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = verses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Verse {
    pub id: i32,
    pub chapter: i32,
    pub number: i32,
    pub text: String,
    pub book_id: i32,
    pub version_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = verses)]
pub struct NewVerse<'a> {
    pub chapter: i32,
    pub number: i32,
    pub text: &'a str,
    pub book_id: i32,
    pub version_id: i32,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = chapter_verse_counts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChapterVerseCount {
    pub id: i32,
    pub chapter: i32,
    pub verse_count: i32,
    pub book_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = chapter_verse_counts)]
pub struct NewChapterVerseCount {
    pub chapter: i32,
    pub verse_count: i32,
    pub book_id: i32,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize)]
#[diesel(table_name = reading_lists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReadingList {
    pub id: i32,
    pub title: String,
    pub content: String,
}

#[derive(Insertable)]
#[diesel(table_name = reading_lists)]
pub struct NewReadingList<'a> {
    pub title: &'a str,
    pub content: &'a str,
}
