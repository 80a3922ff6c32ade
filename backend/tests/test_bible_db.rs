use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use biblia_backend::book_index::BookNameResolver;
use biblia_backend::db::DbManager;
use biblia_backend::db::bible_models::{NewBook, NewReadingList, NewVerse, NewVersion};
use biblia_backend::reference_parser::ReferenceParser;

static DB_SEQ: AtomicUsize = AtomicUsize::new(0);

struct TestDb {
    path: PathBuf,
    pub dbm: DbManager,
}

impl TestDb {
    fn new() -> Self {
        let seq = DB_SEQ.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "biblia-test-{}-{}.sqlite3",
            std::process::id(),
            seq
        ));
        let _ = std::fs::remove_file(&path);
        let dbm = DbManager::new_with_path(&path).expect("Can't create test database");
        TestDb { path, dbm }
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn seed_minimal(dbm: &DbManager) -> (i32, i32) {
    let db = &dbm.bible;

    let testament = db.get_or_create_testament("Novo Testamento").unwrap();
    let book = db
        .create_book(&NewBook {
            position: 43,
            name: "João",
            abbrev: "Jo",
            testament_id: testament.id,
        })
        .unwrap();
    let version = db
        .create_version(&NewVersion { name: "Almeida Revista e Atualizada", abbrev: "ARA", active: true })
        .unwrap();

    db.create_verses_batch(&[
        NewVerse {
            chapter: 3,
            number: 16,
            text: "Porque Deus amou o mundo de tal maneira...",
            book_id: book.id,
            version_id: version.id,
        },
        NewVerse {
            chapter: 3,
            number: 17,
            text: "Porquanto Deus enviou o seu Filho ao mundo...",
            book_id: book.id,
            version_id: version.id,
        },
    ])
    .unwrap();

    (book.id, version.id)
}

#[test]
fn test_verse_lookup_roundtrip() {
    let db = TestDb::new();
    seed_minimal(&db.dbm);

    let text = db.dbm.bible.get_verse_text("ARA", "Jo", 3, 16).unwrap();
    assert!(text.unwrap().starts_with("Porque Deus amou"));

    // Missing verse is None, not an error.
    assert_eq!(db.dbm.bible.get_verse_text("ARA", "Jo", 3, 99).unwrap(), None);
    // Unknown version is None as well.
    assert_eq!(db.dbm.bible.get_verse_text("NVI", "Jo", 3, 16).unwrap(), None);
}

#[test]
fn test_inactive_version_is_not_served() {
    let db = TestDb::new();
    let handle = &db.dbm.bible;

    let testament = handle.get_or_create_testament("Novo Testamento").unwrap();
    let book = handle
        .create_book(&NewBook { position: 40, name: "Mateus", abbrev: "Mt", testament_id: testament.id })
        .unwrap();
    let version = handle
        .create_version(&NewVersion { name: "Old import", abbrev: "ARA", active: false })
        .unwrap();
    handle
        .create_verses_batch(&[NewVerse {
            chapter: 5,
            number: 1,
            text: "Vendo Jesus as multidões...",
            book_id: book.id,
            version_id: version.id,
        }])
        .unwrap();

    assert_eq!(handle.get_verse_text("ARA", "Mt", 5, 1).unwrap(), None);
    assert!(handle.get_version_by_abbrev("ARA").unwrap().is_none());
}

#[test]
fn test_resolver_reads_books_table() {
    let db = TestDb::new();
    seed_minimal(&db.dbm);

    let resolver = Arc::new(BookNameResolver::new(db.dbm.bible.clone()));
    let parser = ReferenceParser::new(resolver);

    let refs = parser.parse("joão 3:16-17").unwrap();
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].book_abbrev, "Jo");

    let texts: Vec<Option<String>> = refs
        .iter()
        .map(|r| db.dbm.bible.get_verse_text("ARA", &r.book_abbrev, r.chapter, r.verse).unwrap())
        .collect();
    assert!(texts.iter().all(|t| t.is_some()));
}

#[test]
fn test_reading_list_search() {
    let db = TestDb::new();
    let handle = &db.dbm.bible;

    handle
        .create_reading_list(&NewReadingList { title: "Plano anual", content: "Gn 1:1" })
        .unwrap();
    handle
        .create_reading_list(&NewReadingList { title: "Evangelhos em 30 dias", content: "Mt 1:1" })
        .unwrap();

    let all = handle.search_reading_lists(None).unwrap();
    assert_eq!(all.len(), 2);

    let filtered = handle.search_reading_lists(Some("Evangelhos")).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].title, "Evangelhos em 30 dias");
}
