use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;

use crate::helpers::normalize_book_name;
use crate::logger::warn;
use crate::types::{BookCatalogEntry, BookNotFound};

/// Source of the book catalog. The database books table is the usual
/// implementation; tests substitute their own.
pub trait BookCatalog: Send + Sync {
    fn list_books(&self) -> Result<Vec<BookCatalogEntry>>;
}

/// The 66 canonical books in canonical order, used when the catalog
/// collaborator cannot be read. Abbreviations are the ones storage uses.
pub static FALLBACK_BOOKS: &[(&str, &str)] = &[
    // Antigo Testamento
    ("Gn", "Gênesis"),
    ("Ex", "Êxodo"),
    ("Lv", "Levítico"),
    ("Nm", "Números"),
    ("Dt", "Deuteronômio"),
    ("Js", "Josué"),
    ("Jz", "Juízes"),
    ("Rt", "Rute"),
    ("1Sm", "I Samuel"),
    ("2Sm", "II Samuel"),
    ("1Rs", "I Reis"),
    ("2Rs", "II Reis"),
    ("1Cr", "I Crônicas"),
    ("2Cr", "II Crônicas"),
    ("Ed", "Esdras"),
    ("Ne", "Neemias"),
    ("Et", "Ester"),
    ("Jó", "Jó"),
    ("Sl", "Salmos"),
    ("Pv", "Provérbios"),
    ("Ec", "Eclesiastes"),
    ("Ct", "Cântico dos Cânticos"),
    ("Is", "Isaías"),
    ("Jr", "Jeremias"),
    ("Lm", "Lamentações"),
    ("Ez", "Ezequiel"),
    ("Dn", "Daniel"),
    ("Os", "Oséias"),
    ("Jl", "Joel"),
    ("Am", "Amós"),
    ("Ob", "Obadias"),
    ("Jn", "Jonas"),
    ("Mq", "Miquéias"),
    ("Na", "Naum"),
    ("Hc", "Habacuque"),
    ("Sf", "Sofonias"),
    ("Ag", "Ageu"),
    ("Zc", "Zacarias"),
    ("Ml", "Malaquias"),
    // Novo Testamento
    ("Mt", "Mateus"),
    ("Mc", "Marcos"),
    ("Lc", "Lucas"),
    ("Jo", "João"),
    ("At", "Atos"),
    ("Rm", "Romanos"),
    ("1Co", "I Coríntios"),
    ("2Co", "II Coríntios"),
    ("Gl", "Gálatas"),
    ("Ef", "Efésios"),
    ("Fp", "Filipenses"),
    ("Cl", "Colossenses"),
    ("1Ts", "I Tessalonicenses"),
    ("2Ts", "II Tessalonicenses"),
    ("1Tm", "I Timóteo"),
    ("2Tm", "II Timóteo"),
    ("Tt", "Tito"),
    ("Fm", "Filemom"),
    ("Hb", "Hebreus"),
    ("Tg", "Tiago"),
    ("1Pe", "I Pedro"),
    ("2Pe", "II Pedro"),
    ("1Jo", "I João"),
    ("2Jo", "II João"),
    ("3Jo", "III João"),
    ("Jd", "Judas"),
    ("Ap", "Apocalipse"),
];

/// Pinned winners for normalized keys that collide between books.
/// "jo" is both Jó's accent-stripped abbreviation and João's; the short
/// form belongs to João, while the verbatim "Jó" still reaches Jó through
/// its exact key.
static SHORT_FORM_PRECEDENCE: &[(&str, &str)] = &[("jo", "Jo")];

/// Mapping from name variants to the canonical abbreviation storage uses.
/// Each catalog entry registers three keys: the exact abbreviation, the
/// normalized abbreviation and the normalized full name. Later insertions
/// overwrite earlier ones; the precedence pins are applied last.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    map: HashMap<String, String>,
}

impl NameIndex {
    pub fn build(entries: &[BookCatalogEntry]) -> Self {
        let mut index = NameIndex::default();
        for entry in entries {
            index.insert_entry(&entry.abbrev, &entry.full_name);
        }
        index.apply_precedence();
        index
    }

    pub fn fallback() -> Self {
        let mut index = NameIndex::default();
        for (abbrev, full_name) in FALLBACK_BOOKS.iter().copied() {
            index.insert_entry(abbrev, full_name);
        }
        index.apply_precedence();
        index
    }

    fn insert_entry(&mut self, abbrev: &str, full_name: &str) {
        self.register(abbrev, abbrev);
        self.register(&normalize_book_name(abbrev), abbrev);
        self.register(&normalize_book_name(full_name), abbrev);
    }

    fn register(&mut self, key: &str, abbrev: &str) {
        self.map.insert(key.to_string(), abbrev.to_string());
    }

    fn apply_precedence(&mut self) {
        for (key, winner) in SHORT_FORM_PRECEDENCE.iter().copied() {
            if self.map.contains_key(key) && self.map.contains_key(winner) {
                self.register(key, winner);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Maps user-typed book names and abbreviations, in any accenting or
/// casing, to the canonical abbreviation. Owns its index cache: the first
/// resolution fetches the catalog (or falls back) exactly once, and
/// `reset_index()` forces a rebuild for callers that change the catalog at
/// runtime.
pub struct BookNameResolver {
    catalog: Option<Arc<dyn BookCatalog>>,
    index: Mutex<Option<Arc<NameIndex>>>,
}

impl BookNameResolver {
    pub fn new(catalog: Arc<dyn BookCatalog>) -> Self {
        BookNameResolver {
            catalog: Some(catalog),
            index: Mutex::new(None),
        }
    }

    /// A resolver without a catalog collaborator, serving the built-in
    /// book table only.
    pub fn fallback_only() -> Self {
        BookNameResolver {
            catalog: None,
            index: Mutex::new(None),
        }
    }

    pub fn resolve(&self, raw_name: &str) -> Result<String, BookNotFound> {
        let index = self.index();

        if let Some(abbrev) = index.get(raw_name) {
            return Ok(abbrev.to_string());
        }
        if let Some(abbrev) = index.get(&normalize_book_name(raw_name)) {
            return Ok(abbrev.to_string());
        }

        Err(BookNotFound {
            book_name: raw_name.to_string(),
        })
    }

    /// Drop the cached index; the next resolution rebuilds it.
    pub fn reset_index(&self) {
        *self.index.lock() = None;
    }

    // Holding the lock across the build makes first access single-flight:
    // concurrent callers wait for one catalog fetch and one fallback
    // decision, never two divergent indexes.
    fn index(&self) -> Arc<NameIndex> {
        let mut guard = self.index.lock();
        if let Some(index) = guard.as_ref() {
            return index.clone();
        }
        let index = Arc::new(self.build_index());
        *guard = Some(index.clone());
        index
    }

    fn build_index(&self) -> NameIndex {
        if let Some(catalog) = &self.catalog {
            match catalog.list_books() {
                Ok(entries) if !entries.is_empty() => return NameIndex::build(&entries),
                Ok(_) => warn("Book catalog is empty, using the built-in book table"),
                Err(e) => warn(&format!(
                    "Could not read the book catalog ({}), using the built-in book table",
                    e
                )),
            }
        }
        NameIndex::fallback()
    }
}
