use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};

use biblia_backend::book_index::{BookCatalog, BookNameResolver};
use biblia_backend::reference_parser::ReferenceParser;
use biblia_backend::types::BookCatalogEntry;

struct CountingCatalog {
    entries: Vec<BookCatalogEntry>,
    fail: bool,
    calls: AtomicUsize,
}

impl CountingCatalog {
    fn ok(entries: Vec<BookCatalogEntry>) -> Self {
        CountingCatalog { entries, fail: false, calls: AtomicUsize::new(0) }
    }

    fn failing() -> Self {
        CountingCatalog { entries: Vec::new(), fail: true, calls: AtomicUsize::new(0) }
    }
}

impl BookCatalog for CountingCatalog {
    fn list_books(&self) -> Result<Vec<BookCatalogEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("catalog unavailable"));
        }
        Ok(self.entries.clone())
    }
}

fn entry(abbrev: &str, full_name: &str) -> BookCatalogEntry {
    BookCatalogEntry {
        abbrev: abbrev.to_string(),
        full_name: full_name.to_string(),
    }
}

#[test]
fn test_resolver_uses_catalog_contents() {
    let catalog = Arc::new(CountingCatalog::ok(vec![
        entry("Gn", "Gênesis"),
        entry("Jo", "João"),
    ]));
    let resolver = BookNameResolver::new(catalog);

    assert_eq!(resolver.resolve("Gênesis").unwrap(), "Gn");
    assert_eq!(resolver.resolve("joão").unwrap(), "Jo");
}

#[test]
fn test_catalog_is_fetched_exactly_once() {
    let catalog = Arc::new(CountingCatalog::ok(vec![entry("Gn", "Gênesis")]));
    let resolver = BookNameResolver::new(catalog.clone());

    for _ in 0..5 {
        resolver.resolve("Gn").unwrap();
    }
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_catalog_pins_fallback_for_resolver_lifetime() {
    let catalog = Arc::new(CountingCatalog::failing());
    let resolver = BookNameResolver::new(catalog.clone());

    // Resolves from the built-in table after the failed fetch.
    assert_eq!(resolver.resolve("Mateus").unwrap(), "Mt");
    assert_eq!(resolver.resolve("Apocalipse").unwrap(), "Ap");

    // No retry on subsequent calls.
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reset_index_refetches_catalog() {
    let catalog = Arc::new(CountingCatalog::ok(vec![entry("Gn", "Gênesis")]));
    let resolver = BookNameResolver::new(catalog.clone());

    resolver.resolve("Gn").unwrap();
    resolver.reset_index();
    resolver.resolve("Gn").unwrap();

    assert_eq!(catalog.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_parser_over_custom_catalog() {
    // A catalog using different abbreviations than the built-in table.
    let catalog = Arc::new(CountingCatalog::ok(vec![
        entry("Gen", "Gênesis"),
        entry("Mat", "Mateus"),
    ]));
    let parser = ReferenceParser::new(Arc::new(BookNameResolver::new(catalog)));

    let refs = parser.parse("Gênesis 1:1; mat 5:1").unwrap();
    assert_eq!(refs[0].book_abbrev, "Gen");
    assert_eq!(refs[1].book_abbrev, "Mat");
}

#[test]
fn test_independent_resolvers_do_not_share_cache() {
    let a = BookNameResolver::new(Arc::new(CountingCatalog::ok(vec![entry("Gen", "Gênesis")])));
    let b = BookNameResolver::fallback_only();

    assert_eq!(a.resolve("Gênesis").unwrap(), "Gen");
    assert_eq!(b.resolve("Gênesis").unwrap(), "Gn");
}
