use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Replace accented characters with their plain latin base letters, via
/// canonical decomposition with the combining marks dropped.
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalized form of a book name, used as an index key: trimmed,
/// accent-stripped and lowercased. Idempotent.
pub fn normalize_book_name(text: &str) -> String {
    strip_diacritics(text.trim()).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_diacritics() {
        assert_eq!(strip_diacritics("Gênesis"), "Genesis");
        assert_eq!(strip_diacritics("Êxodo"), "Exodo");
        assert_eq!(strip_diacritics("João"), "Joao");
        assert_eq!(strip_diacritics("Cântico dos Cânticos"), "Cantico dos Canticos");
        assert_eq!(strip_diacritics("Lamentações"), "Lamentacoes");
        assert_eq!(strip_diacritics("sem acentos"), "sem acentos");
    }

    #[test]
    fn test_normalize_book_name() {
        assert_eq!(normalize_book_name("  Gênesis "), "genesis");
        assert_eq!(normalize_book_name("JOÃO"), "joao");
        assert_eq!(normalize_book_name("I Coríntios"), "i corintios");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = ["Gênesis", "JOÃO", "  Cântico dos Cânticos  ", "1Pe"];
        for s in inputs {
            let once = normalize_book_name(s);
            assert_eq!(normalize_book_name(&once), once);
        }
    }
}
