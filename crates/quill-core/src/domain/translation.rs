//! Locale-keyed side-table rows.

/// A row that carries translated attributes for a single locale.
pub trait Localized {
    fn locale(&self) -> &str;
}

/// Pick the translation for `locale`, falling back to `fallback` when the
/// entity was never translated into the requested locale.
pub fn translate<'a, T: Localized>(
    translations: &'a [T],
    locale: &str,
    fallback: &str,
) -> Option<&'a T> {
    translations
        .iter()
        .find(|t| t.locale() == locale)
        .or_else(|| translations.iter().find(|t| t.locale() == fallback))
}

/// Exact lookup without fallback.
pub fn translation_for<'a, T: Localized>(translations: &'a [T], locale: &str) -> Option<&'a T> {
    translations.iter().find(|t| t.locale() == locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(&'static str, &'static str);

    impl Localized for Row {
        fn locale(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_translate_prefers_requested_locale() {
        let rows = vec![Row("en", "Hello"), Row("es", "Hola")];
        assert_eq!(translate(&rows, "es", "en").map(|r| r.1), Some("Hola"));
    }

    #[test]
    fn test_translate_falls_back() {
        let rows = vec![Row("en", "Hello")];
        assert_eq!(translate(&rows, "fr", "en").map(|r| r.1), Some("Hello"));
        assert!(translation_for(&rows, "fr").is_none());
    }

    #[test]
    fn test_translate_missing_everywhere() {
        let rows = vec![Row("de", "Hallo")];
        assert!(translate(&rows, "fr", "en").is_none());
    }
}
