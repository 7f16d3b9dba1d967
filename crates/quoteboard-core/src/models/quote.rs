use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// A single quote: the unit of data everywhere in the app.
///
/// Identity is `text` compared exactly plus `category` compared
/// case-insensitively (see [`Quote::same_record`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

impl Quote {
    /// Build a quote from user input. Both fields are trimmed and must be
    /// non-empty afterwards.
    pub fn new(text: &str, category: &str) -> Result<Self, QuoteError> {
        let text = text.trim();
        let category = category.trim();

        if text.is_empty() {
            return Err(QuoteError::Validation { field: "text" });
        }
        if category.is_empty() {
            return Err(QuoteError::Validation { field: "category" });
        }

        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Lenient parse of an untrusted JSON object (import files).
    /// Returns `None` unless both `text` and `category` are non-empty strings.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let text = value.get("text")?.as_str()?;
        let category = value.get("category")?.as_str()?;
        Self::new(text, category).ok()
    }

    pub fn in_category(&self, category: &str) -> bool {
        categories_match(&self.category, category)
    }

    pub fn same_record(&self, other: &Quote) -> bool {
        self.text == other.text && self.in_category(&other.category)
    }

    /// `"text" — (category)`
    pub fn display_line(&self) -> String {
        format!("\"{}\" — ({})", self.text, self.category)
    }

    /// The three quotes a fresh collection starts with
    pub fn defaults() -> Vec<Quote> {
        [
            ("Success is not final; failure is not fatal.", "Motivation"),
            ("Be yourself; everyone else is already taken.", "Inspiration"),
            ("Life is what happens when you're busy making other plans.", "Life"),
        ]
        .into_iter()
        .map(|(text, category)| Quote {
            text: text.to_string(),
            category: category.to_string(),
        })
        .collect()
    }
}

/// Case-insensitive category comparison used by filtering, dedup and merge
pub fn categories_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_trims_fields() {
        let q = Quote::new("  Carpe diem ", "\tLatin\n").unwrap();
        assert_eq!(q.text, "Carpe diem");
        assert_eq!(q.category, "Latin");
    }

    #[test]
    fn test_new_rejects_blank_fields() {
        assert!(matches!(
            Quote::new("   ", "Latin"),
            Err(QuoteError::Validation { field: "text" })
        ));
        assert!(matches!(
            Quote::new("Carpe diem", ""),
            Err(QuoteError::Validation { field: "category" })
        ));
    }

    #[test]
    fn test_from_value_skips_malformed() {
        assert!(Quote::from_value(&json!({"text": "A", "category": "B"})).is_some());
        assert!(Quote::from_value(&json!({"text": "A"})).is_none());
        assert!(Quote::from_value(&json!({"text": 5, "category": "B"})).is_none());
        assert!(Quote::from_value(&json!({"text": "", "category": "B"})).is_none());
        assert!(Quote::from_value(&json!("A")).is_none());
    }

    #[test]
    fn test_same_record_ignores_category_case_only() {
        let a = Quote::new("A", "Server").unwrap();
        assert!(a.same_record(&Quote::new("A", "server").unwrap()));
        assert!(!a.same_record(&Quote::new("a", "Server").unwrap()));
    }

    #[test]
    fn test_display_line() {
        let q = Quote::new("Carpe diem", "Latin").unwrap();
        assert_eq!(q.display_line(), "\"Carpe diem\" — (Latin)");
    }

    #[test]
    fn test_defaults() {
        let defaults = Quote::defaults();
        assert_eq!(defaults.len(), 3);
        assert_eq!(defaults[0].category, "Motivation");
    }
}
