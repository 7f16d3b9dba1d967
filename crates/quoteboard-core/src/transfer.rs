//! JSON export / import of the quote collection.

use std::fs;
use std::path::Path;

use crate::error::QuoteError;
use crate::models::Quote;

/// Pretty-printed JSON array of `{text, category}` objects.
pub fn export_json(quotes: &[Quote]) -> Result<String, QuoteError> {
    serde_json::to_string_pretty(quotes).map_err(|source| QuoteError::Encode {
        what: "export",
        source,
    })
}

pub fn export_to_file(quotes: &[Quote], path: &Path) -> Result<(), QuoteError> {
    let json = export_json(quotes)?;
    fs::write(path, json).map_err(|e| QuoteError::io(path, e))?;
    tracing::info!("transfer: exported {} quotes to {}", quotes.len(), path.display());
    Ok(())
}

/// Parse an import payload. Anything that is not a JSON array is rejected
/// here; per-element validation happens in `QuoteStore::import_batch`.
pub fn parse_import(contents: &str) -> Result<serde_json::Value, QuoteError> {
    let value: serde_json::Value = serde_json::from_str(contents)
        .map_err(|e| QuoteError::Format(format!("not valid JSON: {e}")))?;

    if !value.is_array() {
        return Err(QuoteError::Format(
            "expected a JSON array of quotes".to_string(),
        ));
    }
    Ok(value)
}

pub fn read_import_file(path: &Path) -> Result<serde_json::Value, QuoteError> {
    let contents = fs::read_to_string(path).map_err(|e| QuoteError::io(path, e))?;
    parse_import(&contents)
}
