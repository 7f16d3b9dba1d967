//! Pure rendering of the widget state into a view description.

use serde::Serialize;

use crate::constants::{messages, ALL_CATEGORIES};
use crate::models::{CategoryFilter, Quote};
use crate::selector::visible_set;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    /// Line shown in the quote display area. `None` until a quote is picked.
    pub quote_line: Option<String>,
    /// Dropdown options: `all` first, then categories in first-seen order
    pub category_options: Vec<String>,
    pub selected: String,
    pub visible_count: usize,
    pub total_count: usize,
}

/// Map `(collection, filter, last displayed quote)` to what the UI shows.
///
/// `last_quote` is only displayed when it is still eligible under `filter`.
/// An empty visible set renders the "no quotes" message.
pub fn render(
    quotes: &[Quote],
    categories: Vec<String>,
    filter: &CategoryFilter,
    last_quote: Option<&Quote>,
) -> View {
    let visible = visible_set(quotes, filter);

    let quote_line = if visible.is_empty() {
        Some(messages::NO_QUOTES_IN_CATEGORY.to_string())
    } else {
        last_quote
            .filter(|last| visible.iter().any(|q| q.same_record(last)))
            .map(Quote::display_line)
    };

    let mut category_options = Vec::with_capacity(categories.len() + 1);
    category_options.push(ALL_CATEGORIES.to_string());
    category_options.extend(categories);

    View {
        quote_line,
        category_options,
        selected: filter.label().to_string(),
        visible_count: visible.len(),
        total_count: quotes.len(),
    }
}
