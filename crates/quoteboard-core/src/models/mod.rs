pub mod category_filter;
pub mod quote;

pub use category_filter::CategoryFilter;
pub use quote::{categories_match, Quote};
