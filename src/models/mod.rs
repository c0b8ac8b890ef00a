//! Data model: recipes and search filters.

pub mod filters;
pub mod recipe;

pub use filters::SearchFilters;
pub use recipe::Recipe;
