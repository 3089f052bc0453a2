//! Profile directory: join-result model and the filter engine used by the browse view.
//!
//! # Module Structure
//!
//! - `model`: `DirectoryEntry` (a profile with its resolved skills) and the raw joined row
//! - `filter`: `DirectoryFilter` and the derived category/skill option helpers

mod filter;
mod model;

// Re-export public API
pub use filter::{DirectoryFilter, categories, filter_directory, skill_options};
pub use model::{DirectoryEntry, DirectoryRow};
