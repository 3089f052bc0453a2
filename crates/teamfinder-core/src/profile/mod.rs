//! Profile domain module.
//!
//! # Module Structure
//!
//! - `model`: Persisted profile (`Profile`), sign-up row (`NewProfile`)
//! - `draft`: Editable copy of a profile (`ProfileDraft`, `DraftField`)
//!
//! # Usage
//!
//! ```ignore
//! use teamfinder_core::profile::{Profile, ProfileDraft, DraftField};
//! ```

mod draft;
mod model;

// Re-export public API
pub use draft::{DraftField, ProfileDraft};
pub use model::{NewProfile, Profile, ProfileId};
