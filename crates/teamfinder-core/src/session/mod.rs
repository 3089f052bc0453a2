//! Session domain module.
//!
//! Holds "who is signed in" as an explicit value owned by whoever drives the
//! profile page, instead of global state.

mod context;

// Re-export public API
pub use context::SessionContext;
