//! Remote data gateway interface.
//!
//! TeamFinder delegates authentication, persistence and relational joins to a
//! hosted backend. This module defines the contract the rest of the workspace
//! consumes, independent of the concrete backend.
//!
//! # Module Structure
//!
//! - `query`: Table names, join specs and equality filters
//! - `auth`: Authentication trait (`AuthGateway`) and identity/session types
//! - `data`: Table operations trait (`DataGateway`)
//! - `store`: Typed access to the three tables over any `Gateway` (`RecordStore`)

mod auth;
mod data;
mod query;
mod store;

// Re-export public API
pub use auth::{AuthGateway, AuthSession, Identity};
pub use data::{DataGateway, Record};
pub use query::{Filter, JoinSpec, Table};
pub use store::RecordStore;

/// A full gateway: authentication plus table access.
pub trait Gateway: AuthGateway + DataGateway {}

impl<T: AuthGateway + DataGateway + ?Sized> Gateway for T {}
