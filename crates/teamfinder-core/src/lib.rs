//! TeamFinder core: domain models, the gateway contract and the directory filter.
//!
//! Everything here is backend-agnostic. Gateway implementations live in
//! `teamfinder-infrastructure`; the browse view and the profile session
//! controller live in `teamfinder-application`.

pub mod config;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod profile;
pub mod session;
pub mod skill;

// Re-export common error type
pub use error::{Result, TeamfinderError};
