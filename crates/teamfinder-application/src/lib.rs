//! Application layer for TeamFinder.
//!
//! Use cases that sit between the gateway (through `RecordStore`) and the
//! shell: the two loaders, the browse view and the profile session
//! controller.

pub mod browse;
pub mod catalog_loader;
pub mod directory_loader;
pub mod profile_session;

pub use browse::BrowseView;
pub use catalog_loader::SkillCatalogLoader;
pub use directory_loader::ProfileDirectoryLoader;
pub use profile_session::{AuthField, AuthForm, AuthMode, ProfileSessionController, SessionState};
