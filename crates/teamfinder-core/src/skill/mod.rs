//! Skill catalog domain module.
//!
//! # Module Structure
//!
//! - `model`: Catalog entries (`Skill`) and profile/skill associations (`ProfileSkill`), lookup by id or name (`find_skill`)

mod model;

// Re-export public API
pub use model::{ProfileSkill, Skill, SkillId, find_skill};
