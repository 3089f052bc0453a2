//! Profile domain model.

use serde::{Deserialize, Serialize};

/// Profile identifier. Equal to the owning identity's id.
pub type ProfileId = String;

/// A user profile as stored in the `profiles` table.
///
/// One profile exists per authenticated identity; only its owner updates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

impl Profile {
    /// Creates a profile with only the required fields set.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            full_name: None,
            avatar_url: None,
            bio: None,
            location: None,
            github_url: None,
            linkedin_url: None,
        }
    }

    /// Name shown in headings: full name when set, username otherwise.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.username,
        }
    }

    /// Single-letter avatar fallback used when `avatar_url` is absent.
    pub fn initial(&self) -> Option<char> {
        self.username.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

/// Row inserted into `profiles` right after a successful sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub id: ProfileId,
    pub username: String,
    pub email: String,
}
