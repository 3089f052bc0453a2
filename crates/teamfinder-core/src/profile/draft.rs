//! Editable profile draft.
//!
//! A draft is independent of the persisted profile until it is saved.
//! Absent fields are represented as empty strings while editing and are
//! written back as `null`.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value, json};

use super::model::Profile;
use crate::error::TeamfinderError;

/// Editable fields of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Username,
    FullName,
    AvatarUrl,
    Bio,
    Location,
    GithubUrl,
    LinkedinUrl,
}

impl DraftField {
    pub const ALL: [DraftField; 7] = [
        DraftField::Username,
        DraftField::FullName,
        DraftField::AvatarUrl,
        DraftField::Bio,
        DraftField::Location,
        DraftField::GithubUrl,
        DraftField::LinkedinUrl,
    ];

    /// Column name in the `profiles` table.
    pub fn column(self) -> &'static str {
        match self {
            DraftField::Username => "username",
            DraftField::FullName => "full_name",
            DraftField::AvatarUrl => "avatar_url",
            DraftField::Bio => "bio",
            DraftField::Location => "location",
            DraftField::GithubUrl => "github_url",
            DraftField::LinkedinUrl => "linkedin_url",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for DraftField {
    type Err = TeamfinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let field = match normalized.as_str() {
            "username" => DraftField::Username,
            "full_name" | "name" => DraftField::FullName,
            "avatar_url" | "avatar" => DraftField::AvatarUrl,
            "bio" => DraftField::Bio,
            "location" => DraftField::Location,
            "github_url" | "github" => DraftField::GithubUrl,
            "linkedin_url" | "linkedin" => DraftField::LinkedinUrl,
            _ => {
                return Err(TeamfinderError::validation(format!(
                    "Unknown profile field: {}",
                    s
                )));
            }
        };
        Ok(field)
    }
}

/// Local, not-yet-persisted copy of a profile's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
    pub bio: String,
    pub location: String,
    pub github_url: String,
    pub linkedin_url: String,
}

impl ProfileDraft {
    /// Loads the draft from a profile, defaulting absent fields to empty.
    pub fn from_profile(profile: &Profile) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            username: profile.username.clone(),
            full_name: text(&profile.full_name),
            avatar_url: text(&profile.avatar_url),
            bio: text(&profile.bio),
            location: text(&profile.location),
            github_url: text(&profile.github_url),
            linkedin_url: text(&profile.linkedin_url),
        }
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Username => &self.username,
            DraftField::FullName => &self.full_name,
            DraftField::AvatarUrl => &self.avatar_url,
            DraftField::Bio => &self.bio,
            DraftField::Location => &self.location,
            DraftField::GithubUrl => &self.github_url,
            DraftField::LinkedinUrl => &self.linkedin_url,
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Username => self.username = value,
            DraftField::FullName => self.full_name = value,
            DraftField::AvatarUrl => self.avatar_url = value,
            DraftField::Bio => self.bio = value,
            DraftField::Location => self.location = value,
            DraftField::GithubUrl => self.github_url = value,
            DraftField::LinkedinUrl => self.linkedin_url = value,
        }
    }

    /// Checks the draft before it is sent to the gateway.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.username.trim().is_empty() {
            return Err(TeamfinderError::validation("Username is required"));
        }
        Ok(())
    }

    /// Full update payload for the `profiles` table. Empty optional fields become `null`.
    pub fn to_update(&self) -> Value {
        let mut row = Map::new();
        for field in DraftField::ALL {
            let value = self.get(field);
            let value = match field {
                DraftField::Username => json!(value),
                _ if value.is_empty() => Value::Null,
                _ => json!(value),
            };
            row.insert(field.column().to_string(), value);
        }
        Value::Object(row)
    }

    /// Overlays the draft onto a persisted profile, keeping its id.
    pub fn apply_to(&self, profile: &Profile) -> Profile {
        let optional = |value: &str| (!value.is_empty()).then(|| value.to_string());
        Profile {
            id: profile.id.clone(),
            username: self.username.clone(),
            full_name: optional(&self.full_name),
            avatar_url: optional(&self.avatar_url),
            bio: optional(&self.bio),
            location: optional(&self.location),
            github_url: optional(&self.github_url),
            linkedin_url: optional(&self.linkedin_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> Profile {
        let mut profile = Profile::new("u1", "ada");
        profile.bio = Some("Engines".to_string());
        profile
    }

    #[test]
    fn test_from_profile_defaults_absent_to_empty() {
        let draft = ProfileDraft::from_profile(&sample_profile());
        assert_eq!(draft.username, "ada");
        assert_eq!(draft.bio, "Engines");
        assert_eq!(draft.full_name, "");
        assert_eq!(draft.linkedin_url, "");
    }

    #[test]
    fn test_to_update_writes_null_for_empty_fields() {
        let mut draft = ProfileDraft::from_profile(&sample_profile());
        draft.set(DraftField::Location, "London");

        let update = draft.to_update();
        assert_eq!(update["username"], "ada");
        assert_eq!(update["location"], "London");
        assert_eq!(update["full_name"], Value::Null);
        assert!(update.get("id").is_none());
    }

    #[test]
    fn test_apply_to_keeps_id() {
        let profile = sample_profile();
        let mut draft = ProfileDraft::from_profile(&profile);
        draft.set(DraftField::FullName, "Ada Lovelace");
        draft.set(DraftField::Bio, "");

        let updated = draft.apply_to(&profile);
        assert_eq!(updated.id, "u1");
        assert_eq!(updated.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(updated.bio, None);
    }

    #[test]
    fn test_validate_requires_username() {
        let mut draft = ProfileDraft::from_profile(&sample_profile());
        assert!(draft.validate().is_ok());

        draft.set(DraftField::Username, "  ");
        let err = draft.validate().unwrap_err();
        assert_eq!(err.user_message(), "Username is required");
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("github".parse::<DraftField>().unwrap(), DraftField::GithubUrl);
        assert_eq!("full-name".parse::<DraftField>().unwrap(), DraftField::FullName);
        assert!("email".parse::<DraftField>().is_err());
    }
}
