//! Directory entry model.
//!
//! `DirectoryEntry` is a read shape built by the directory loader from the
//! gateway's nested join (`profiles` -> `user_skills` -> `skills`). It is never
//! written back.

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::skill::Skill;

/// A profile decorated with its resolved skill list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub profile: Profile,
    pub skills: Vec<Skill>,
}

impl DirectoryEntry {
    /// Builds an entry, dropping repeated skill ids while keeping first-seen order.
    pub fn new(profile: Profile, skills: Vec<Skill>) -> Self {
        let mut unique: Vec<Skill> = Vec::with_capacity(skills.len());
        for skill in skills {
            if !unique.iter().any(|s| s.id == skill.id) {
                unique.push(skill);
            }
        }
        Self {
            profile,
            skills: unique,
        }
    }

    pub fn has_skill(&self, skill_id: &str) -> bool {
        self.skills.iter().any(|s| s.id == skill_id)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.skills.iter().any(|s| s.category == category)
    }
}

/// Embedded association as returned by the join: `{"skills": {...}}`.
#[derive(Debug, Clone, Deserialize)]
struct JoinedSkill {
    skills: Option<Skill>,
}

/// Raw row of `profiles` with embedded `user_skills(skills(...))`.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryRow {
    #[serde(flatten)]
    profile: Profile,
    #[serde(default)]
    user_skills: Vec<JoinedSkill>,
}

impl From<DirectoryRow> for DirectoryEntry {
    fn from(row: DirectoryRow) -> Self {
        let skills = row
            .user_skills
            .into_iter()
            .filter_map(|joined| joined.skills)
            .collect();
        DirectoryEntry::new(row.profile, skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_flattens_joined_skills() {
        let row: DirectoryRow = serde_json::from_value(json!({
            "id": "p1",
            "username": "ada",
            "bio": "Engines",
            "email": "ada@example.com",
            "user_skills": [
                {"skills": {"id": "1", "name": "React", "category": "Frontend"}},
                {"skills": {"id": "2", "name": "Go", "category": "Backend"}}
            ]
        }))
        .unwrap();

        let entry = DirectoryEntry::from(row);
        assert_eq!(entry.profile.username, "ada");
        assert_eq!(entry.profile.bio.as_deref(), Some("Engines"));
        assert_eq!(entry.skills.len(), 2);
        assert!(entry.has_skill("2"));
        assert!(entry.has_category("Frontend"));
    }

    #[test]
    fn test_row_without_associations() {
        let row: DirectoryRow =
            serde_json::from_value(json!({"id": "p1", "username": "ada"})).unwrap();
        assert!(DirectoryEntry::from(row).skills.is_empty());
    }

    #[test]
    fn test_duplicate_skill_ids_are_dropped() {
        let skill = Skill::new("1", "React", "Frontend");
        let entry = DirectoryEntry::new(Profile::new("p1", "ada"), vec![skill.clone(), skill]);
        assert_eq!(entry.skills.len(), 1);
    }
}
