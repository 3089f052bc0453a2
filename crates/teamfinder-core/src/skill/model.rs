//! Skill and ProfileSkill domain models.

use serde::{Deserialize, Serialize};

/// Opaque skill identifier as issued by the gateway.
pub type SkillId = String;

/// A catalog skill.
///
/// The catalog is seeded outside the application and is read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub category: String,
}

impl Skill {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Skill in `skills` whose id is `key`, or else whose name matches `key`
/// case-insensitively.
pub fn find_skill<'a>(skills: &'a [Skill], key: &str) -> Option<&'a Skill> {
    skills
        .iter()
        .find(|skill| skill.id == key)
        .or_else(|| skills.iter().find(|skill| skill.name.eq_ignore_ascii_case(key)))
}

/// Association row linking one profile to one skill.
///
/// `(profile_id, skill_id)` is unique on the gateway side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileSkill {
    pub profile_id: String,
    pub skill_id: SkillId,
}

impl ProfileSkill {
    pub fn new(profile_id: impl Into<String>, skill_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            skill_id: skill_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_deserializes_from_row() {
        let json = r#"{"id":"1","name":"React","category":"Frontend","created_at":"2024-01-01"}"#;
        let skill: Skill = serde_json::from_str(json).unwrap();
        assert_eq!(skill, Skill::new("1", "React", "Frontend"));
    }

    #[test]
    fn test_find_skill_by_id_then_name() {
        let skills = vec![
            Skill::new("react", "React", "Frontend"),
            Skill::new("tailwind", "Tailwind CSS", "Frontend"),
        ];
        assert_eq!(find_skill(&skills, "react").map(|s| s.name.as_str()), Some("React"));
        assert_eq!(
            find_skill(&skills, "tailwind css").map(|s| s.id.as_str()),
            Some("tailwind")
        );
        assert!(find_skill(&skills, "vue").is_none());
    }

    #[test]
    fn test_profile_skill_serializes_foreign_keys() {
        let row = serde_json::to_value(ProfileSkill::new("p1", "s1")).unwrap();
        assert_eq!(row, serde_json::json!({"profile_id": "p1", "skill_id": "s1"}));
    }
}
