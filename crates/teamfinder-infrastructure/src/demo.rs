//! Demo data for the memory backend.
//!
//! Skill ids are short slugs so they can be typed on the command line
//! (`teamfinder browse --skill rust`).

use serde_json::{Value, json};
use teamfinder_core::skill::Skill;

const CATALOG: &[(&str, &str, &str)] = &[
    ("react", "React", "Frontend"),
    ("vue", "Vue", "Frontend"),
    ("typescript", "TypeScript", "Frontend"),
    ("tailwind", "Tailwind CSS", "Frontend"),
    ("go", "Go", "Backend"),
    ("rust", "Rust", "Backend"),
    ("node", "Node.js", "Backend"),
    ("postgres", "PostgreSQL", "Backend"),
    ("figma", "Figma", "Design"),
    ("ux-research", "UX Research", "Design"),
    ("pytorch", "PyTorch", "Machine Learning"),
    ("data-viz", "Data Visualization", "Machine Learning"),
    ("swift", "Swift", "Mobile"),
    ("kotlin", "Kotlin", "Mobile"),
];

/// The demo skill catalog.
pub fn skills() -> Vec<Skill> {
    CATALOG
        .iter()
        .map(|(id, name, category)| Skill::new(*id, *name, *category))
        .collect()
}

/// Demo profile rows. Their ids have no auth account behind them.
pub fn profiles() -> Vec<Value> {
    vec![
        json!({
            "id": "00000000-0000-4000-8000-000000000001",
            "username": "ada",
            "full_name": "Ada Lovelace",
            "bio": "Systems programmer looking for a frontend partner.",
            "location": "London",
            "github_url": "https://github.com/ada",
            "linkedin_url": null,
            "avatar_url": null
        }),
        json!({
            "id": "00000000-0000-4000-8000-000000000002",
            "username": "grace",
            "full_name": "Grace Hopper",
            "bio": "Compilers by day, hackathons by night.",
            "location": "Arlington",
            "github_url": null,
            "linkedin_url": "https://www.linkedin.com/in/grace",
            "avatar_url": null
        }),
        json!({
            "id": "00000000-0000-4000-8000-000000000003",
            "username": "linus",
            "full_name": null,
            "bio": "Designer who ships. Figma files come with working prototypes.",
            "location": "Helsinki",
            "github_url": null,
            "linkedin_url": null,
            "avatar_url": null
        }),
        json!({
            "id": "00000000-0000-4000-8000-000000000004",
            "username": "mina",
            "full_name": "Mina Park",
            "bio": null,
            "location": "Seoul",
            "github_url": "https://github.com/mina",
            "linkedin_url": null,
            "avatar_url": null
        }),
    ]
}

/// Associations between the demo profiles and catalog skills.
pub fn user_skills() -> Vec<Value> {
    const LINKS: &[(&str, &str)] = &[
        ("00000000-0000-4000-8000-000000000001", "rust"),
        ("00000000-0000-4000-8000-000000000001", "go"),
        ("00000000-0000-4000-8000-000000000001", "postgres"),
        ("00000000-0000-4000-8000-000000000002", "go"),
        ("00000000-0000-4000-8000-000000000002", "react"),
        ("00000000-0000-4000-8000-000000000002", "typescript"),
        ("00000000-0000-4000-8000-000000000003", "figma"),
        ("00000000-0000-4000-8000-000000000003", "ux-research"),
        ("00000000-0000-4000-8000-000000000003", "react"),
        ("00000000-0000-4000-8000-000000000004", "pytorch"),
        ("00000000-0000-4000-8000-000000000004", "swift"),
    ];
    LINKS
        .iter()
        .map(|(profile_id, skill_id)| json!({"profile_id": profile_id, "skill_id": skill_id}))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_unique_and_grouped() {
        let skills = skills();
        let ids: HashSet<&str> = skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), skills.len());

        // Categories appear in contiguous runs.
        let mut seen: Vec<&str> = Vec::new();
        for skill in &skills {
            if seen.last() != Some(&skill.category.as_str()) {
                assert!(!seen.contains(&skill.category.as_str()));
                seen.push(&skill.category);
            }
        }
    }

    #[test]
    fn test_links_reference_known_rows() {
        let skill_ids: HashSet<String> = skills().into_iter().map(|s| s.id).collect();
        let profile_ids: HashSet<String> = profiles()
            .iter()
            .filter_map(|p| p["id"].as_str().map(String::from))
            .collect();
        for link in user_skills() {
            assert!(profile_ids.contains(link["profile_id"].as_str().unwrap()));
            assert!(skill_ids.contains(link["skill_id"].as_str().unwrap()));
        }
    }
}
