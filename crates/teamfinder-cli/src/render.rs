//! Terminal rendering of profiles, skills and drafts.

use colored::Colorize;
use teamfinder_core::TeamfinderError;
use teamfinder_core::directory::DirectoryEntry;
use teamfinder_core::profile::{DraftField, Profile, ProfileDraft};
use teamfinder_core::skill::Skill;

/// `[React] [Go]`, or a dim placeholder when empty.
pub fn skill_badges(skills: &[Skill]) -> String {
    if skills.is_empty() {
        return "no skills yet".bright_black().to_string();
    }
    skills
        .iter()
        .map(|skill| format!("[{}]", skill.name).cyan().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Heading line: avatar initial, display name, handle and location.
fn heading(profile: &Profile) -> String {
    let initial = profile.initial().unwrap_or('?');
    let mut line = format!(
        "({}) {} {}",
        initial,
        profile.display_name().bold(),
        format!("@{}", profile.username).bright_black()
    );
    if let Some(location) = profile.location.as_deref().filter(|l| !l.is_empty()) {
        line.push_str(&format!("  {}", location.yellow()));
    }
    line
}

fn links(profile: &Profile) -> Vec<String> {
    [
        ("github", profile.github_url.as_deref()),
        ("linkedin", profile.linkedin_url.as_deref()),
        ("avatar", profile.avatar_url.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, url)| {
        url.filter(|u| !u.is_empty())
            .map(|u| format!("{}: {}", label, u.underline()))
    })
    .collect()
}

/// Multi-line card for one directory entry.
pub fn entry_card(entry: &DirectoryEntry) -> String {
    profile_card(&entry.profile, &entry.skills)
}

pub fn profile_card(profile: &Profile, skills: &[Skill]) -> String {
    let mut lines = vec![heading(profile)];
    if let Some(bio) = profile.bio.as_deref().filter(|b| !b.is_empty()) {
        lines.push(format!("    {}", bio));
    }
    lines.push(format!("    {}", skill_badges(skills)));
    for link in links(profile) {
        lines.push(format!("    {}", link));
    }
    lines.join("\n")
}

/// Every draft field with its current value.
pub fn draft_table(draft: &ProfileDraft) -> String {
    DraftField::ALL
        .iter()
        .map(|field| {
            let value = draft.get(*field);
            let value = if value.is_empty() {
                "(empty)".bright_black().to_string()
            } else {
                value.to_string()
            };
            format!("  {:<13} {}", field.column(), value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Catalog grouped by category, in catalog order.
pub fn catalog_listing(skills: &[&Skill]) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current: Option<&str> = None;
    for skill in skills {
        if current != Some(skill.category.as_str()) {
            lines.push(skill.category.bold().to_string());
            current = Some(skill.category.as_str());
        }
        lines.push(format!("  {:<14} {}", skill.id, skill.name));
    }
    lines.join("\n")
}

pub fn error_line(err: &TeamfinderError) -> String {
    format!("Error: {}", err.user_message()).red().to_string()
}

pub fn info_line(message: &str) -> String {
    message.bright_black().to_string()
}

pub fn success_line(message: &str) -> String {
    message.green().to_string()
}
