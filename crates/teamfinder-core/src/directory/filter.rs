//! Directory filter engine.
//!
//! Three independent predicates combined with AND:
//!
//! - search: case-insensitive substring of username, full name or bio
//! - skills: the entry holds every selected skill
//! - category: at least one of the entry's skills is in the selected category
//!
//! Filtering is pure and keeps input order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::DirectoryEntry;
use crate::skill::{Skill, SkillId};

/// Filter criteria for the browse view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryFilter {
    /// Free text; empty admits everything.
    #[serde(default)]
    pub search_term: String,

    /// Skills an entry must all hold; empty admits everything.
    #[serde(default)]
    pub selected_skills: BTreeSet<SkillId>,

    /// Category at least one skill must belong to; `None` or empty admits everything.
    #[serde(default)]
    pub selected_category: Option<String>,
}

impl DirectoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_skill(mut self, skill_id: impl Into<String>) -> Self {
        self.selected_skills.insert(skill_id.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.selected_category = Some(category.into());
        self
    }

    /// Adds the skill if absent, removes it otherwise.
    pub fn toggle_skill(&mut self, skill_id: &str) {
        if !self.selected_skills.remove(skill_id) {
            self.selected_skills.insert(skill_id.to_string());
        }
    }

    /// True when no criterion restricts the result.
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && self.selected_skills.is_empty() && self.category().is_none()
    }

    fn category(&self) -> Option<&str> {
        self.selected_category
            .as_deref()
            .filter(|category| !category.is_empty())
    }

    pub fn matches_search(&self, entry: &DirectoryEntry) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        let contains = |text: &str| text.to_lowercase().contains(&needle);

        let profile = &entry.profile;
        contains(profile.username.as_str())
            || profile.full_name.as_deref().is_some_and(contains)
            || profile.bio.as_deref().is_some_and(contains)
    }

    pub fn matches_skills(&self, entry: &DirectoryEntry) -> bool {
        self.selected_skills
            .iter()
            .all(|skill_id| entry.has_skill(skill_id))
    }

    pub fn matches_category(&self, entry: &DirectoryEntry) -> bool {
        match self.category() {
            Some(category) => entry.has_category(category),
            None => true,
        }
    }

    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        self.matches_search(entry) && self.matches_skills(entry) && self.matches_category(entry)
    }

    /// Visible subset of `entries`, in input order.
    pub fn apply<'a>(&self, entries: &'a [DirectoryEntry]) -> Vec<&'a DirectoryEntry> {
        entries.iter().filter(|entry| self.matches(entry)).collect()
    }
}

/// Functional form of [`DirectoryFilter::apply`].
pub fn filter_directory<'a>(
    entries: &'a [DirectoryEntry],
    search_term: &str,
    selected_skills: &BTreeSet<SkillId>,
    selected_category: Option<&str>,
) -> Vec<&'a DirectoryEntry> {
    let filter = DirectoryFilter {
        search_term: search_term.to_string(),
        selected_skills: selected_skills.clone(),
        selected_category: selected_category.map(str::to_string),
    };
    filter.apply(entries)
}

/// Distinct categories across the whole catalog, in first-seen order.
pub fn categories(catalog: &[Skill]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for skill in catalog {
        if !seen.iter().any(|c| c == &skill.category) {
            seen.push(skill.category.clone());
        }
    }
    seen
}

/// Catalog skills offered as checkboxes for the selected category.
pub fn skill_options<'a>(catalog: &'a [Skill], selected_category: Option<&str>) -> Vec<&'a Skill> {
    match selected_category.filter(|category| !category.is_empty()) {
        Some(category) => catalog
            .iter()
            .filter(|skill| skill.category == category)
            .collect(),
        None => catalog.iter().collect(),
    }
}
