//! Query building blocks shared by all gateway implementations.

use std::fmt;

use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Tables exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Table {
    /// Profiles keyed by identity id.
    Profiles,
    /// Read-only skill catalog.
    Skills,
    /// Profile/skill associations keyed by `(profile_id, skill_id)`.
    UserSkills,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::Skills => "skills",
            Table::UserSkills => "user_skills",
        }
    }
}

/// Embedded-resource select, rendered in PostgREST syntax.
///
/// ```
/// use teamfinder_core::gateway::JoinSpec;
///
/// let spec = JoinSpec::all()
///     .embed("user_skills", JoinSpec::none().embed("skills", JoinSpec::columns(["id", "name", "category"])));
/// assert_eq!(spec.to_select(), "*,user_skills(skills(id,name,category))");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoinSpec {
    /// Plain columns of this level; `*` selects all.
    pub columns: Vec<String>,
    /// Embedded relations, in render order.
    pub embeds: Vec<(String, JoinSpec)>,
}

impl JoinSpec {
    /// Selects every column of this level.
    pub fn all() -> Self {
        Self {
            columns: vec!["*".to_string()],
            embeds: Vec::new(),
        }
    }

    /// Selects no plain columns; only embedded relations.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            embeds: Vec::new(),
        }
    }

    pub fn embed(mut self, relation: impl Into<String>, spec: JoinSpec) -> Self {
        self.embeds.push((relation.into(), spec));
        self
    }

    pub fn selects_all(&self) -> bool {
        self.columns.iter().any(|c| c == "*")
    }

    /// Renders the `select=` value.
    pub fn to_select(&self) -> String {
        let mut parts: Vec<String> = self.columns.clone();
        for (relation, spec) in &self.embeds {
            parts.push(format!("{}({})", relation, spec.to_select()));
        }
        parts.join(",")
    }
}

impl fmt::Display for JoinSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_select())
    }
}

/// Equality filter `column = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Value as it appears in a query string (`eq.<value>`).
    pub fn value_text(&self) -> String {
        match &self.value {
            Value::String(text) => text.clone(),
            Value::Null => "null".to_string(),
            other => other.to_string(),
        }
    }

    /// True when `record[column]` equals the filter value.
    pub fn matches(&self, record: &Value) -> bool {
        record.get(&self.column) == Some(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_names() {
        assert_eq!(Table::Profiles.name(), "profiles");
        assert_eq!(Table::UserSkills.to_string(), "user_skills");
        assert_eq!(Table::UserSkills.as_ref(), "user_skills");
        assert_eq!("skills".parse::<Table>().unwrap(), Table::Skills);
    }

    #[test]
    fn test_join_spec_rendering() {
        let spec = JoinSpec::columns(["skill_id"]).embed("skills", JoinSpec::all());
        assert_eq!(spec.to_select(), "skill_id,skills(*)");
        assert!(!spec.selects_all());
        assert!(JoinSpec::all().selects_all());
    }

    #[test]
    fn test_filter_matches_and_renders() {
        let filter = Filter::eq("profile_id", "p1");
        assert_eq!(filter.value_text(), "p1");
        assert!(filter.matches(&json!({"profile_id": "p1"})));
        assert!(!filter.matches(&json!({"profile_id": "p2"})));
        assert!(!filter.matches(&json!({})));

        assert_eq!(Filter::eq("id", 7).value_text(), "7");
    }
}
