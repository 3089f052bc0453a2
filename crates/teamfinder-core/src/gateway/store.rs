//! Typed access to the TeamFinder tables.
//!
//! `RecordStore` turns the untyped gateway rows into domain models and back.
//! The loaders and the profile session controller only talk to the gateway
//! through this type (plus the auth half of the gateway).

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{DataGateway, Gateway};
use super::query::{Filter, JoinSpec, Table};
use crate::directory::{DirectoryEntry, DirectoryRow};
use crate::error::Result;
use crate::profile::{NewProfile, Profile, ProfileDraft};
use crate::skill::{ProfileSkill, Skill};

/// Column the skill catalog is ordered by.
pub const SKILL_ORDER_COLUMN: &str = "category";

#[derive(Clone)]
pub struct RecordStore {
    gateway: Arc<dyn Gateway>,
}

impl RecordStore {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// The underlying gateway, for authentication calls.
    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    /// `*,user_skills(skills(id,name,category))`
    pub fn directory_join() -> JoinSpec {
        JoinSpec::all().embed(
            Table::UserSkills.name(),
            JoinSpec::none().embed(
                Table::Skills.name(),
                JoinSpec::columns(["id", "name", "category"]),
            ),
        )
    }

    /// `skill_id,skills(*)`
    pub fn profile_skills_join() -> JoinSpec {
        JoinSpec::columns(["skill_id"]).embed(Table::Skills.name(), JoinSpec::all())
    }

    /// The full skill catalog, ordered by category.
    pub async fn list_skills(&self) -> Result<Vec<Skill>> {
        let rows = self
            .gateway
            .select_all(Table::Skills, Some(SKILL_ORDER_COLUMN))
            .await?;
        decode_rows(rows)
    }

    /// Every profile with its resolved skills.
    pub async fn list_directory(&self) -> Result<Vec<DirectoryEntry>> {
        let rows = self
            .gateway
            .select_joined(Table::Profiles, &Self::directory_join(), &[])
            .await?;
        let rows: Vec<DirectoryRow> = decode_rows(rows)?;
        Ok(rows.into_iter().map(DirectoryEntry::from).collect())
    }

    pub async fn get_profile(&self, id: &str) -> Result<Profile> {
        let row = self.gateway.select_one_by_id(Table::Profiles, id).await?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn create_profile(&self, profile: &NewProfile) -> Result<()> {
        let row = serde_json::to_value(profile)?;
        self.gateway.insert(Table::Profiles, row).await
    }

    /// Writes every draft field to the profile keyed by `id`.
    pub async fn update_profile(&self, id: &str, draft: &ProfileDraft) -> Result<()> {
        self.gateway
            .update(Table::Profiles, id, draft.to_update())
            .await
    }

    /// Skills associated with `profile_id`, without duplicates.
    pub async fn list_profile_skills(&self, profile_id: &str) -> Result<Vec<Skill>> {
        let rows = self
            .gateway
            .select_joined(
                Table::UserSkills,
                &Self::profile_skills_join(),
                &[Filter::eq("profile_id", profile_id)],
            )
            .await?;

        let mut skills: Vec<Skill> = Vec::with_capacity(rows.len());
        for mut row in rows {
            let embedded = row.get_mut(Table::Skills.name()).map(Value::take);
            match embedded {
                Some(Value::Null) | None => continue,
                Some(value) => {
                    let skill: Skill = serde_json::from_value(value)?;
                    if !skills.iter().any(|s| s.id == skill.id) {
                        skills.push(skill);
                    }
                }
            }
        }
        Ok(skills)
    }

    pub async fn add_profile_skill(&self, association: &ProfileSkill) -> Result<()> {
        let row = serde_json::to_value(association)?;
        self.gateway.insert(Table::UserSkills, row).await
    }

    pub async fn remove_profile_skill(&self, association: &ProfileSkill) -> Result<()> {
        self.gateway
            .delete_by_keys(
                Table::UserSkills,
                &[
                    Filter::eq("profile_id", association.profile_id.as_str()),
                    Filter::eq("skill_id", association.skill_id.as_str()),
                ],
            )
            .await
    }
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TeamfinderError;
    use crate::gateway::{AuthGateway, AuthSession, DataGateway, Identity, Record};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Returns canned rows and records every call as a string.
    #[derive(Default)]
    struct CannedGateway {
        rows: Vec<Record>,
        calls: Mutex<Vec<String>>,
    }

    impl CannedGateway {
        fn with_rows(rows: Vec<Record>) -> Self {
            Self {
                rows,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn log(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl AuthGateway for CannedGateway {
        async fn sign_up(&self, _email: &str, _password: &str) -> Result<Identity> {
            Err(TeamfinderError::gateway("unsupported"))
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthSession> {
            Err(TeamfinderError::gateway("unsupported"))
        }

        async fn sign_out(&self) -> Result<()> {
            Ok(())
        }

        async fn current_user(&self) -> Result<Option<Identity>> {
            Ok(None)
        }
    }

    #[async_trait]
    impl DataGateway for CannedGateway {
        async fn select_all(&self, table: Table, order_by: Option<&str>) -> Result<Vec<Record>> {
            self.log(format!("select_all {} {:?}", table, order_by));
            Ok(self.rows.clone())
        }

        async fn select_one_by_id(&self, table: Table, id: &str) -> Result<Record> {
            self.log(format!("select_one {} {}", table, id));
            self.rows
                .first()
                .cloned()
                .ok_or_else(|| TeamfinderError::not_found(table.name(), id))
        }

        async fn select_joined(
            &self,
            table: Table,
            join: &JoinSpec,
            filters: &[Filter],
        ) -> Result<Vec<Record>> {
            let filters: Vec<String> = filters
                .iter()
                .map(|f| format!("{}={}", f.column, f.value_text()))
                .collect();
            self.log(format!("select_joined {} {} {}", table, join, filters.join("&")));
            Ok(self.rows.clone())
        }

        async fn insert(&self, table: Table, record: Record) -> Result<()> {
            self.log(format!("insert {} {}", table, record));
            Ok(())
        }

        async fn update(&self, table: Table, id: &str, partial: Record) -> Result<()> {
            self.log(format!("update {} {} {}", table, id, partial["username"]));
            Ok(())
        }

        async fn delete_by_keys(&self, table: Table, keys: &[Filter]) -> Result<()> {
            let keys: Vec<String> = keys
                .iter()
                .map(|f| format!("{}={}", f.column, f.value_text()))
                .collect();
            self.log(format!("delete {} {}", table, keys.join("&")));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_list_skills_orders_by_category() {
        let gateway = Arc::new(CannedGateway::with_rows(vec![
            json!({"id": "2", "name": "Go", "category": "Backend"}),
        ]));
        let store = RecordStore::new(gateway.clone());

        let skills = store.list_skills().await.unwrap();
        assert_eq!(skills, vec![Skill::new("2", "Go", "Backend")]);
        assert_eq!(gateway.calls(), vec!["select_all skills Some(\"category\")"]);
    }

    #[tokio::test]
    async fn test_list_directory_builds_entries() {
        let gateway = Arc::new(CannedGateway::with_rows(vec![json!({
            "id": "p1",
            "username": "ada",
            "user_skills": [{"skills": {"id": "1", "name": "React", "category": "Frontend"}}]
        })]));
        let store = RecordStore::new(gateway.clone());

        let entries = store.list_directory().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].skills[0].name, "React");
        assert_eq!(
            gateway.calls(),
            vec!["select_joined profiles *,user_skills(skills(id,name,category)) "]
        );
    }

    #[tokio::test]
    async fn test_list_profile_skills_skips_missing_and_duplicates() {
        let react = json!({"id": "1", "name": "React", "category": "Frontend"});
        let gateway = Arc::new(CannedGateway::with_rows(vec![
            json!({"skill_id": "1", "skills": react.clone()}),
            json!({"skill_id": "1", "skills": react}),
            json!({"skill_id": "9", "skills": null}),
        ]));
        let store = RecordStore::new(gateway.clone());

        let skills = store.list_profile_skills("p1").await.unwrap();
        assert_eq!(skills, vec![Skill::new("1", "React", "Frontend")]);
        assert_eq!(
            gateway.calls(),
            vec!["select_joined user_skills skill_id,skills(*) profile_id=p1"]
        );
    }

    #[tokio::test]
    async fn test_get_profile_not_found() {
        let store = RecordStore::new(Arc::new(CannedGateway::default()));
        let err = store.get_profile("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_remove_profile_skill_uses_composite_key() {
        let gateway = Arc::new(CannedGateway::default());
        let store = RecordStore::new(gateway.clone());

        store
            .remove_profile_skill(&ProfileSkill::new("p1", "s1"))
            .await
            .unwrap();
        assert_eq!(gateway.calls(), vec!["delete user_skills profile_id=p1&skill_id=s1"]);
    }

    #[tokio::test]
    async fn test_update_profile_sends_draft() {
        let gateway = Arc::new(CannedGateway::default());
        let store = RecordStore::new(gateway.clone());
        let draft = ProfileDraft::from_profile(&Profile::new("p1", "ada"));

        store.update_profile("p1", &draft).await.unwrap();
        assert_eq!(gateway.calls(), vec!["update profiles p1 \"ada\""]);
    }
}
