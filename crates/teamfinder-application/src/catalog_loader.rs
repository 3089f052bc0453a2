//! Skill catalog loader.

use teamfinder_core::error::Result;
use teamfinder_core::gateway::RecordStore;
use teamfinder_core::skill::Skill;

/// Fetches the full skill catalog, ordered by category.
///
/// Called once per view mount; the result is not cached.
#[derive(Clone)]
pub struct SkillCatalogLoader {
    store: RecordStore,
}

impl SkillCatalogLoader {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Vec<Skill>> {
        let skills = self.store.list_skills().await?;
        tracing::debug!(count = skills.len(), "Loaded skill catalog");
        Ok(skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use teamfinder_core::gateway::Table;
    use teamfinder_infrastructure::{GatewayOp, MemoryGateway};

    #[tokio::test]
    async fn test_load_orders_by_category() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.seed_skills(&[
            Skill::new("react", "React", "Frontend"),
            Skill::new("go", "Go", "Backend"),
        ]);
        let loader = SkillCatalogLoader::new(RecordStore::new(gateway));

        let skills = loader.load().await.unwrap();
        let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Go", "React"]);
    }

    #[tokio::test]
    async fn test_load_surfaces_gateway_error() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.fail_next(GatewayOp::SelectAll, Some(Table::Skills), "catalog offline");
        let loader = SkillCatalogLoader::new(RecordStore::new(gateway));

        let err = loader.load().await.unwrap_err();
        assert_eq!(err.user_message(), "catalog offline");
    }
}
