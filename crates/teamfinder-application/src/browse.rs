//! Browse view: the directory with its filter criteria.

use teamfinder_core::TeamfinderError;
use teamfinder_core::directory::{self, DirectoryEntry, DirectoryFilter};
use teamfinder_core::gateway::RecordStore;
use teamfinder_core::skill::{self, Skill};

use crate::catalog_loader::SkillCatalogLoader;
use crate::directory_loader::ProfileDirectoryLoader;

/// State behind the browse page.
///
/// `mount` fetches the catalog and the directory concurrently. A failed
/// fetch is logged and leaves its collection empty; the view leaves the
/// loading state either way. Every criteria change re-filters immediately.
pub struct BrowseView {
    catalog_loader: SkillCatalogLoader,
    directory_loader: ProfileDirectoryLoader,
    loading: bool,
    catalog: Vec<Skill>,
    entries: Vec<DirectoryEntry>,
    filter: DirectoryFilter,
    load_error: Option<TeamfinderError>,
}

impl BrowseView {
    pub fn new(store: RecordStore) -> Self {
        Self {
            catalog_loader: SkillCatalogLoader::new(store.clone()),
            directory_loader: ProfileDirectoryLoader::new(store),
            loading: true,
            catalog: Vec::new(),
            entries: Vec::new(),
            filter: DirectoryFilter::default(),
            load_error: None,
        }
    }

    /// Loads the catalog and the directory. Filter criteria are kept.
    pub async fn mount(&mut self) {
        self.loading = true;
        self.load_error = None;

        let (catalog, entries) = tokio::join!(
            self.catalog_loader.load(),
            self.directory_loader.load()
        );

        self.catalog = catalog.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load skill catalog");
            self.load_error.get_or_insert(e);
            Vec::new()
        });
        self.entries = entries.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load profile directory");
            self.load_error.get_or_insert(e);
            Vec::new()
        });
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// First fetch failure of the last mount, for display.
    pub fn load_error(&self) -> Option<&TeamfinderError> {
        self.load_error.as_ref()
    }

    pub fn catalog(&self) -> &[Skill] {
        &self.catalog
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn filter(&self) -> &DirectoryFilter {
        &self.filter
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.search_term = term.into();
    }

    pub fn toggle_skill(&mut self, skill_id: &str) {
        self.filter.toggle_skill(skill_id);
    }

    /// Selects a category; `None` or an empty name clears it.
    pub fn select_category(&mut self, category: Option<String>) {
        self.filter.selected_category = category.filter(|c| !c.is_empty());
    }

    pub fn clear_filters(&mut self) {
        self.filter = DirectoryFilter::default();
    }

    /// Entries passing the current criteria, in directory order.
    pub fn visible_profiles(&self) -> Vec<&DirectoryEntry> {
        self.filter.apply(&self.entries)
    }

    /// Distinct catalog categories in catalog order.
    pub fn categories(&self) -> Vec<String> {
        directory::categories(&self.catalog)
    }

    /// Skills offered for selection under the selected category.
    pub fn skill_options(&self) -> Vec<&Skill> {
        directory::skill_options(&self.catalog, self.filter.selected_category.as_deref())
    }

    /// Catalog skill by id or, case-insensitively, by name.
    pub fn find_skill(&self, key: &str) -> Option<&Skill> {
        skill::find_skill(&self.catalog, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use teamfinder_core::gateway::Table;
    use teamfinder_infrastructure::{GatewayOp, MemoryGateway};

    fn view(gateway: Arc<MemoryGateway>) -> BrowseView {
        BrowseView::new(RecordStore::new(gateway))
    }

    #[tokio::test]
    async fn test_mount_loads_and_exits_loading() {
        let mut browse = view(Arc::new(MemoryGateway::with_demo_data()));
        assert!(browse.is_loading());

        browse.mount().await;
        assert!(!browse.is_loading());
        assert!(!browse.catalog().is_empty());
        assert!(!browse.entries().is_empty());
        assert!(browse.load_error().is_none());
    }

    #[tokio::test]
    async fn test_directory_failure_degrades_to_empty() {
        let gateway = Arc::new(MemoryGateway::with_demo_data());
        gateway.fail_next(GatewayOp::SelectJoined, Some(Table::Profiles), "offline");
        let mut browse = view(gateway);

        browse.mount().await;
        assert!(!browse.is_loading());
        assert!(browse.entries().is_empty());
        assert!(!browse.catalog().is_empty());
        assert_eq!(browse.load_error().unwrap().user_message(), "offline");
    }

    #[tokio::test]
    async fn test_select_category_narrows_skill_options() {
        let mut browse = view(Arc::new(MemoryGateway::with_demo_data()));
        browse.mount().await;

        let all = browse.skill_options().len();
        browse.select_category(Some("Design".to_string()));
        let design = browse.skill_options();
        assert!(design.len() < all);
        assert!(design.iter().all(|s| s.category == "Design"));

        browse.select_category(Some(String::new()));
        assert_eq!(browse.filter().selected_category, None);
    }

    #[tokio::test]
    async fn test_find_skill_by_id_or_name() {
        let mut browse = view(Arc::new(MemoryGateway::with_demo_data()));
        browse.mount().await;

        assert_eq!(browse.find_skill("rust").map(|s| s.name.as_str()), Some("Rust"));
        assert_eq!(browse.find_skill("postgresql").map(|s| s.id.as_str()), Some("postgres"));
        assert!(browse.find_skill("cobol").is_none());
    }
}
