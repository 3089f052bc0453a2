//! Browse view over the memory gateway.

use std::sync::Arc;

use serde_json::json;
use teamfinder_application::BrowseView;
use teamfinder_core::gateway::{RecordStore, Table};
use teamfinder_core::skill::Skill;
use teamfinder_infrastructure::{GatewayOp, MemoryGateway};

/// Catalog React/Frontend(1), Go/Backend(2); A holds {1}, B holds {1, 2}.
fn scenario() -> Arc<MemoryGateway> {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.seed_skills(&[
        Skill::new("1", "React", "Frontend"),
        Skill::new("2", "Go", "Backend"),
    ]);
    gateway.seed_rows(
        Table::Profiles,
        vec![
            json!({"id": "a", "username": "alice", "bio": "Loves hooks and components"}),
            json!({"id": "b", "username": "bob", "full_name": "Bob Builder", "bio": "Writes services"}),
        ],
    );
    gateway.seed_rows(
        Table::UserSkills,
        vec![
            json!({"profile_id": "a", "skill_id": "1"}),
            json!({"profile_id": "b", "skill_id": "1"}),
            json!({"profile_id": "b", "skill_id": "2"}),
        ],
    );
    gateway
}

async fn mounted() -> BrowseView {
    let mut browse = BrowseView::new(RecordStore::new(scenario()));
    browse.mount().await;
    browse
}

fn usernames(browse: &BrowseView) -> Vec<String> {
    browse
        .visible_profiles()
        .iter()
        .map(|entry| entry.profile.username.clone())
        .collect()
}

#[tokio::test]
async fn test_no_criteria_shows_everyone_in_order() {
    let browse = mounted().await;
    assert_eq!(usernames(&browse), vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_all_selected_skills_required() {
    let mut browse = mounted().await;
    browse.toggle_skill("1");
    browse.toggle_skill("2");
    assert_eq!(usernames(&browse), vec!["bob"]);

    browse.toggle_skill("2");
    assert_eq!(usernames(&browse), vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_category_filter() {
    let mut browse = mounted().await;
    browse.select_category(Some("Backend".to_string()));
    assert_eq!(usernames(&browse), vec!["bob"]);

    browse.select_category(None);
    assert_eq!(usernames(&browse), vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_search_matches_bio_case_insensitively() {
    let mut browse = mounted().await;
    browse.set_search_term("HOOKS");
    assert_eq!(usernames(&browse), vec!["alice"]);

    browse.set_search_term("builder");
    assert_eq!(usernames(&browse), vec!["bob"]);
}

#[tokio::test]
async fn test_criteria_combine_and_clear() {
    let mut browse = mounted().await;
    browse.set_search_term("alice");
    browse.select_category(Some("Backend".to_string()));
    assert!(browse.visible_profiles().is_empty());

    browse.clear_filters();
    assert!(browse.filter().is_empty());
    assert_eq!(usernames(&browse), vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_categories_follow_catalog_order() {
    let browse = mounted().await;
    // The catalog is fetched ordered by category.
    assert_eq!(browse.categories(), vec!["Backend", "Frontend"]);
}

#[tokio::test]
async fn test_remount_keeps_criteria_and_sees_new_rows() {
    let gateway = scenario();
    let mut browse = BrowseView::new(RecordStore::new(gateway.clone()));
    browse.mount().await;
    browse.toggle_skill("2");

    gateway.seed_rows(Table::Profiles, vec![json!({"id": "c", "username": "carol"})]);
    gateway.seed_rows(
        Table::UserSkills,
        vec![json!({"profile_id": "c", "skill_id": "2"})],
    );
    browse.mount().await;
    assert_eq!(usernames(&browse), vec!["bob", "carol"]);
}

#[tokio::test]
async fn test_catalog_failure_keeps_directory() {
    let gateway = scenario();
    gateway.fail_next(GatewayOp::SelectAll, Some(Table::Skills), "catalog offline");
    let mut browse = BrowseView::new(RecordStore::new(gateway));

    browse.mount().await;
    assert!(!browse.is_loading());
    assert!(browse.catalog().is_empty());
    assert!(browse.categories().is_empty());
    assert_eq!(usernames(&browse), vec!["alice", "bob"]);
}
