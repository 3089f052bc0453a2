use anyhow::{Result, bail};
use colored::Colorize;
use teamfinder_application::BrowseView;
use teamfinder_core::gateway::RecordStore;

use crate::render;

/// Loads the directory once, applies the given criteria and prints matches.
pub async fn run(
    store: RecordStore,
    search: Option<String>,
    skills: Vec<String>,
    category: Option<String>,
) -> Result<()> {
    let mut browse = BrowseView::new(store);
    browse.mount().await;
    if let Some(err) = browse.load_error() {
        eprintln!("{}", render::error_line(err));
    }

    if let Some(term) = search {
        browse.set_search_term(term);
    }
    for key in &skills {
        let Some(id) = browse.find_skill(key).map(|skill| skill.id.clone()) else {
            bail!("Unknown skill '{}'", key);
        };
        if !browse.filter().selected_skills.contains(&id) {
            browse.toggle_skill(&id);
        }
    }
    browse.select_category(category);

    let visible = browse.visible_profiles();
    for entry in &visible {
        println!("{}\n", render::entry_card(entry));
    }
    println!(
        "{}",
        format!("{} of {} profiles", visible.len(), browse.entries().len()).bright_black()
    );
    Ok(())
}
