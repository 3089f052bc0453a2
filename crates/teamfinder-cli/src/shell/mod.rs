//! Interactive shell with three pages: home, browse and profile.
//!
//! Entering a page mounts it: browse reloads the directory and catalog,
//! profile re-checks the session unless an edit is in progress. The prompt
//! shows the active page.

mod command;
mod helper;

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use teamfinder_application::{BrowseView, ProfileSessionController, SessionState};
use teamfinder_core::config::BackendKind;
use teamfinder_core::gateway::RecordStore;
use teamfinder_core::skill::find_skill;

use crate::render;
use command::{Route, ShellCommand, command_words, help_entries, parse};
use helper::ShellHelper;

pub struct Shell {
    route: Route,
    backend: BackendKind,
    browse: BrowseView,
    profile: ProfileSessionController,
}

impl Shell {
    pub fn new(store: RecordStore, backend: BackendKind) -> Self {
        Self {
            route: Route::Home,
            backend,
            browse: BrowseView::new(store.clone()),
            profile: ProfileSessionController::new(store),
        }
    }

    pub async fn run(mut self, history: Option<PathBuf>) -> Result<()> {
        let mut rl: Editor<ShellHelper, DefaultHistory> = Editor::new()?;
        rl.set_helper(Some(ShellHelper::new()));
        if let Some(path) = &history {
            // A missing history file is expected on first run.
            let _ = rl.load_history(path);
        }

        println!("{}", "=== TeamFinder ===".bright_magenta().bold());
        println!(
            "{}",
            render::info_line("Type 'help' for commands, 'browse' or 'profile' to switch pages, 'quit' to exit.")
        );
        self.enter(Route::Home).await;

        loop {
            self.sync_helper(&mut rl);
            match rl.readline(&format!("teamfinder:{}> ", self.route)) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(trimmed);

                    match parse(self.route, trimmed) {
                        Ok(ShellCommand::Quit) => {
                            println!("{}", "Goodbye!".bright_green());
                            break;
                        }
                        Ok(command) => self.execute(command).await,
                        Err(message) => println!("{}", message.yellow()),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                Err(err) => {
                    eprintln!("{}", format!("Error: {:?}", err).red());
                    break;
                }
            }
        }

        if let Some(path) = &history {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            if let Err(e) = rl.save_history(path) {
                tracing::warn!(error = %e, "Failed to save shell history");
            }
        }
        Ok(())
    }

    /// Refreshes completion words for the current page and state.
    fn sync_helper(&self, rl: &mut Editor<ShellHelper, DefaultHistory>) {
        let Some(helper) = rl.helper_mut() else {
            return;
        };
        helper.set_commands(command_words(self.route));
        helper.clear_arguments();
        helper.set_arguments("go", Route::ALL.map(Route::name));
        match self.route {
            Route::Home => {}
            Route::Browse => {
                helper.set_arguments(
                    "skill",
                    self.browse.skill_options().into_iter().map(|s| s.id.clone()),
                );
                helper.set_arguments("category", self.browse.categories());
            }
            Route::Profile => {
                helper.set_arguments(
                    "set",
                    teamfinder_core::profile::DraftField::ALL.map(|f| f.column()),
                );
                helper.set_arguments(
                    "add",
                    self.profile.addable_skills().into_iter().map(|s| s.id.clone()),
                );
                helper.set_arguments(
                    "remove",
                    self.profile.skills().iter().map(|s| s.id.clone()),
                );
            }
        }
    }

    fn print_navbar(&self) {
        let items: Vec<String> = Route::ALL
            .iter()
            .map(|route| {
                if *route == self.route {
                    format!("[{}]", route).bold().to_string()
                } else {
                    route.name().bright_black().to_string()
                }
            })
            .collect();
        let signed_in = match self.profile.identity() {
            Some(identity) => identity.email.clone().unwrap_or_else(|| identity.id.clone()),
            None => "signed out".to_string(),
        };
        println!(
            "{}   {}",
            items.join("  "),
            render::info_line(&format!("{} | {}", signed_in, self.backend))
        );
    }

    async fn enter(&mut self, route: Route) {
        self.route = route;
        match route {
            Route::Home => {}
            Route::Browse => self.browse.mount().await,
            // An unsaved draft survives leaving and re-entering the page.
            Route::Profile if self.profile.draft().is_some() => {}
            Route::Profile => {
                // Failures are kept by the controller and shown on the page.
                let _ = self.profile.refresh().await;
            }
        }
        self.print_navbar();
        self.show_page();
    }

    fn show_page(&self) {
        match self.route {
            Route::Home => self.show_home(),
            Route::Browse => self.show_browse(),
            Route::Profile => self.show_profile(),
        }
    }

    fn show_home(&self) {
        println!("{}", "Find your hackathon team.".bold());
        println!("Browse builders by skill and category, or set up your own profile.");
        println!(
            "{}",
            render::info_line("Go to 'browse' to find teammates or 'profile' to sign in.")
        );
    }

    fn show_browse(&self) {
        if self.browse.is_loading() {
            println!("{}", render::info_line("Loading..."));
            return;
        }
        if let Some(err) = self.browse.load_error() {
            println!("{}", render::error_line(err));
        }

        let filter = self.browse.filter();
        if !filter.is_empty() {
            let mut parts: Vec<String> = Vec::new();
            if !filter.search_term.is_empty() {
                parts.push(format!("search \"{}\"", filter.search_term));
            }
            if !filter.selected_skills.is_empty() {
                let skills: Vec<&str> = filter.selected_skills.iter().map(String::as_str).collect();
                parts.push(format!("skills {}", skills.join(", ")));
            }
            if let Some(category) = filter.selected_category.as_deref() {
                parts.push(format!("category {}", category));
            }
            println!("{}", render::info_line(&format!("Filters: {}", parts.join("; "))));
        }

        let visible = self.browse.visible_profiles();
        if visible.is_empty() {
            println!("No profiles match your filters.");
        }
        for entry in &visible {
            println!("{}\n", render::entry_card(entry));
        }
        println!(
            "{}",
            render::info_line(&format!(
                "{} of {} profiles",
                visible.len(),
                self.browse.entries().len()
            ))
        );
    }

    fn show_profile(&self) {
        if self.profile.is_loading() {
            println!("{}", render::info_line("Loading..."));
            return;
        }
        if let Some(err) = self.profile.error() {
            println!("{}", render::error_line(err));
        }

        match self.profile.state() {
            SessionState::Unauthenticated { mode, form } => {
                println!("{}", format!("Please {} to continue", mode).bold());
                let password = "*".repeat(form.password.chars().count());
                println!("  email     {}", form.email);
                println!("  password  {}", password);
                if *mode == teamfinder_application::AuthMode::SignUp {
                    println!("  username  {}", form.username);
                }
                println!(
                    "{}",
                    render::info_line("Fill the form with 'email', 'password' (and 'username'), then 'submit'. 'mode' switches forms.")
                );
            }
            SessionState::Viewing => {
                if let Some(profile) = self.profile.profile() {
                    println!("{}", render::profile_card(profile, self.profile.skills()));
                }
                println!("{}", render::info_line("'edit' to change your profile, 'signout' to leave."));
            }
            SessionState::Editing {
                draft,
                selected_skill,
            } => {
                println!("{}", "Editing profile".bold());
                println!("{}", render::draft_table(draft));
                println!("  skills        {}", render::skill_badges(self.profile.skills()));
                if let Some(id) = selected_skill {
                    println!("  selected      {}", id);
                }
                println!(
                    "{}",
                    render::info_line("'set <field> <value>', 'add <skill>', 'remove <skill>', then 'save' or 'cancel'.")
                );
            }
        }
    }

    fn print_help(&self) {
        println!("{}", format!("Commands on {}:", self.route).bold());
        for (usage, description) in help_entries(self.route) {
            println!("  {:<40} {}", usage.cyan(), description);
        }
    }

    /// Prints a failure, or the success message followed by the page.
    fn report(&self, result: teamfinder_core::Result<()>, success: &str) {
        match result {
            Ok(()) => {
                if !success.is_empty() {
                    println!("{}", render::success_line(success));
                }
                self.show_page();
            }
            Err(err) => println!("{}", render::error_line(&err)),
        }
    }

    async fn execute(&mut self, command: ShellCommand) {
        match command {
            ShellCommand::Help => self.print_help(),
            ShellCommand::Quit => {}
            ShellCommand::Go(route) => self.enter(route).await,
            ShellCommand::Reload => self.enter(self.route).await,

            ShellCommand::List => self.show_browse(),
            ShellCommand::Search(term) => {
                self.browse.set_search_term(term);
                self.show_browse();
            }
            ShellCommand::ToggleSkill(key) => {
                match self.browse.find_skill(&key).map(|skill| skill.id.clone()) {
                    Some(id) => {
                        self.browse.toggle_skill(&id);
                        self.show_browse();
                    }
                    None => println!("{}", format!("Unknown skill '{}'. Try 'skills'.", key).yellow()),
                }
            }
            ShellCommand::Category(category) => {
                let known = category
                    .as_deref()
                    .is_none_or(|name| self.browse.categories().iter().any(|c| c == name));
                if known {
                    self.browse.select_category(category);
                    self.show_browse();
                } else {
                    println!("{}", "Unknown category. Try 'categories'.".yellow());
                }
            }
            ShellCommand::ClearFilters => {
                self.browse.clear_filters();
                self.show_browse();
            }
            ShellCommand::Skills => {
                println!("{}", render::catalog_listing(&self.browse.skill_options()));
            }
            ShellCommand::Categories => {
                for category in self.browse.categories() {
                    println!("  {}", category);
                }
            }

            ShellCommand::Show => self.show_profile(),
            ShellCommand::Mode => {
                self.profile.toggle_mode();
                self.show_profile();
            }
            ShellCommand::Form(field, value) => {
                let result = self.profile.set_form_field(field, value);
                self.report(result, "");
            }
            ShellCommand::Submit => {
                let result = self.profile.submit().await;
                self.report(result, "Welcome!");
            }
            ShellCommand::SignIn { email, password } => {
                let result = self.profile.sign_in(&email, &password).await;
                self.report(result, "Signed in.");
            }
            ShellCommand::SignUp {
                email,
                password,
                username,
            } => {
                let result = self.profile.sign_up(&email, &password, &username).await;
                self.report(result, "Account created.");
            }
            ShellCommand::Edit => {
                let result = self.profile.begin_edit();
                self.report(result, "");
            }
            ShellCommand::Set(field, value) => {
                let result = self.profile.set_draft_field(field, value);
                self.report(result, "");
            }
            ShellCommand::Save => {
                let result = self.profile.save().await;
                self.report(result, "Profile saved.");
            }
            ShellCommand::Cancel => {
                let result = self.profile.cancel_edit();
                self.report(result, "Changes discarded.");
            }
            ShellCommand::Add(key) => {
                let result = match key {
                    Some(key) => {
                        let id = find_skill(self.profile.catalog(), &key)
                            .map(|skill| skill.id.clone())
                            .unwrap_or(key);
                        match self.profile.select_skill(Some(&id)) {
                            Ok(()) => self.profile.add_skill().await,
                            Err(e) => Err(e),
                        }
                    }
                    None => self.profile.add_skill().await,
                };
                self.report(result, "");
            }
            ShellCommand::Remove(key) => {
                let id = find_skill(self.profile.skills(), &key)
                    .map(|skill| skill.id.clone())
                    .unwrap_or(key);
                let result = self.profile.remove_skill(&id).await;
                self.report(result, "");
            }
            ShellCommand::SignOut => {
                let result = self.profile.sign_out().await;
                self.report(result, "Signed out.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use teamfinder_core::profile::DraftField;
    use teamfinder_infrastructure::MemoryGateway;

    use super::*;

    fn shell() -> Shell {
        let gateway = Arc::new(MemoryGateway::with_demo_data());
        Shell::new(RecordStore::new(gateway), BackendKind::Memory)
    }

    #[tokio::test]
    async fn test_reentering_profile_keeps_draft() {
        colored::control::set_override(false);
        let mut shell = shell();
        shell.enter(Route::Profile).await;
        shell
            .profile
            .sign_up("newcomer@example.com", "secret123", "newcomer")
            .await
            .unwrap();
        shell.profile.begin_edit().unwrap();
        shell.profile.set_draft_field(DraftField::Bio, "Unsaved").unwrap();

        shell.enter(Route::Browse).await;
        shell.enter(Route::Profile).await;
        assert_eq!(shell.profile.draft().map(|d| d.bio.as_str()), Some("Unsaved"));

        shell.execute(ShellCommand::Reload).await;
        assert_eq!(shell.profile.draft().map(|d| d.bio.as_str()), Some("Unsaved"));
    }

    #[tokio::test]
    async fn test_entering_profile_refreshes_when_viewing() {
        colored::control::set_override(false);
        let mut shell = shell();
        shell.enter(Route::Profile).await;
        assert!(!shell.profile.is_loading());
        assert_eq!(shell.profile.state().name(), "unauthenticated");
    }

    #[tokio::test]
    async fn test_add_resolves_skill_by_name() {
        colored::control::set_override(false);
        let mut shell = shell();
        shell.enter(Route::Profile).await;
        shell
            .profile
            .sign_up("newcomer@example.com", "secret123", "newcomer")
            .await
            .unwrap();
        shell.profile.begin_edit().unwrap();

        shell.execute(ShellCommand::Add(Some("Tailwind CSS".to_string()))).await;
        assert_eq!(
            shell.profile.skills().iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            vec!["tailwind"]
        );
        shell.execute(ShellCommand::Remove("tailwind css".to_string())).await;
        assert!(shell.profile.skills().is_empty());
    }
}
