//! Routes and the command grammar of the shell.

use std::fmt;
use std::str::FromStr;

use teamfinder_application::AuthField;
use teamfinder_core::TeamfinderError;
use teamfinder_core::profile::DraftField;

/// The three pages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Browse,
    Profile,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Home, Route::Browse, Route::Profile];

    pub fn name(self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Browse => "browse",
            Route::Profile => "profile",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Route {
    type Err = String;

    /// Accepts page names with or without a leading slash; `/` is home.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('/') {
            "" | "home" => Ok(Route::Home),
            "browse" => Ok(Route::Browse),
            "profile" => Ok(Route::Profile),
            other => Err(format!("Unknown page '{}' (home, browse, profile)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Quit,
    Go(Route),
    Reload,

    // browse
    List,
    Search(String),
    ToggleSkill(String),
    Category(Option<String>),
    ClearFilters,
    Skills,
    Categories,

    // profile
    Show,
    Mode,
    Form(AuthField, String),
    Submit,
    SignIn { email: String, password: String },
    SignUp {
        email: String,
        password: String,
        username: String,
    },
    Edit,
    Set(DraftField, String),
    Save,
    Cancel,
    Add(Option<String>),
    Remove(String),
    SignOut,
}

const GLOBAL_HELP: &[(&str, &str)] = &[
    ("home | browse | profile", "Go to a page"),
    ("reload", "Reload the current page"),
    ("help", "Show commands for this page"),
    ("quit", "Exit"),
];

const BROWSE_HELP: &[(&str, &str)] = &[
    ("list", "Show matching profiles"),
    ("search [text]", "Filter by username, name or bio (empty clears)"),
    ("skill <id|name>", "Toggle a required skill"),
    ("category [name]", "Filter by skill category (empty clears)"),
    ("clear", "Reset all filters"),
    ("skills", "List skills offered for the selected category"),
    ("categories", "List skill categories"),
];

const PROFILE_HELP: &[(&str, &str)] = &[
    ("show", "Show the profile page"),
    ("mode", "Switch between sign in and sign up"),
    ("email | password | username <value>", "Fill in the form"),
    ("submit", "Sign in or sign up with the form"),
    ("signin <email> <password>", "Sign in directly"),
    ("signup <email> <password> <username>", "Create an account directly"),
    ("edit", "Start editing your profile"),
    ("set <field> [value]", "Change a draft field (empty clears)"),
    ("save", "Save the draft"),
    ("cancel", "Discard the draft"),
    ("add [skill]", "Add a skill (while editing)"),
    ("remove <skill>", "Remove a skill (while editing)"),
    ("signout", "Sign out"),
];

/// Usage and description of every command available on `route`.
pub fn help_entries(route: Route) -> Vec<(&'static str, &'static str)> {
    let page: &[(&str, &str)] = match route {
        Route::Home => &[],
        Route::Browse => BROWSE_HELP,
        Route::Profile => PROFILE_HELP,
    };
    page.iter().chain(GLOBAL_HELP).copied().collect()
}

/// Command words available on `route`, for completion.
pub fn command_words(route: Route) -> Vec<&'static str> {
    let mut words = vec!["help", "quit", "exit", "reload", "home", "browse", "profile"];
    match route {
        Route::Home => {}
        Route::Browse => words.extend([
            "list",
            "search",
            "skill",
            "category",
            "clear",
            "skills",
            "categories",
        ]),
        Route::Profile => words.extend([
            "show", "mode", "email", "password", "username", "submit", "signin", "signup",
            "edit", "set", "save", "cancel", "add", "remove", "signout",
        ]),
    }
    words
}

fn rest(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn required(command: &str, text: &str, usage: &str) -> Result<String, String> {
    rest(text).ok_or_else(|| format!("Usage: {} {}", command, usage))
}

/// Parses one input line for `route`.
pub fn parse(route: Route, line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, args) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    match word {
        "help" | "?" => return Ok(ShellCommand::Help),
        "quit" | "exit" => return Ok(ShellCommand::Quit),
        "reload" => return Ok(ShellCommand::Reload),
        "go" => return args.parse().map(ShellCommand::Go),
        _ => {}
    }
    if let Ok(target) = word.parse::<Route>() {
        if args.trim().is_empty() && !word.is_empty() {
            return Ok(ShellCommand::Go(target));
        }
    }

    let command = match (route, word) {
        (Route::Browse, "list" | "ls") => ShellCommand::List,
        (Route::Browse, "search") => ShellCommand::Search(args.trim().to_string()),
        (Route::Browse, "skill") => {
            ShellCommand::ToggleSkill(required(word, args, "<id|name>")?)
        }
        (Route::Browse, "category") => ShellCommand::Category(rest(args)),
        (Route::Browse, "clear") => ShellCommand::ClearFilters,
        (Route::Browse, "skills") => ShellCommand::Skills,
        (Route::Browse, "categories") => ShellCommand::Categories,

        (Route::Profile, "show") => ShellCommand::Show,
        (Route::Profile, "mode") => ShellCommand::Mode,
        (Route::Profile, "email" | "password" | "username") => {
            let field: AuthField = word.parse().map_err(|e: TeamfinderError| e.to_string())?;
            ShellCommand::Form(field, args.trim().to_string())
        }
        (Route::Profile, "submit") => ShellCommand::Submit,
        (Route::Profile, "signin") => match args.split_whitespace().collect::<Vec<_>>()[..] {
            [email, password] => ShellCommand::SignIn {
                email: email.to_string(),
                password: password.to_string(),
            },
            _ => return Err("Usage: signin <email> <password>".to_string()),
        },
        (Route::Profile, "signup") => match args.split_whitespace().collect::<Vec<_>>()[..] {
            [email, password, username] => ShellCommand::SignUp {
                email: email.to_string(),
                password: password.to_string(),
                username: username.to_string(),
            },
            _ => return Err("Usage: signup <email> <password> <username>".to_string()),
        },
        (Route::Profile, "edit") => ShellCommand::Edit,
        (Route::Profile, "set") => {
            let args = args.trim();
            let (field, value) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
            if field.is_empty() {
                return Err("Usage: set <field> [value]".to_string());
            }
            let field: DraftField = field.parse().map_err(|e: TeamfinderError| e.to_string())?;
            ShellCommand::Set(field, value.trim().to_string())
        }
        (Route::Profile, "save") => ShellCommand::Save,
        (Route::Profile, "cancel") => ShellCommand::Cancel,
        (Route::Profile, "add") => ShellCommand::Add(rest(args)),
        (Route::Profile, "remove" | "rm") => {
            ShellCommand::Remove(required(word, args, "<skill>")?)
        }
        (Route::Profile, "signout" | "logout") => ShellCommand::SignOut,

        _ => {
            return Err(format!(
                "Unknown command '{}' on {}. Type 'help' for commands.",
                word, route
            ));
        }
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_parsing() {
        assert_eq!("/".parse::<Route>().unwrap(), Route::Home);
        assert_eq!("/browse".parse::<Route>().unwrap(), Route::Browse);
        assert!("settings".parse::<Route>().is_err());
    }

    #[test]
    fn test_navigation_from_any_page() {
        assert_eq!(parse(Route::Home, "profile"), Ok(ShellCommand::Go(Route::Profile)));
        assert_eq!(parse(Route::Profile, "go /browse"), Ok(ShellCommand::Go(Route::Browse)));
        assert_eq!(parse(Route::Browse, "quit"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn test_browse_commands() {
        assert_eq!(
            parse(Route::Browse, "search  react dev "),
            Ok(ShellCommand::Search("react dev".to_string()))
        );
        assert_eq!(parse(Route::Browse, "search"), Ok(ShellCommand::Search(String::new())));
        assert_eq!(
            parse(Route::Browse, "skill Tailwind CSS"),
            Ok(ShellCommand::ToggleSkill("Tailwind CSS".to_string()))
        );
        assert_eq!(parse(Route::Browse, "category"), Ok(ShellCommand::Category(None)));
        assert!(parse(Route::Browse, "skill").is_err());
    }

    #[test]
    fn test_commands_are_scoped_to_their_page() {
        assert!(parse(Route::Home, "search react").is_err());
        assert!(parse(Route::Browse, "edit").is_err());
    }

    #[test]
    fn test_profile_commands() {
        assert_eq!(
            parse(Route::Profile, "signin ada@example.com secret1"),
            Ok(ShellCommand::SignIn {
                email: "ada@example.com".to_string(),
                password: "secret1".to_string(),
            })
        );
        assert!(parse(Route::Profile, "signup ada@example.com secret1").is_err());
        assert_eq!(
            parse(Route::Profile, "set bio Building things in Rust"),
            Ok(ShellCommand::Set(
                DraftField::Bio,
                "Building things in Rust".to_string()
            ))
        );
        assert_eq!(
            parse(Route::Profile, "set location"),
            Ok(ShellCommand::Set(DraftField::Location, String::new()))
        );
        assert!(parse(Route::Profile, "set shoe-size 42").is_err());
        assert_eq!(
            parse(Route::Profile, "email ada@example.com"),
            Ok(ShellCommand::Form(AuthField::Email, "ada@example.com".to_string()))
        );
        assert_eq!(parse(Route::Profile, "add"), Ok(ShellCommand::Add(None)));
    }

    #[test]
    fn test_help_covers_command_words() {
        for route in Route::ALL {
            assert!(!help_entries(route).is_empty());
            assert!(command_words(route).contains(&"help"));
        }
    }
}
