use std::borrow::Cow::{self, Borrowed, Owned};
use std::collections::HashMap;

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Completion, hints and highlighting for the shell.
///
/// Command names are completed at the start of the line; arguments are
/// completed from per-command word lists refreshed as the route changes.
#[derive(Clone, Default)]
pub struct ShellHelper {
    commands: Vec<String>,
    arguments: HashMap<String, Vec<String>>,
}

impl ShellHelper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_commands<I, S>(&mut self, commands: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands = commands.into_iter().map(Into::into).collect();
    }

    pub fn set_arguments<I, S>(&mut self, command: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments
            .insert(command.to_string(), words.into_iter().map(Into::into).collect());
    }

    pub fn clear_arguments(&mut self) {
        self.arguments.clear();
    }

    /// Start offset and matching words for the text before the cursor.
    fn candidates(&self, line: &str) -> (usize, Vec<&String>) {
        match line.split_once(' ') {
            None => (
                0,
                self.commands
                    .iter()
                    .filter(|cmd| cmd.starts_with(line))
                    .collect(),
            ),
            Some((command, rest)) => {
                let start = line.len() - rest.len();
                let words = self
                    .arguments
                    .get(command)
                    .map(|words| words.iter().filter(|w| w.starts_with(rest)).collect())
                    .unwrap_or_default();
                (start, words)
            }
        }
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let command = line.split_whitespace().next().unwrap_or_default();
        if !command.is_empty() && self.commands.iter().any(|cmd| cmd == command) {
            let rest = &line[command.len()..];
            Owned(format!("{}{}", command.bright_cyan(), rest))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let (start, words) = self.candidates(line);
        let typed = &line[start..];
        if typed.is_empty() {
            return None;
        }
        words
            .into_iter()
            .find(|word| word.len() > typed.len())
            .map(|word| word[typed.len()..].to_string())
    }
}

impl Validator for ShellHelper {}
