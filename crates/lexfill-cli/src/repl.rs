//! rustyline helper and transcript printing for the fill REPL.

use colored::Colorize;
use lexfill_core::session::{COMPLETION_MESSAGE, TranscriptEntry, TranscriptRole};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};

pub const STATUS_COMMAND: &str = "/status";
pub const TRANSCRIPT_COMMAND: &str = "/transcript";
pub const QUIT_COMMAND: &str = "/quit";

/// REPL helper that provides slash command completion, highlighting, and hints.
#[derive(Clone)]
pub struct FillHelper {
    commands: Vec<String>,
}

impl FillHelper {
    pub fn new() -> Self {
        Self {
            commands: [STATUS_COMMAND, TRANSCRIPT_COMMAND, QUIT_COMMAND]
                .iter()
                .map(|cmd| cmd.to_string())
                .collect(),
        }
    }
}

impl Helper for FillHelper {}

impl Completer for FillHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for FillHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }
}

impl Hinter for FillHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for FillHelper {}

/// Prints one transcript entry, colored by role.
pub fn print_entry(entry: &TranscriptEntry) {
    match entry.role {
        TranscriptRole::Assistant if entry.text == COMPLETION_MESSAGE => {
            println!("{}", entry.text.bright_green().bold());
        }
        TranscriptRole::Assistant => {
            for line in entry.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
        TranscriptRole::User => {
            println!("{}", format!("> {}", entry.text).green());
        }
    }
}
