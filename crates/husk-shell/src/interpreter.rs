//! Line interpreter: tokenizer, pipeline dispatch, command registry.
//!
//! The interpreter is a registry-based dispatch system. Commands
//! implement the [`Command`] trait and are registered by name. A line is
//! tokenized, split into pipeline stages, and each stage is dispatched
//! in order, with the previous stage's output appended to the next
//! stage's arguments.

use std::collections::{HashMap, HashSet};

use husk_types::cipher::CipherService;
use husk_types::error::{HuskError, Result};
use husk_vfs::{FileSystem, UnitId, path};

use crate::history::History;
use crate::storage::KeyValueStore;

// ---------------------------------------------------------------------------
// Command trait and environment
// ---------------------------------------------------------------------------

/// Shared mutable state handed to every command.
pub struct Environment<'a> {
    pub fs: &'a mut FileSystem,
    pub history: &'a mut History,
    pub store: &'a mut dyn KeyValueStore,
    pub cipher: Option<&'a dyn CipherService>,
}

/// A single executable command.
pub trait Command {
    /// Primary name. Lookup is case-insensitive.
    fn name(&self) -> &str;
    /// Usage and description line shown by `help <name>`.
    fn about(&self) -> &str;
    /// Hidden commands run normally but stay out of the help listing.
    fn hidden(&self) -> bool {
        false
    }
    /// Run with the full argument vector; `args[0]` is the command name
    /// as typed. The returned string is the stage output; empty means no
    /// visible output.
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<String>;
}

/// Side effect a line requests beyond its text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Reset the display.
    Clear,
    /// Discard persisted state and rebuild the session from the seed.
    Reboot,
}

/// Result of interpreting one input line.
#[derive(Debug, PartialEq, Eq)]
pub struct LineResult {
    pub output: String,
    pub signal: Option<Signal>,
}

impl LineResult {
    pub(crate) fn empty() -> Self {
        Self {
            output: String::new(),
            signal: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry and dispatch
// ---------------------------------------------------------------------------

/// Registry of available commands with pipeline dispatch.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command. Replaces any existing command with the same
    /// name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_ascii_lowercase(), cmd);
    }

    /// Look up a command by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands
            .get(&name.to_ascii_lowercase())
            .map(|cmd| cmd.as_ref())
    }

    /// Sorted names of all non-hidden commands.
    pub fn visible_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .commands
            .values()
            .filter(|cmd| !cmd.hidden())
            .map(|cmd| cmd.name())
            .collect();
        names.sort_unstable();
        names
    }

    /// Interpret one input line end to end.
    ///
    /// A line that tokenizes to nothing yields an empty result. The
    /// signal is derived from the first token alone, so it is carried
    /// even when a pipeline follows.
    pub fn execute_line(&self, line: &str, env: &mut Environment<'_>) -> Result<LineResult> {
        self.execute_tokens(tokenize(line)?, env)
    }

    /// Dispatch an already-tokenized line.
    pub fn execute_tokens(
        &self,
        tokens: Vec<String>,
        env: &mut Environment<'_>,
    ) -> Result<LineResult> {
        let Some(first) = tokens.first() else {
            return Ok(LineResult::empty());
        };
        let signal = match first.to_ascii_lowercase().as_str() {
            "clear" => Some(Signal::Clear),
            "reboot" => Some(Signal::Reboot),
            _ => None,
        };
        let output = self.dispatch(tokens, env)?;
        Ok(LineResult { output, signal })
    }

    /// Run the pipeline stages strictly left to right. Every stage after
    /// the first receives the previous stage's whole output as one
    /// trailing argument, even when that output is empty. The line's
    /// output is the last stage's output.
    fn dispatch(&self, tokens: Vec<String>, env: &mut Environment<'_>) -> Result<String> {
        let mut carry: Option<String> = None;
        for mut stage in split_pipeline(tokens) {
            if let Some(previous) = carry.take() {
                stage.push(previous);
            }
            carry = Some(self.run_stage(&stage, env)?);
        }
        Ok(carry.unwrap_or_default())
    }

    /// Run one stage. An unknown name or a validation failure becomes
    /// the stage output, so the rest of the pipeline still runs; any
    /// other error aborts the line.
    fn run_stage(&self, args: &[String], env: &mut Environment<'_>) -> Result<String> {
        let Some(name) = args.first() else {
            return Ok(String::new());
        };
        log::trace!("stage: {args:?}");

        // `help` is intercepted: it answers from the registry itself.
        if name.eq_ignore_ascii_case("help") {
            return Ok(self.execute_help(args));
        }

        let Some(cmd) = self.get(name) else {
            return Ok(format!("{name}: command not found"));
        };
        match cmd.execute(args, env) {
            Ok(output) => Ok(output),
            Err(err @ HuskError::Validation { .. }) => Ok(err.to_string()),
            Err(err) => Err(err),
        }
    }

    /// `help <name>` for a known command prints its about line; anything
    /// else prints the banner and the sorted visible command names.
    fn execute_help(&self, args: &[String]) -> String {
        if args.len() == 2 {
            let name = args[1].to_ascii_lowercase();
            if let Some(cmd) = self.commands.get(&name) {
                return format!("{name}: {}", cmd.about());
            }
        }
        format!(
            "husk bash, version {}-release (x86_64-pc-linux-gnu)\n\
             These shell commands are defined internally.  Type 'help' to see this list.\n\
             Type 'help name' to find out more about the function 'name'.\n\n{}",
            env!("CARGO_PKG_VERSION"),
            self.visible_names().join("  ")
        )
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tokenizer: whitespace splitting with double-quote grouping.
// ---------------------------------------------------------------------------

/// Tokenize an input line.
///
/// Whitespace separates tokens except inside double quotes. After
/// scanning, a token that both starts and ends with `"` loses that one
/// enclosing layer; quote characters anywhere else in a token stay
/// verbatim. An unterminated quote is a parse error.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.trim().chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            },
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            },
            c => current.push(c),
        }
    }
    if in_quotes {
        return Err(HuskError::Parse("unterminated double quote".to_string()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    Ok(tokens.into_iter().map(strip_quotes).collect())
}

/// Remove one enclosing layer of double quotes, if present.
fn strip_quotes(token: String) -> String {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        token[1..token.len() - 1].to_string()
    } else {
        token
    }
}

/// Split a token vector into pipeline stages.
///
/// Pipe mode triggers when any token is exactly `|`. The tokens are
/// then rejoined with single spaces and re-split on `|`, so quoting
/// inside a pipeline is deliberately lost and a `|` embedded inside a
/// token splits too. Stages that are empty, or whose first argument is
/// empty, are dropped.
fn split_pipeline(tokens: Vec<String>) -> Vec<Vec<String>> {
    if !tokens.iter().any(|t| t == "|") {
        return vec![tokens];
    }
    tokens
        .join(" ")
        .split('|')
        .map(|stage| {
            stage
                .trim()
                .split(' ')
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|stage| stage.first().is_some_and(|arg| !arg.is_empty()))
        .collect()
}

// ---------------------------------------------------------------------------
// Argument helpers shared by the builtins
// ---------------------------------------------------------------------------

/// A command path argument resolved against the current tree.
#[derive(Debug)]
pub struct PathArg {
    /// The unit the path resolved to, if any.
    pub unit: Option<UnitId>,
    /// The path exactly as supplied (or `.` when defaulted), for
    /// error messages.
    pub path: String,
}

/// Resolve the first non-flag argument after the command name as a
/// path.
///
/// Defaults to `.` (the current directory) when no path is given or the
/// candidate is empty. Absolute paths resolve against the root,
/// relative ones against `pwd()`. Never fails: a resolver error or a
/// lookup miss both yield `unit: None` with the path preserved.
pub fn resolve_path_arg(fs: &FileSystem, args: &[String]) -> PathArg {
    let path = args
        .iter()
        .skip(1)
        .find(|arg| !arg.starts_with('-'))
        .filter(|arg| !arg.is_empty())
        .cloned()
        .unwrap_or_else(|| ".".to_string());

    if path == "." {
        return PathArg {
            unit: Some(fs.pointer()),
            path,
        };
    }
    let base = if path.starts_with('/') {
        "/".to_string()
    } else {
        fs.pwd()
    };
    let unit = match path::resolve(&base, &path) {
        Ok(segments) => fs.get(&segments),
        Err(_) => None,
    };
    PathArg { unit, path }
}

/// Collect single-character flags from `-x` style arguments, dropping
/// duplicates and anything not in `supported`.
pub fn parse_flags(args: &[String], supported: &[char]) -> HashSet<char> {
    let mut flags = HashSet::new();
    for arg in args.iter().skip(1) {
        if let Some(rest) = arg.strip_prefix('-') {
            flags.extend(rest.chars().filter(|c| supported.contains(c)));
        }
    }
    flags
}
