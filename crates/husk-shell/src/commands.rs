//! Core command set: the filesystem builtins, history, help, and
//! session control.
//!
//! Output strings and error messages here are contract; front ends
//! render them verbatim. Validation errors surface through the
//! dispatcher as `command: message` stage output.

use husk_types::error::{HuskError, Result};
use husk_vfs::{FileSystem, UnitId, path};

use crate::interpreter::{Command, CommandRegistry, Environment, parse_flags, resolve_path_arg};
use crate::session;

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn about(&self) -> &str {
        "cat [file] - Display the contents of the specified file."
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<String> {
        if args.len() != 2 {
            return Err(HuskError::validation("cat", "No such file."));
        }
        let target = resolve_path_arg(env.fs, args);
        match target.unit {
            Some(id) if env.fs.unit(id).is_file() => {
                Ok(env.fs.content(id).unwrap_or_default().to_string())
            },
            _ => Err(HuskError::validation(
                "cat",
                format!("{}: No such file, or argument is a directory.", target.path),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn about(&self) -> &str {
        "cd [path] - Change directory to the specified path."
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<String> {
        if args.len() != 2 {
            return Ok(String::new());
        }
        let target = &args[1];
        if target == "." {
            return Ok(String::new());
        }
        let base = if target.starts_with('/') {
            "/".to_string()
        } else {
            env.fs.pwd()
        };
        let moved = path::resolve(&base, target)
            .and_then(|segments| env.fs.cd(&segments));
        match moved {
            Ok(()) => Ok(String::new()),
            Err(_) => Ok("No such directory.".to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn about(&self) -> &str {
        "ls [-OPTIONS] [path] - List directory contents. -l use a long listing format. -a do not ignore entries starting with a period (.)."
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<String> {
        let flags = parse_flags(args, &['a', 'l']);
        let target = resolve_path_arg(env.fs, args);
        let Some(id) = target.unit else {
            return Err(HuskError::validation(
                "ls",
                format!("{}: No such file or directory", target.path),
            ));
        };

        // A file target lists just itself; a directory lists its
        // children in insertion order.
        let entries: Vec<UnitId> = if env.fs.unit(id).is_dir() {
            env.fs
                .children(id)
                .iter()
                .copied()
                .filter(|&child| {
                    flags.contains(&'a') || !env.fs.unit(child).name.starts_with('.')
                })
                .collect()
        } else {
            vec![id]
        };

        if flags.contains(&'l') {
            let lines: Vec<String> = entries
                .iter()
                .map(|&entry| long_entry(env.fs, entry))
                .collect();
            Ok(lines.join("\n"))
        } else {
            let names: Vec<&str> = entries
                .iter()
                .map(|&entry| env.fs.unit(entry).name.as_str())
                .collect();
            Ok(names.join("  "))
        }
    }
}

/// One `ls -l` line. The mode, link count, and owner columns are fixed;
/// the simulation does not model permissions.
fn long_entry(fs: &FileSystem, id: UnitId) -> String {
    let unit = fs.unit(id);
    let kind = if unit.is_file() { '-' } else { 'd' };
    let stamp = fs.last_modified(id).format("%d %b %H:%M");
    format!(
        "{kind}rw-r--r--  11  guest  guest  {:>6}  {stamp}  {}",
        fs.size(id),
        unit.name
    )
}

// ---------------------------------------------------------------------------
// rm
// ---------------------------------------------------------------------------

struct RmCmd;
impl Command for RmCmd {
    fn name(&self) -> &str {
        "rm"
    }
    fn about(&self) -> &str {
        "rm [name] - Delete the file with the specified name."
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<String> {
        if args.len() == 1 {
            return Err(HuskError::validation("rm", "No filename specified."));
        }
        if args.len() > 2 {
            return Err(HuskError::validation("rm", "Too many parameters supplied."));
        }
        let target = resolve_path_arg(env.fs, args);
        let Some(id) = target.unit else {
            return Err(HuskError::validation(
                "rm",
                format!("{}: No such file, or directory.", target.path),
            ));
        };
        if id == env.fs.root() {
            return Err(HuskError::validation(
                "rm",
                format!("{}: Unable to remove root catalogue", target.path),
            ));
        }
        if env.fs.unit(id).is_dir() {
            return Err(HuskError::validation(
                "rm",
                format!("{}: Unable to remove directory.", target.path),
            ));
        }
        let parent = env.fs.unit(id).parent;
        let name = env.fs.unit(id).name.clone();
        env.fs.detach(parent, &name);
        Ok(String::new())
    }
}

// ---------------------------------------------------------------------------
// touch
// ---------------------------------------------------------------------------

struct TouchCmd;
impl Command for TouchCmd {
    fn name(&self) -> &str {
        "touch"
    }
    fn about(&self) -> &str {
        "touch [name] - Create a file with the specified name."
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<String> {
        if args.len() == 1 {
            return Err(HuskError::validation("touch", "No filename specified."));
        }
        if args.len() > 2 {
            return Err(HuskError::validation("touch", "Too many parameters supplied."));
        }
        let target = resolve_path_arg(env.fs, args);
        // The final segment must be a valid name even when the target
        // exists, so `touch /` reports the name, not the collision.
        split_new_path(env.fs, "touch", &target.path)?;
        if let Some(existing) = target.unit {
            let message = if env.fs.unit(existing).is_dir() {
                format!("{}: Unable to create directory.", target.path)
            } else {
                format!("{}: File already exists.", target.path)
            };
            return Err(HuskError::validation("touch", message));
        }
        create_file_at(env.fs, "touch", &target.path, "")?;
        Ok(String::new())
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn about(&self) -> &str {
        "echo [string] [redirect] [file] - Display a line of text. Optional: specify a redirect operator (> to overwrite or >> to append) to send the output to a [file]."
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<String> {
        let rest = &args[1..];
        let redirect_pos = rest.iter().position(|arg| arg == ">" || arg == ">>");
        let message_args = match redirect_pos {
            Some(pos) => &rest[..pos],
            None => rest,
        };
        // Only the first literal \n expands.
        let message = message_args.join(" ").replacen("\\n", "\n", 1);

        let Some(pos) = redirect_pos else {
            return Ok(message);
        };
        let append = rest[pos] == ">>";

        // The redirect tail is parsed like a command of its own, so the
        // target comes from the shared path-argument rules.
        let target = resolve_path_arg(env.fs, &rest[pos..]);
        match target.unit {
            Some(existing) => {
                if !env.fs.unit(existing).is_file() {
                    return Err(HuskError::validation("echo", "Invalid file name."));
                }
                if append {
                    env.fs.append_file(existing, &message)?;
                } else {
                    env.fs.update_file(existing, &message)?;
                }
            },
            None => {
                create_file_at(env.fs, "echo", &target.path, &message)?;
            },
        }
        Ok(String::new())
    }
}

/// Split `path_arg` into the absolute segments of the parent directory
/// plus a validated final name; failures are validation errors under
/// `command`.
fn split_new_path(
    fs: &FileSystem,
    command: &str,
    path_arg: &str,
) -> Result<(Vec<String>, String)> {
    let base = if path_arg.starts_with('/') {
        "/".to_string()
    } else {
        fs.pwd()
    };
    let mut segments = path::resolve(&base, path_arg).map_err(|_| {
        HuskError::validation(command, format!("{path_arg}: No such directory."))
    })?;
    let name = segments.pop().unwrap_or_default();
    if !path::is_valid_name(&name) {
        return Err(HuskError::validation(
            command,
            format!("{path_arg}: Invalid file name."),
        ));
    }
    Ok((segments, name))
}

/// Create a new file at `path_arg` holding `content`. The final path
/// segment must be a valid fresh name and the rest must resolve to an
/// existing directory.
fn create_file_at(
    fs: &mut FileSystem,
    command: &str,
    path_arg: &str,
    content: &str,
) -> Result<UnitId> {
    let (parent_segments, name) = split_new_path(fs, command, path_arg)?;
    let parent = fs
        .get(&parent_segments)
        .filter(|&p| fs.unit(p).is_dir())
        .ok_or_else(|| {
            HuskError::validation(command, format!("{path_arg}: No such directory."))
        })?;
    let file = fs.create_file(&name, content);
    fs.attach(parent, file)?;
    Ok(file)
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn about(&self) -> &str {
        "pwd - Print the name of the current working directory."
    }
    fn execute(&self, _args: &[String], env: &mut Environment<'_>) -> Result<String> {
        Ok(env.fs.pwd())
    }
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

struct HistoryCmd;
impl Command for HistoryCmd {
    fn name(&self) -> &str {
        "history"
    }
    fn about(&self) -> &str {
        "history [-OPTIONS] - Display the list of recent commands. -c clear the history list."
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<String> {
        if args.len() == 2 && args[1] == "-c" {
            env.history.clear();
            env.store.remove(session::HISTORY_KEY)?;
        }
        let lines: Vec<String> = env
            .history
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| format!("{index}  {entry}"))
            .collect();
        Ok(lines.join("\n"))
    }
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn about(&self) -> &str {
        "help [command] - Show a list of available commands, or help for a specific command."
    }
    fn execute(&self, _args: &[String], _env: &mut Environment<'_>) -> Result<String> {
        // Dispatch intercepts `help` and answers from the registry; this
        // body is reached only when a front end invokes the handler
        // directly.
        Ok("Type 'help' at the prompt for the command list.".to_string())
    }
}

// ---------------------------------------------------------------------------
// version
// ---------------------------------------------------------------------------

struct VersionCmd;
impl Command for VersionCmd {
    fn name(&self) -> &str {
        "version"
    }
    fn about(&self) -> &str {
        "version - Display the version of this terminal application."
    }
    fn execute(&self, _args: &[String], _env: &mut Environment<'_>) -> Result<String> {
        Ok(format!(
            "husk: version {}-release (in-memory shell simulation)",
            env!("CARGO_PKG_VERSION")
        ))
    }
}

// ---------------------------------------------------------------------------
// clear / reboot
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn about(&self) -> &str {
        "clear - Clear the terminal window."
    }
    fn execute(&self, _args: &[String], _env: &mut Environment<'_>) -> Result<String> {
        // The display reset rides on the line signal; the command itself
        // has no output.
        Ok(String::new())
    }
}

struct RebootCmd;
impl Command for RebootCmd {
    fn name(&self) -> &str {
        "reboot"
    }
    fn about(&self) -> &str {
        "reboot - Reboot the terminal and reset saved environment."
    }
    fn execute(&self, _args: &[String], env: &mut Environment<'_>) -> Result<String> {
        env.store.remove(session::FS_KEY)?;
        env.store.remove(session::HISTORY_KEY)?;
        Ok(String::new())
    }
}

// ---------------------------------------------------------------------------
// encrypt / decrypt
// ---------------------------------------------------------------------------

struct EncryptCmd;
impl Command for EncryptCmd {
    fn name(&self) -> &str {
        "encrypt"
    }
    fn about(&self) -> &str {
        "encrypt [message] [password] - Encrypt a provided message using the password."
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<String> {
        if args.len() != 3 {
            return Ok("encrypt: Invalid number of arguments.".to_string());
        }
        match env.cipher {
            Some(cipher) => Ok(cipher.encrypt(&args[1], &args[2])),
            None => Ok("encrypt: cipher service not available.".to_string()),
        }
    }
}

struct DecryptCmd;
impl Command for DecryptCmd {
    fn name(&self) -> &str {
        "decrypt"
    }
    fn about(&self) -> &str {
        "decrypt [encoded] [password] - Decrypt a provided message using the password."
    }
    fn execute(&self, args: &[String], env: &mut Environment<'_>) -> Result<String> {
        if args.len() != 3 {
            return Ok("decrypt: Invalid number of arguments.".to_string());
        }
        let Some(cipher) = env.cipher else {
            return Ok("decrypt: cipher service not available.".to_string());
        };
        cipher
            .decrypt(&args[1], &args[2])
            .ok_or_else(|| HuskError::validation("decrypt", "Invalid ciphertext"))
    }
}

/// Register the core command set.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(CatCmd));
    reg.register(Box::new(CdCmd));
    reg.register(Box::new(LsCmd));
    reg.register(Box::new(RmCmd));
    reg.register(Box::new(TouchCmd));
    reg.register(Box::new(EchoCmd));
    reg.register(Box::new(PwdCmd));
    reg.register(Box::new(HistoryCmd));
    reg.register(Box::new(HelpCmd));
    reg.register(Box::new(VersionCmd));
    reg.register(Box::new(ClearCmd));
    reg.register(Box::new(RebootCmd));
    reg.register(Box::new(EncryptCmd));
    reg.register(Box::new(DecryptCmd));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::History;
    use crate::interpreter::{LineResult, Signal};
    use crate::seed::seed_filesystem;
    use crate::storage::{KeyValueStore, MemoryStore};

    struct Fixture {
        fs: FileSystem,
        history: History,
        store: MemoryStore,
    }

    fn setup() -> (CommandRegistry, Fixture) {
        let mut reg = CommandRegistry::new();
        register_builtins(&mut reg);
        let fixture = Fixture {
            fs: seed_filesystem(),
            history: History::new(),
            store: MemoryStore::new(),
        };
        (reg, fixture)
    }

    fn exec(reg: &CommandRegistry, fixture: &mut Fixture, line: &str) -> LineResult {
        let mut env = Environment {
            fs: &mut fixture.fs,
            history: &mut fixture.history,
            store: &mut fixture.store,
            cipher: None,
        };
        reg.execute_line(line, &mut env).unwrap()
    }

    fn out(reg: &CommandRegistry, fixture: &mut Fixture, line: &str) -> String {
        exec(reg, fixture, line).output
    }

    // -- cat --

    #[test]
    fn cat_prints_file_content() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "cat /docs/shoplist.txt"),
            "-Apples\n-Bananas\n-Cookies"
        );
    }

    #[test]
    fn cat_relative_after_cd() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "cd docs"), "");
        assert_eq!(
            out(&reg, &mut fx, "cat shoplist.txt"),
            "-Apples\n-Bananas\n-Cookies"
        );
    }

    #[test]
    fn cat_wrong_arg_count() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "cat"), "cat: No such file.");
        assert_eq!(out(&reg, &mut fx, "cat a b"), "cat: No such file.");
    }

    #[test]
    fn cat_missing_or_directory() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "cat nope.txt"),
            "cat: nope.txt: No such file, or argument is a directory."
        );
        assert_eq!(
            out(&reg, &mut fx, "cat docs"),
            "cat: docs: No such file, or argument is a directory."
        );
    }

    // -- cd / pwd --

    #[test]
    fn cd_and_pwd_round_trip() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "pwd"), "/");
        assert_eq!(out(&reg, &mut fx, "cd docs/private"), "");
        assert_eq!(out(&reg, &mut fx, "pwd"), "/docs/private");
        assert_eq!(out(&reg, &mut fx, "cd .."), "");
        assert_eq!(out(&reg, &mut fx, "pwd"), "/docs");
    }

    #[test]
    fn cd_dot_is_a_no_op() {
        let (reg, mut fx) = setup();
        out(&reg, &mut fx, "cd docs");
        assert_eq!(out(&reg, &mut fx, "cd ."), "");
        assert_eq!(out(&reg, &mut fx, "pwd"), "/docs");
    }

    #[test]
    fn cd_failure_is_plain_output() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "cd nowhere"), "No such directory.");
        assert_eq!(out(&reg, &mut fx, "cd cool.txt"), "No such directory.");
        assert_eq!(out(&reg, &mut fx, "cd .."), "No such directory.");
        assert_eq!(out(&reg, &mut fx, "pwd"), "/");
    }

    #[test]
    fn cd_without_exactly_one_arg_is_silent() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "cd"), "");
        assert_eq!(out(&reg, &mut fx, "cd a b"), "");
        assert_eq!(out(&reg, &mut fx, "pwd"), "/");
    }

    // -- ls --

    #[test]
    fn ls_skips_dot_entries_by_default() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "ls"), "docs  more  stuff  cool.txt");
    }

    #[test]
    fn ls_all_shows_dot_entries() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "ls -a"),
            ".tmp-dir  .hidden  docs  more  stuff  cool.txt"
        );
    }

    #[test]
    fn ls_file_target_lists_itself() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "ls cool.txt"), "cool.txt");
    }

    #[test]
    fn ls_missing_target() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "ls ghost"),
            "ls: ghost: No such file or directory"
        );
    }

    #[test]
    fn ls_long_format_columns() {
        let (reg, mut fx) = setup();
        let listing = out(&reg, &mut fx, "ls -l docs");
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("-rw-r--r--  11  guest  guest  "));
        assert!(lines[0].ends_with("  moretodo.txt"));
        // "A, B, C." is eight bytes, right-aligned to six columns.
        assert!(lines[0].contains("     8  "));
        assert!(lines[3].starts_with("drw-r--r--"));
    }

    #[test]
    fn ls_long_of_subdirectory_by_path() {
        let (reg, mut fx) = setup();
        let listing = out(&reg, &mut fx, "ls -la /docs/private");
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("  secret.txt"));
        assert!(lines[1].ends_with("  opt"));
    }

    // -- rm --

    #[test]
    fn rm_detaches_a_file() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "rm cool.txt"), "");
        assert_eq!(out(&reg, &mut fx, "ls"), "docs  more  stuff");
    }

    #[test]
    fn rm_argument_counts() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "rm"), "rm: No filename specified.");
        assert_eq!(
            out(&reg, &mut fx, "rm a b"),
            "rm: Too many parameters supplied."
        );
    }

    #[test]
    fn rm_missing_target() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "rm ghost.txt"),
            "rm: ghost.txt: No such file, or directory."
        );
    }

    #[test]
    fn rm_root_always_fails() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "rm /"),
            "rm: /: Unable to remove root catalogue"
        );
        out(&reg, &mut fx, "cd docs");
        assert_eq!(
            out(&reg, &mut fx, "rm /"),
            "rm: /: Unable to remove root catalogue"
        );
    }

    #[test]
    fn rm_directory_fails() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "rm docs"),
            "rm: docs: Unable to remove directory."
        );
    }

    // -- touch --

    #[test]
    fn touch_creates_an_empty_file() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "touch notes.txt"), "");
        assert_eq!(out(&reg, &mut fx, "cat notes.txt"), "");
        assert_eq!(
            out(&reg, &mut fx, "ls"),
            "docs  more  stuff  cool.txt  notes.txt"
        );
    }

    #[test]
    fn touch_twice_reports_existing_file_once_listed() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "touch twice.txt"), "");
        assert_eq!(
            out(&reg, &mut fx, "touch twice.txt"),
            "touch: twice.txt: File already exists."
        );
        let listing = out(&reg, &mut fx, "ls");
        assert_eq!(listing.matches("twice.txt").count(), 1);
    }

    #[test]
    fn touch_existing_directory() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "touch docs"),
            "touch: docs: Unable to create directory."
        );
    }

    #[test]
    fn touch_invalid_name() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "touch bad*name"),
            "touch: bad*name: Invalid file name."
        );
    }

    #[test]
    fn touch_root_reports_the_name_not_the_collision() {
        // `/` resolves to no final segment at all, and the name check
        // runs before the existence check.
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "touch /"), "touch: /: Invalid file name.");
    }

    #[test]
    fn touch_missing_parent() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "touch ghost/new.txt"),
            "touch: ghost/new.txt: No such directory."
        );
    }

    #[test]
    fn touch_nested_path() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "touch /docs/tmp/scratch.txt"), "");
        assert_eq!(out(&reg, &mut fx, "ls /docs/tmp"), "scratch.txt");
    }

    // -- echo --

    #[test]
    fn echo_joins_arguments() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "echo hello world"), "hello world");
        assert_eq!(out(&reg, &mut fx, "echo"), "");
    }

    #[test]
    fn echo_expands_only_the_first_newline() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "echo a\\nb\\nc"), "a\nb\\nc");
    }

    #[test]
    fn echo_overwrite_redirect() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "echo fresh > cool.txt"), "");
        assert_eq!(out(&reg, &mut fx, "cat cool.txt"), "fresh");
    }

    #[test]
    fn echo_append_redirect_concatenates() {
        let (reg, mut fx) = setup();
        out(&reg, &mut fx, "echo one > log.txt");
        assert_eq!(out(&reg, &mut fx, "echo two >> log.txt"), "");
        assert_eq!(out(&reg, &mut fx, "cat log.txt"), "onetwo");
    }

    #[test]
    fn echo_redirect_creates_missing_file() {
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "echo note > /docs/note.txt"), "");
        assert_eq!(out(&reg, &mut fx, "cat /docs/note.txt"), "note");
    }

    #[test]
    fn echo_redirect_to_directory() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "echo x > docs"),
            "echo: Invalid file name."
        );
    }

    #[test]
    fn echo_redirect_missing_parent() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "echo x > ghost/out.txt"),
            "echo: ghost/out.txt: No such directory."
        );
    }

    #[test]
    fn echo_redirect_without_target_hits_the_pointer() {
        // The redirect tail defaults to `.` like any path argument, and
        // the current directory is never a file.
        let (reg, mut fx) = setup();
        assert_eq!(out(&reg, &mut fx, "echo x >"), "echo: Invalid file name.");
    }

    // -- history --

    #[test]
    fn history_lists_zero_based_and_includes_itself() {
        let (reg, mut fx) = setup();
        fx.history.push("pwd");
        fx.history.push("history");
        assert_eq!(out(&reg, &mut fx, "history"), "0  pwd\n1  history");
    }

    #[test]
    fn history_clear_flag_empties_buffer_and_store() {
        let (reg, mut fx) = setup();
        fx.history.push("pwd");
        fx.store.set(session::HISTORY_KEY, "pwd").unwrap();
        assert_eq!(out(&reg, &mut fx, "history -c"), "");
        assert!(fx.history.is_empty());
        assert_eq!(fx.store.get(session::HISTORY_KEY), None);
    }

    // -- help / version --

    #[test]
    fn help_for_known_command() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "help pwd"),
            "pwd: pwd - Print the name of the current working directory."
        );
        // Lookup is case-insensitive and echoes the lowercased name.
        assert_eq!(
            out(&reg, &mut fx, "help PWD"),
            "pwd: pwd - Print the name of the current working directory."
        );
    }

    #[test]
    fn help_banner_lists_visible_commands() {
        let (reg, mut fx) = setup();
        let banner = out(&reg, &mut fx, "help");
        assert!(banner.starts_with("husk bash, version "));
        assert!(banner.contains("Type 'help name'"));
        let names = banner.lines().last().unwrap();
        assert_eq!(
            names,
            "cat  cd  clear  decrypt  echo  encrypt  help  history  ls  pwd  reboot  rm  touch  version"
        );
    }

    #[test]
    fn help_unknown_command_falls_back_to_banner() {
        let (reg, mut fx) = setup();
        let banner = out(&reg, &mut fx, "help nosuch");
        assert!(banner.starts_with("husk bash, version "));
    }

    #[test]
    fn version_banner() {
        let (reg, mut fx) = setup();
        let banner = out(&reg, &mut fx, "version");
        assert!(banner.starts_with("husk: version "));
        assert!(banner.contains(env!("CARGO_PKG_VERSION")));
    }

    // -- clear / reboot --

    #[test]
    fn clear_outputs_nothing_and_signals() {
        let (reg, mut fx) = setup();
        let result = exec(&reg, &mut fx, "clear");
        assert_eq!(result.output, "");
        assert_eq!(result.signal, Some(Signal::Clear));
    }

    #[test]
    fn reboot_drops_persisted_keys() {
        let (reg, mut fx) = setup();
        fx.store.set(session::FS_KEY, "snapshot").unwrap();
        fx.store.set(session::HISTORY_KEY, "pwd").unwrap();
        let result = exec(&reg, &mut fx, "reboot");
        assert_eq!(result.output, "");
        assert_eq!(result.signal, Some(Signal::Reboot));
        assert_eq!(fx.store.get(session::FS_KEY), None);
        assert_eq!(fx.store.get(session::HISTORY_KEY), None);
    }

    // -- encrypt / decrypt --

    struct TagCipher;
    impl husk_types::cipher::CipherService for TagCipher {
        fn encrypt(&self, message: &str, password: &str) -> String {
            format!("<{password}|{message}>")
        }
        fn decrypt(&self, ciphertext: &str, password: &str) -> Option<String> {
            ciphertext
                .strip_prefix(&format!("<{password}|"))
                .and_then(|rest| rest.strip_suffix('>'))
                .map(str::to_string)
        }
    }

    fn exec_with_cipher(
        reg: &CommandRegistry,
        fixture: &mut Fixture,
        line: &str,
    ) -> String {
        let mut env = Environment {
            fs: &mut fixture.fs,
            history: &mut fixture.history,
            store: &mut fixture.store,
            cipher: Some(&TagCipher),
        };
        reg.execute_line(line, &mut env).unwrap().output
    }

    #[test]
    fn encrypt_requires_two_arguments() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "encrypt onlymessage"),
            "encrypt: Invalid number of arguments."
        );
        assert_eq!(
            out(&reg, &mut fx, "decrypt"),
            "decrypt: Invalid number of arguments."
        );
    }

    #[test]
    fn encrypt_without_service() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "encrypt msg pw"),
            "encrypt: cipher service not available."
        );
    }

    #[test]
    fn encrypt_and_decrypt_delegate_to_the_service() {
        let (reg, mut fx) = setup();
        assert_eq!(exec_with_cipher(&reg, &mut fx, "encrypt msg pw"), "<pw|msg>");
        assert_eq!(exec_with_cipher(&reg, &mut fx, "decrypt <pw|msg> pw"), "msg");
    }

    #[test]
    fn decrypt_failure_is_a_validation_error() {
        let (reg, mut fx) = setup();
        assert_eq!(
            exec_with_cipher(&reg, &mut fx, "decrypt garbage pw"),
            "decrypt: Invalid ciphertext"
        );
    }

    // -- pipelines over the builtins --

    #[test]
    fn echo_pipes_into_cat() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "echo /docs/ok.txt | cat"),
            "I am ok."
        );
    }

    #[test]
    fn unknown_command_mid_pipeline_feeds_forward() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "nosuch | echo"),
            "nosuch: command not found"
        );
    }

    #[test]
    fn validation_error_feeds_forward() {
        let (reg, mut fx) = setup();
        assert_eq!(
            out(&reg, &mut fx, "cat ghost.txt | echo"),
            "cat: ghost.txt: No such file, or argument is a directory."
        );
    }
}
