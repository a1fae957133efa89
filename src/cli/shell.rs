use std::{
    borrow::Cow,
    collections::HashMap,
    fmt,
    io::{self, BufRead},
    path::Path,
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use tracing::{debug, warn};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;

pub const SCRIPT_ENV: &str = "MOVE_INTAKE_CLI_SCRIPT";
const HISTORY_FILE: &str = "history.txt";

const SIDES: &[&str] = &["pickup", "drop"];
const SIDE_COMMANDS: &[&str] = &[
    "address",
    "property",
    "unit",
    "level",
    "lift",
    "driveway",
    "notes",
    "contacts",
    "contact-add",
    "contact-remove",
];

/// Starts the shell. With `MOVE_INTAKE_CLI_SCRIPT` set, commands are read
/// from stdin one per line and nothing prompts.
pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_usages())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    let history = context.base_dir().join(HISTORY_FILE);
    load_history(&mut editor, &history);

    cli_io::print_info("Move Intake. Type `help` for commands or `login` to start.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if let LoopControl::Exit = run_line(context, trimmed)? {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                cli_io::print_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let Err(err) = editor.save_history(&history) {
        warn!(%err, path = %history.display(), "could not save shell history");
    }
    Ok(())
}

fn load_history(editor: &mut Editor<CommandHelper, DefaultHistory>, path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(err) = editor.load_history(path) {
        debug!(%err, path = %path.display(), "shell history not loaded");
    }
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let LoopControl::Exit = run_line(context, trimmed)? {
            break;
        }
        if !context.running {
            break;
        }
    }
    Ok(())
}

/// Runs one line and reports its error; only shell-level failures propagate.
fn run_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    match handle_line(context, line) {
        Ok(control) => Ok(control),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            cli_io::print_warning(format!("Could not read that line: {}", err));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };

    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.to_string());

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Completes command names and their fixed-choice arguments, and hints at
/// the usage of a fully typed command.
struct CommandHelper {
    commands: Vec<String>,
    usages: HashMap<String, String>,
}

impl CommandHelper {
    fn new(entries: Vec<(&'static str, &'static str)>) -> Self {
        let mut commands: Vec<String> = entries
            .iter()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();

        let usages = entries
            .into_iter()
            .filter_map(|(name, usage)| {
                let args = usage.strip_prefix(name)?.trim();
                (!args.is_empty()).then(|| (name.to_string(), args.to_string()))
            })
            .collect();

        Self { commands, usages }
    }

    /// Fixed choices for the argument at `position` (1-based) of `command`.
    fn argument_choices(&self, command: &str, position: usize) -> Vec<String> {
        let fixed: &[&str] = match (command, position) {
            (cmd, 1) if SIDE_COMMANDS.contains(&cmd) => SIDES,
            ("reset", 1) => &["pickup", "drop", "items"],
            ("goto", 1) => &["shipper", "consignee", "items"],
            ("config", 1) => &["show", "set", "reset"],
            ("config", 2) => &["color", "lookup", "login-delay", "log-filter", "locale"],
            ("tab", 1) => &["order", "bids", "track", "payments", "profile"],
            ("panel", 1) => &[
                "pickup-address",
                "pickup-contacts",
                "drop-address",
                "drop-contacts",
                "items",
                "custom-item",
            ],
            ("custom-set", 1) => &[
                "name",
                "category",
                "weight",
                "length",
                "width",
                "height",
                "unit",
                "quantity",
                "description",
            ],
            ("property", 2) => &["single", "multi"],
            ("lift", 2) => &["yes", "no", "unset"],
            ("driveway", 2) => &["yes", "no"],
            ("help", 1) => return self.commands.clone(),
            _ => &[],
        };
        fixed.iter().map(|choice| choice.to_string()).collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = prefix[start..].to_ascii_lowercase();

        let words: Vec<&str> = prefix[..start].split_whitespace().collect();
        let choices = match words.split_first() {
            None => self.commands.clone(),
            Some((command, done)) => {
                self.argument_choices(&command.to_ascii_lowercase(), done.len() + 1)
            }
        };

        let candidates = choices
            .into_iter()
            .filter(|choice| choice.starts_with(&needle))
            .map(|choice| Pair {
                display: choice.clone(),
                replacement: choice,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usages
            .get(line.trim_start().to_ascii_lowercase().as_str())
            .map(|args| format!(" {}", args))
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::MemHistory;

    fn helper() -> CommandHelper {
        CommandHelper::new(vec![
            ("contacts", "contacts <pickup|drop>"),
            ("contact-add", "contact-add <pickup|drop> <name> <phone> <email>"),
            ("lift", "lift <pickup|drop> <yes|no|unset>"),
            ("next", "next"),
        ])
    }

    fn complete(helper: &CommandHelper, line: &str) -> (usize, Vec<String>) {
        let history = MemHistory::new();
        let ctx = ReadlineContext::new(&history);
        let (start, pairs) = helper.complete(line, line.len(), &ctx).unwrap();
        (start, pairs.into_iter().map(|pair| pair.replacement).collect())
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        assert!(parse_command_line("address pickup \"1 Martin").is_err());
        assert_eq!(parse_command_line("  next  ").unwrap(), vec!["next"]);
    }

    #[test]
    fn completes_command_names_then_arguments() {
        let helper = helper();
        assert_eq!(complete(&helper, "con"), (0, vec!["contact-add".into(), "contacts".into()]));
        assert_eq!(complete(&helper, "contacts p"), (9, vec!["pickup".into()]));
        assert_eq!(complete(&helper, "lift drop "), (10, vec!["yes".into(), "no".into(), "unset".into()]));
        assert!(complete(&helper, "next x").1.is_empty());
    }

    #[test]
    fn hints_show_the_remaining_usage() {
        let helper = helper();
        let history = MemHistory::new();
        let ctx = ReadlineContext::new(&history);

        assert_eq!(
            helper.hint("lift", 4, &ctx).as_deref(),
            Some(" <pickup|drop> <yes|no|unset>")
        );
        assert_eq!(helper.hint("next", 4, &ctx), None);
        assert_eq!(helper.hint("lif", 3, &ctx), None);
    }
}
