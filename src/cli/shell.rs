use std::io::{self, BufRead};

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
use tracing::debug;

use crate::cli::core::{CliError, CommandError, LoopControl};
use crate::cli::output::{self, info as output_info};
use crate::cli::shell_context::{CliMode, ShellContext};
use crate::domain::{EditMode, Field, LaunchParams, RecordKey};

/// Switches the shell to line-by-line script mode when set.
pub const SCRIPT_ENV: &str = "NOMENCLATURE_CLI_SCRIPT";

const USAGE: &str =
    "usage: nomenclature_cli <create|modify> <article> <number> <index> [sequence]";

pub fn run_cli() -> Result<(), CliError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let params = parse_launch_args(args.as_slice())?;
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    if mode == CliMode::Script {
        output::set_plain(true);
    }

    let mut context = ShellContext::new(mode, params)?;
    debug!(status = %context.status(), "shell started");

    let result = match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    };
    debug!(status = %context.status(), "shell stopped");
    result
}

/// Reads the launch parameters: mode, then the record key.
pub fn parse_launch_args<S: AsRef<str>>(args: &[S]) -> Result<LaunchParams, CliError> {
    let args: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
    let (mode, article, number, index, sequence) = match args.as_slice() {
        [mode, article, number, index] => (mode, article, number, index, None),
        [mode, article, number, index, sequence] => {
            (mode, article, number, index, Some(*sequence))
        }
        _ => return Err(CliError::Usage(USAGE.into())),
    };

    let mode: EditMode = mode
        .parse()
        .map_err(|_| CliError::Usage(format!("unknown mode `{}`\n{}", mode, USAGE)))?;
    let sequence = sequence
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|_| CliError::Usage(format!("sequence must be a number, got `{}`", raw)))
        })
        .transpose()?;
    let key = RecordKey::new(*article, *number, *index).with_sequence(sequence);
    Ok(LaunchParams::new(mode, key))
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    let helper = CommandHelper::new(context.command_names());
    editor.set_helper(Some(helper));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    while context.running {
        let prompt = context.prompt();
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output_info("Fermeture de la fenêtre.");
                context.close_on_exit()?;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match handle_line(context, trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    if context.running {
        context.close_on_exit()?;
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(&err);
            return Ok(LoopControl::Continue);
        }
    };

    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    context.last_command = Some(line.to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// Completes command names, then field names after `set` and command names
/// after `help`.
struct CommandHelper {
    commands: Vec<String>,
    fields: Vec<&'static str>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        let fields = Field::ALL.iter().map(|field| field.short_name()).collect();
        Self { commands, fields }
    }

    /// Start offset of the word under the cursor and its candidates.
    fn candidates(&self, prefix: &str) -> (usize, Vec<String>) {
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = prefix[start..].to_ascii_lowercase();
        let previous: Vec<&str> = prefix[..start].split_whitespace().collect();

        let pool: Vec<&str> = match previous.as_slice() {
            [] => self.commands.iter().map(String::as_str).collect(),
            [command] if command.eq_ignore_ascii_case("set") => self.fields.clone(),
            [command] if command.eq_ignore_ascii_case("help") => {
                self.commands.iter().map(String::as_str).collect()
            }
            _ => Vec::new(),
        };
        let matches = pool
            .into_iter()
            .filter(|name| name.starts_with(&needle))
            .map(str::to_string)
            .collect();
        (start, matches)
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
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, shell_words::ParseError> {
    split(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_args_need_mode_and_full_key() {
        let params = parse_launch_args(&["modify", "ART1", "12", "A", "3"]).unwrap();
        assert_eq!(params.mode, EditMode::Modify);
        assert_eq!(params.key, RecordKey::new("ART1", "12", "A").with_sequence(Some(3)));

        let params = parse_launch_args(&["create", "ART1", "12", "A"]).unwrap();
        assert_eq!(params.mode, EditMode::Create);
        assert_eq!(params.key.sequence, None);

        assert!(matches!(
            parse_launch_args(&["create", "ART1"]),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_launch_args(&["delete", "ART1", "12", "A"]),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_launch_args(&["create", "ART1", "12", "A", "x"]),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn command_lines_honour_quotes() {
        let tokens = parse_command_line("set label \"Roulement a billes\"").unwrap();
        assert_eq!(tokens, vec!["set", "label", "Roulement a billes"]);
        assert!(parse_command_line("set label \"open").is_err());
    }

    #[test]
    fn completion_follows_the_command_word() {
        let helper = CommandHelper::new(vec!["show", "set", "save", "help", "close"]);

        let (start, matches) = helper.candidates("s");
        assert_eq!(start, 0);
        assert_eq!(matches, vec!["save", "set", "show"]);

        let (start, matches) = helper.candidates("set la");
        assert_eq!(start, 4);
        assert_eq!(matches, vec!["label"]);

        let (_, matches) = helper.candidates("help cl");
        assert_eq!(matches, vec!["close"]);

        let (_, matches) = helper.candidates("save now");
        assert!(matches.is_empty());
    }
}
