//! Hand-rolled argument parsing for the `todo` binary.

use std::path::PathBuf;

use todo_core::editor::{Format, TASK_TEMPLATE};
use todo_core::{FilterMode, ViewMode};

use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List { html: bool },
    Add { title: String, content: Option<String> },
    Toggle(i64),
    Edit { id: i64, title: String, content: Option<String> },
    Delete(i64),
    Preview(String),
    Format { format: Format, text: String },
    Health,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArgs {
    pub api_url: Option<String>,
    pub config: Option<PathBuf>,
    pub yes: bool,
    pub filter: Option<FilterMode>,
    pub view: Option<ViewMode>,
    pub command: Command,
}

/// Parse everything after the program name. Flags may appear before or
/// after the command.
pub fn parse_args(args: &[String]) -> Result<ParsedArgs, CliError> {
    let mut index = 0usize;
    let mut api_url = None;
    let mut config = None;
    let mut yes = false;
    let mut filter = None;
    let mut view = None;
    let mut html = false;
    let mut content = None;
    let mut template = false;
    let mut positional: Vec<String> = Vec::new();

    while let Some(token) = args.get(index) {
        match token.as_str() {
            "-h" | "--help" => {
                return Ok(help());
            }
            "-y" | "--yes" => {
                yes = true;
                index += 1;
            }
            "--html" => {
                html = true;
                index += 1;
            }
            "--template" => {
                template = true;
                index += 1;
            }
            "--api-url" => {
                api_url = Some(take_value(args, index, "--api-url")?);
                index += 2;
            }
            "--config" => {
                config = Some(PathBuf::from(take_value(args, index, "--config")?));
                index += 2;
            }
            "--content" => {
                content = Some(take_value(args, index, "--content")?);
                index += 2;
            }
            "--filter" => {
                let value = take_value(args, index, "--filter")?;
                filter = Some(value.parse().map_err(usage)?);
                index += 2;
            }
            "--view" => {
                let value = take_value(args, index, "--view")?;
                view = Some(value.parse().map_err(usage)?);
                index += 2;
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(usage(format!("error: unknown argument: '{flag}'")));
            }
            value => {
                positional.push(value.to_string());
                index += 1;
            }
        }
    }

    if template {
        if content.is_some() {
            return Err(usage("error: --content and --template cannot be used together"));
        }
        content = Some(TASK_TEMPLATE.to_string());
    }

    let mut positional = positional.into_iter();
    let name = positional.next();
    let rest: Vec<String> = positional.collect();

    let command = match name.as_deref() {
        None | Some("help") => Command::Help,
        Some("list") => {
            expect_args("list", &rest, 0)?;
            Command::List { html }
        }
        Some("add") => {
            expect_args("add", &rest, 1)?;
            Command::Add {
                title: rest[0].clone(),
                content: content.take(),
            }
        }
        Some("toggle") => {
            expect_args("toggle", &rest, 1)?;
            Command::Toggle(parse_id(&rest[0])?)
        }
        Some("edit") => {
            expect_args("edit", &rest, 2)?;
            Command::Edit {
                id: parse_id(&rest[0])?,
                title: rest[1].clone(),
                content: content.take(),
            }
        }
        Some("delete") => {
            expect_args("delete", &rest, 1)?;
            Command::Delete(parse_id(&rest[0])?)
        }
        Some("preview") => {
            expect_args("preview", &rest, 1)?;
            Command::Preview(rest[0].clone())
        }
        Some("format") => {
            if rest.is_empty() || rest.len() > 2 {
                return Err(usage(format!(
                    "error: format accepts 1 or 2 arguments, received {}",
                    rest.len()
                )));
            }
            Command::Format {
                format: rest[0].parse().map_err(usage)?,
                text: rest.get(1).cloned().unwrap_or_default(),
            }
        }
        Some("health") => {
            expect_args("health", &rest, 0)?;
            Command::Health
        }
        Some(other) => return Err(usage(format!("error: unknown command '{other}'"))),
    };

    if html && !matches!(command, Command::List { .. }) {
        return Err(usage("error: --html only applies to list"));
    }
    if content.is_some() {
        return Err(usage("error: --content and --template only apply to add and edit"));
    }

    Ok(ParsedArgs {
        api_url,
        config,
        yes,
        filter,
        view,
        command,
    })
}

fn help() -> ParsedArgs {
    ParsedArgs {
        api_url: None,
        config: None,
        yes: false,
        filter: None,
        view: None,
        command: Command::Help,
    }
}

fn usage(msg: impl Into<String>) -> CliError {
    CliError::Usage(msg.into())
}

fn take_value(args: &[String], index: usize, flag: &str) -> Result<String, CliError> {
    args.get(index + 1)
        .cloned()
        .ok_or_else(|| usage(format!("error: missing value for {flag}")))
}

fn expect_args(command: &str, rest: &[String], count: usize) -> Result<(), CliError> {
    if rest.len() == count {
        return Ok(());
    }
    Err(usage(format!(
        "error: {command} accepts {count} argument(s), received {}",
        rest.len()
    )))
}

fn parse_id(raw: &str) -> Result<i64, CliError> {
    raw.parse()
        .map_err(|_| usage(format!("error: invalid todo id '{raw}'")))
}

pub const HELP_TEXT: &str = "\
Manage todos on a remote todo service

Usage:
  todo [flags] <command>

Commands:
  list                  show todos
  add <title>           create a todo
  toggle <id>           flip a todo between pending and completed
  edit <id> <title>     change a todo's title (and content)
  delete <id>           delete a todo
  preview <text>        render markdown as a todo note would show it
  format <kind> [text]  wrap text in bold, italic or link markdown
  health                show backend health and configuration

Flags:
      --api-url string   backend base URL (overrides TODO_API_BASE_URL)
      --config string    TOML config file (overrides TODO_CONFIG)
      --content string   markdown note for add/edit
      --filter string    all, pending or completed
  -h, --help             help for todo
      --html             print list as HTML
      --template         start the note from the project task template
      --view string      card or list
  -y, --yes              delete without asking";
