//! `todo`: a terminal front end for the todo service.
//!
//! # Design
//! Every command starts the `InteractionController`, loads the collection,
//! feeds it the matching `UiEvent` and prints the resulting `Frame` to
//! stdout. Notices collected along the way go to stderr. Output streams and
//! the delete prompt are parameters so the whole flow runs under test.

pub mod args;
pub mod error;
pub mod settings;
pub mod terminal;
pub mod transport;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};
use todo_core::config::{resolve_base_url, BASE_URL_ENV};
use todo_core::editor::{preview, EditorStats, Preview};
use todo_core::{
    AppState, Confirm, Gateway, InteractionController, LoadState, NoticeLevel, NoticeLog,
    Notifier, SilentNotifier, TodoClient, Transport, UiEvent,
};

use crate::args::{parse_args, Command, HELP_TEXT};
pub use crate::error::CliError;
use crate::settings::{Settings, CONFIG_ENV};
use crate::terminal::{render_text, write_notices, Confirmation, PromptConfirm};
use crate::transport::{UreqTransport, DEFAULT_TIMEOUT_SECS};

/// Values read from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub api_base_url: Option<String>,
    pub config_path: Option<PathBuf>,
}

impl Environment {
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var(BASE_URL_ENV).ok(),
            config_path: std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        }
    }
}

/// Entry point used by the binary.
pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdin = io::stdin();
    let prompt = PromptConfirm::new(stdin.lock(), io::stderr());
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    run(
        &args,
        &Environment::from_env(),
        prompt,
        &mut stdout,
        &mut stderr,
    )
}

/// Runs one invocation and returns the process exit code.
pub fn run<C: Confirm>(
    args: &[String],
    env: &Environment,
    prompt: C,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> i32 {
    match execute(args, env, prompt, stdout, stderr) {
        Ok(()) => 0,
        Err(CliError::Failed) => 1,
        Err(err) => {
            let _ = writeln!(stderr, "{err}");
            if matches!(err, CliError::Usage(_)) {
                let _ = writeln!(stderr, "Run 'todo --help' for usage.");
            }
            err.exit_code()
        }
    }
}

fn execute<C: Confirm>(
    args: &[String],
    env: &Environment,
    prompt: C,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<(), CliError> {
    let parsed = parse_args(args)?;
    match &parsed.command {
        Command::Help => {
            writeln!(stdout, "{HELP_TEXT}")?;
            return Ok(());
        }
        Command::Preview(text) => return print_preview(text, stdout),
        Command::Format { format, text } => {
            writeln!(stdout, "{}", format.apply(text))?;
            return Ok(());
        }
        _ => {}
    }

    let settings = Settings::discover(parsed.config.as_deref(), env.config_path.clone())?;
    let base = resolve_base_url(
        parsed.api_url.as_deref(),
        env.api_base_url.as_deref(),
        settings.api_base_url.as_deref(),
    );
    info!("using API base URL {} (from {})", base.url, base.source);

    let timeout = Duration::from_secs(settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
    let transport = UreqTransport::new(timeout);
    let client = TodoClient::new(&base.url);
    let log = NoticeLog::new();

    if parsed.command == Command::Health {
        let gateway = Gateway::new(client, &transport, &log);
        return print_health(&gateway, &log, stdout, stderr);
    }

    // Probe only for the log; a dead backend is reported by the load below.
    let probe = Gateway::new(client.clone(), &transport, SilentNotifier);
    match probe.health() {
        Ok(health) => info!("backend is {}", health.status),
        Err(err) => warn!("health check failed: {err}"),
    }

    let state = AppState::new(
        parsed.view.or(settings.view_mode()?).unwrap_or_default(),
        parsed.filter.or(settings.filter_mode()?).unwrap_or_default(),
    );
    let confirm = if parsed.yes {
        Confirmation::Assume
    } else {
        Confirmation::Ask(prompt)
    };
    let gateway = Gateway::new(client, &transport, &log);
    let mut app = InteractionController::new(gateway, confirm, state);

    let frame = app.handle(UiEvent::Start);
    write_notices(stderr, &log.take())?;
    if matches!(app.state().load_state, LoadState::Failed(_)) {
        write!(stdout, "{}", render_text(&frame))?;
        return Err(CliError::Failed);
    }

    let frame = match parsed.command {
        Command::List { html: true } => {
            writeln!(stdout, "{}", todo_core::html::render_view(&frame.view))?;
            return Ok(());
        }
        Command::List { html: false } => frame,
        Command::Add { title, content } => app.handle(UiEvent::Submit {
            title,
            content: content.unwrap_or_default(),
        }),
        Command::Toggle(id) => {
            require(&app, id)?;
            app.handle(UiEvent::Toggle(id))
        }
        Command::Edit { id, title, content } => {
            require(&app, id)?;
            let session = app.handle(UiEvent::OpenEdit(id)).editing;
            let content = content
                .or_else(|| session.map(|s| s.content))
                .unwrap_or_default();
            app.handle(UiEvent::SaveEdit { title, content })
        }
        Command::Delete(id) => {
            require(&app, id)?;
            app.handle(UiEvent::Delete(id))
        }
        Command::Help | Command::Preview(_) | Command::Format { .. } | Command::Health => frame,
    };

    let notices = log.take();
    write_notices(stderr, &notices)?;
    write!(stdout, "{}", render_text(&frame))?;

    let failed = notices
        .iter()
        .any(|n| matches!(n.level, NoticeLevel::Error | NoticeLevel::Warning));
    if failed {
        return Err(CliError::Failed);
    }
    Ok(())
}

fn require<T: Transport, N: Notifier, C: Confirm>(
    app: &InteractionController<T, N, C>,
    id: i64,
) -> Result<(), CliError> {
    match app.state().store.get(id) {
        Some(_) => Ok(()),
        None => Err(CliError::NotFound(id)),
    }
}

fn print_preview(text: &str, stdout: &mut dyn Write) -> Result<(), CliError> {
    match preview(text) {
        Preview::Empty => writeln!(stdout, "Nothing to preview")?,
        Preview::Rendered(html) => write!(stdout, "{html}")?,
    }
    writeln!(stdout, "{}", EditorStats::of(text))?;
    Ok(())
}

fn print_health(
    gateway: &Gateway<&UreqTransport, &NoticeLog>,
    log: &NoticeLog,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<(), CliError> {
    let health = gateway.health();
    let config = gateway.backend_config();
    write_notices(stderr, &log.take())?;

    let (health, config) = match (health, config) {
        (Ok(health), Ok(config)) => (health, config),
        _ => return Err(CliError::Failed),
    };
    writeln!(stdout, "status: {}", health.status)?;
    if !health.message.is_empty() {
        writeln!(stdout, "message: {}", health.message)?;
    }
    writeln!(stdout, "api base url: {}", config.api_base_url)?;
    writeln!(stdout, "environment: {}", config.environment)?;
    writeln!(stdout, "version: {}", config.version)?;
    Ok(())
}
