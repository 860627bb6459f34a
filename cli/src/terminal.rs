//! Terminal backend: text rendering, notices on stderr, stdin prompts.

use std::cell::RefCell;
use std::io::{BufRead, Write};

use todo_core::render::Status;
use todo_core::{Body, Confirm, EmptyState, Frame, ItemView, Notice, ViewMode};

/// Asks on `output` and reads a `y`/`yes` answer from `input`. Anything
/// else, including EOF, is a no.
pub struct PromptConfirm<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&self, prompt: &str) -> bool {
        let mut output = self.output.borrow_mut();
        if write!(output, "{prompt} [y/N] ").and_then(|_| output.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        match self.input.borrow_mut().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// `--yes` skips the prompt.
pub enum Confirmation<C> {
    Assume,
    Ask(C),
}

impl<C: Confirm> Confirm for Confirmation<C> {
    fn confirm(&self, prompt: &str) -> bool {
        match self {
            Confirmation::Assume => true,
            Confirmation::Ask(inner) => inner.confirm(prompt),
        }
    }
}

pub fn write_notices(out: &mut dyn Write, notices: &[Notice]) -> std::io::Result<()> {
    for notice in notices {
        writeln!(out, "{}: {}", notice.level.as_str(), notice.message)?;
    }
    Ok(())
}

pub fn render_text(frame: &Frame) -> String {
    let mut out = format!(
        "{}\n{} total, {} completed, {} pending\n\n",
        frame.page_title, frame.stats.total, frame.stats.completed, frame.stats.pending
    );

    match &frame.view.body {
        Body::Loading => out.push_str("Loading your todos...\n"),
        Body::Empty(EmptyState::NoTodos) => {
            out.push_str("No todos found. Add one with `todo add <title>`.\n")
        }
        Body::Empty(EmptyState::LoadFailed { message, retry }) => {
            out.push_str(&format!(
                "{message}\nRun `todo list` to {}.\n",
                retry.name()
            ));
        }
        Body::Items(items) => {
            for item in items {
                match frame.view.layout {
                    ViewMode::List => out.push_str(&list_line(item)),
                    ViewMode::Card => out.push_str(&card(item)),
                }
            }
        }
    }
    out
}

fn checkbox(item: &ItemView) -> &'static str {
    match item.status {
        Status::Completed => "[x]",
        Status::Pending => "[ ]",
    }
}

fn list_line(item: &ItemView) -> String {
    format!(
        "{} #{} {}  ({})\n",
        checkbox(item),
        item.id,
        item.title,
        item.created_label
    )
}

fn card(item: &ItemView) -> String {
    let mut out = format!(
        "{} #{} {}\n    {} | {}\n",
        checkbox(item),
        item.id,
        item.title,
        item.status.label(),
        item.created_label
    );
    if let Some(note) = &item.note {
        for line in note.lines() {
            out.push_str(&format!("    > {line}\n"));
        }
    }
    out.push('\n');
    out
}
