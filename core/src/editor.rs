//! Helpers behind the note editor: live preview, statistics and formatting
//! insertions.

use std::fmt;
use std::str::FromStr;

use crate::markdown::render_markdown;

/// A project task skeleton users can start a note from.
pub const TASK_TEMPLATE: &str = r#"# Project Task

## Description
Brief description of what needs to be done.

## Steps
1. [ ] First step
2. [ ] Second step
3. [ ] Final step

## Notes
- Important note 1
- Important note 2

## Code Example
```javascript
// Your code here
console.log("Hello, World!");
```

> **Tip:** You can edit this template to fit your needs!
"#;

/// What the preview pane shows for the current editor text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Nothing but whitespace has been typed yet.
    Empty,
    Rendered(String),
}

pub fn preview(content: &str) -> Preview {
    if content.trim().is_empty() {
        Preview::Empty
    } else {
        Preview::Rendered(render_markdown(content))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorStats {
    pub chars: usize,
    pub words: usize,
    pub lines: usize,
}

impl EditorStats {
    pub fn of(text: &str) -> Self {
        Self {
            chars: text.chars().count(),
            words: text.split_whitespace().count(),
            lines: text.matches('\n').count() + 1,
        }
    }
}

impl fmt::Display for EditorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} characters, {} words, {} lines",
            self.chars, self.words, self.lines
        )
    }
}

/// Inline formatting shortcuts (Ctrl-B, Ctrl-I, Ctrl-K).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Bold,
    Italic,
    Link,
}

impl Format {
    fn markers(&self) -> (&'static str, &'static str) {
        match self {
            Format::Bold => ("**", "**"),
            Format::Italic => ("*", "*"),
            Format::Link => ("[", "](url)"),
        }
    }

    pub fn apply(&self, selection: &str) -> String {
        let (start, end) = self.markers();
        wrap_selection(selection, start, end)
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bold" => Ok(Format::Bold),
            "italic" => Ok(Format::Italic),
            "link" => Ok(Format::Link),
            other => Err(format!("unknown format '{other}', expected bold, italic or link")),
        }
    }
}

/// Surround the selection with markers; an empty selection becomes `text`.
pub fn wrap_selection(selection: &str, start: &str, end: &str) -> String {
    let inner = if selection.is_empty() { "text" } else { selection };
    format!("{start}{inner}{end}")
}
