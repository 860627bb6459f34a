//! Pure view-model producer.
//!
//! # Design
//! `render` turns the collection plus the current view, filter and load
//! state into a `View` without touching any output device. Text that came
//! from a user is already escaped in the view model (`title_html`), and
//! note content is already rendered through the sanitizing markdown
//! pipeline (`content_html`), so a backend can splice both fields into
//! markup directly. The HTML backend lives in `html`; the CLI has a text
//! backend.

use chrono::{DateTime, Utc};

use crate::markdown::render_markdown;
use crate::types::{FilterMode, TodoRecord, TodoStats, ViewMode};

pub const LOAD_FAILED: &str = "Failed to load todos. Please check your connection.";

/// Where the initial (or latest) load of the collection stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Completed,
    Pending,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Completed => "Completed",
            Status::Pending => "Pending",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Status::Completed => "completed",
            Status::Pending => "pending",
        }
    }
}

/// Something the user can trigger from the rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Toggle(i64),
    Edit(i64),
    Delete(i64),
    Reload,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Toggle(_) => "toggle",
            Action::Edit(_) => "edit",
            Action::Delete(_) => "delete",
            Action::Reload => "reload",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub action: Action,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: i64,
    /// Raw title, for plain-text backends only.
    pub title: String,
    pub title_html: String,
    /// Raw markdown source, for plain-text backends only.
    pub note: Option<String>,
    pub content_html: Option<String>,
    pub created_label: String,
    pub status: Status,
    pub actions: Vec<ActionButton>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    /// Loaded fine, nothing matches the filter.
    NoTodos,
    /// The load failed; offer to try again.
    LoadFailed { message: String, retry: Action },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Loading,
    Items(Vec<ItemView>),
    Empty(EmptyState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub layout: ViewMode,
    pub body: Body,
}

impl View {
    pub fn items(&self) -> &[ItemView] {
        match &self.body {
            Body::Items(items) => items,
            _ => &[],
        }
    }
}

pub fn render(
    records: &[TodoRecord],
    layout: ViewMode,
    filter: FilterMode,
    load: &LoadState,
) -> View {
    let body = match load {
        LoadState::Loading => Body::Loading,
        LoadState::Failed(message) => Body::Empty(EmptyState::LoadFailed {
            message: message.clone(),
            retry: Action::Reload,
        }),
        LoadState::Ready => {
            let items: Vec<ItemView> = records
                .iter()
                .filter(|r| filter.matches(r))
                .map(render_item)
                .collect();
            if items.is_empty() {
                Body::Empty(EmptyState::NoTodos)
            } else {
                Body::Items(items)
            }
        }
    };
    View { layout, body }
}

pub fn render_item(record: &TodoRecord) -> ItemView {
    let status = if record.completed {
        Status::Completed
    } else {
        Status::Pending
    };
    let toggle_label = match status {
        Status::Completed => "Undo",
        Status::Pending => "Complete",
    };
    ItemView {
        id: record.id,
        title: record.title.clone(),
        title_html: escape_html(&record.title),
        note: record.note().map(str::to_string),
        content_html: record.note().map(render_markdown),
        created_label: format_timestamp(&record.created_at),
        status,
        actions: vec![
            ActionButton {
                action: Action::Toggle(record.id),
                label: toggle_label,
            },
            ActionButton {
                action: Action::Edit(record.id),
                label: "Edit",
            },
            ActionButton {
                action: Action::Delete(record.id),
                label: "Delete",
            },
        ],
    }
}

/// `Jan 5, 2024, 03:04 PM`
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %I:%M %p").to_string()
}

pub fn page_title(stats: &TodoStats) -> String {
    if stats.total == 0 {
        return "Advanced Todo (0)".to_string();
    }
    format!("Advanced Todo ({}) - {} pending", stats.total, stats.pending)
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: i64, title: &str, completed: bool) -> TodoRecord {
        TodoRecord {
            id,
            title: title.to_string(),
            content: None,
            completed,
            created_at: Utc.with_ymd_and_hms(2024, 1, 5, 15, 4, 0).unwrap(),
            updated_at: None,
        }
    }

    fn mixed() -> Vec<TodoRecord> {
        vec![
            record(1, "a", true),
            record(2, "b", false),
            record(3, "c", true),
            record(4, "d", false),
            record(5, "e", true),
        ]
    }

    fn ids(view: &View) -> Vec<i64> {
        view.items().iter().map(|i| i.id).collect()
    }

    #[test]
    fn filters_select_matching_subsequence() {
        let records = mixed();
        let ready = LoadState::Ready;
        assert_eq!(
            ids(&render(&records, ViewMode::Card, FilterMode::Pending, &ready)),
            vec![2, 4]
        );
        assert_eq!(
            ids(&render(&records, ViewMode::Card, FilterMode::Completed, &ready)),
            vec![1, 3, 5]
        );
        assert_eq!(
            ids(&render(&records, ViewMode::Card, FilterMode::All, &ready)),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn layout_does_not_change_items() {
        let records = mixed();
        let card = render(&records, ViewMode::Card, FilterMode::All, &LoadState::Ready);
        let list = render(&records, ViewMode::List, FilterMode::All, &LoadState::Ready);
        assert_eq!(card.body, list.body);
        assert_eq!(list.layout, ViewMode::List);
    }

    #[test]
    fn title_is_escaped_and_content_rendered() {
        let mut todo = record(1, "<script>alert('x')</script>", false);
        todo.content = Some("**bold**".to_string());
        let item = render_item(&todo);
        assert_eq!(
            item.title_html,
            "&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"
        );
        assert_eq!(
            item.content_html.as_deref(),
            Some("<p><strong>bold</strong></p>\n")
        );
    }

    #[test]
    fn absent_or_blank_content_has_no_body() {
        let mut todo = record(1, "a", false);
        assert!(render_item(&todo).content_html.is_none());
        todo.content = Some("   ".to_string());
        assert!(render_item(&todo).content_html.is_none());
    }

    #[test]
    fn item_shows_status_date_and_actions() {
        let item = render_item(&record(7, "a", true));
        assert_eq!(item.created_label, "Jan 5, 2024, 03:04 PM");
        assert_eq!(item.status, Status::Completed);
        assert_eq!(item.actions[0].label, "Undo");
        assert_eq!(item.actions[0].action, Action::Toggle(7));
        assert_eq!(render_item(&record(8, "b", false)).actions[0].label, "Complete");
    }

    #[test]
    fn empty_filter_result_is_no_todos() {
        let records = vec![record(1, "a", false)];
        let view = render(&records, ViewMode::Card, FilterMode::Completed, &LoadState::Ready);
        assert_eq!(view.body, Body::Empty(EmptyState::NoTodos));
    }

    #[test]
    fn failed_load_offers_retry() {
        let view = render(
            &[],
            ViewMode::Card,
            FilterMode::All,
            &LoadState::Failed(LOAD_FAILED.to_string()),
        );
        assert_eq!(
            view.body,
            Body::Empty(EmptyState::LoadFailed {
                message: LOAD_FAILED.to_string(),
                retry: Action::Reload
            })
        );
    }

    #[test]
    fn loading_hides_items() {
        let view = render(&mixed(), ViewMode::Card, FilterMode::All, &LoadState::Loading);
        assert_eq!(view.body, Body::Loading);
    }

    #[test]
    fn page_title_counts_pending() {
        assert_eq!(page_title(&TodoStats::default()), "Advanced Todo (0)");
        assert_eq!(
            page_title(&TodoStats::of(&mixed())),
            "Advanced Todo (5) - 2 pending"
        );
    }
}
