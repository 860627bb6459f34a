//! Maps user interactions onto store operations and re-renders.
//!
//! # Design
//! All application state lives in one explicit `AppState` owned by the
//! controller; there is no global. `handle` processes one `UiEvent` to
//! completion and returns the `Frame` to display. Errors never escape
//! `handle`: each failure is turned into a notice and the state is left as
//! the store left it (unchanged).

use log::info;

use crate::error::ApiError;
use crate::gateway::{Gateway, Notice, Notifier, Transport};
use crate::render::{page_title, render, Action, LoadState, View, LOAD_FAILED};
use crate::store::{Confirm, TodoStore};
use crate::types::{FilterMode, TodoStats, ViewMode};

/// The todo being edited in the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: i64,
    pub title: String,
    pub content: String,
}

#[derive(Debug)]
pub struct AppState {
    pub store: TodoStore,
    pub view_mode: ViewMode,
    pub filter_mode: FilterMode,
    pub load_state: LoadState,
    pub editing: Option<EditSession>,
}

impl AppState {
    pub fn new(view_mode: ViewMode, filter_mode: FilterMode) -> Self {
        Self {
            store: TodoStore::new(),
            view_mode,
            filter_mode,
            load_state: LoadState::Loading,
            editing: None,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewMode::default(), FilterMode::default())
    }
}

/// A key press with its modifier, e.g. Ctrl+R.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub key: char,
}

impl KeyChord {
    pub fn ctrl(key: char) -> Self {
        Self { ctrl: true, key }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Start,
    Reload,
    Submit { title: String, content: String },
    SetFilter(FilterMode),
    SetView(ViewMode),
    Toggle(i64),
    OpenEdit(i64),
    SaveEdit { title: String, content: String },
    CancelEdit,
    Delete(i64),
    Shortcut(KeyChord),
}

impl From<Action> for UiEvent {
    fn from(action: Action) -> Self {
        match action {
            Action::Toggle(id) => UiEvent::Toggle(id),
            Action::Edit(id) => UiEvent::OpenEdit(id),
            Action::Delete(id) => UiEvent::Delete(id),
            Action::Reload => UiEvent::Reload,
        }
    }
}

/// Everything a rendering backend needs after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub view: View,
    pub stats: TodoStats,
    pub page_title: String,
    pub editing: Option<EditSession>,
}

pub struct InteractionController<T, N, C> {
    gateway: Gateway<T, N>,
    confirm: C,
    state: AppState,
}

impl<T: Transport, N: Notifier, C: Confirm> InteractionController<T, N, C> {
    pub fn new(gateway: Gateway<T, N>, confirm: C, state: AppState) -> Self {
        Self {
            gateway,
            confirm,
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn handle(&mut self, event: UiEvent) -> Frame {
        match event {
            UiEvent::Start | UiEvent::Reload => self.load(),
            UiEvent::Submit { title, content } => self.submit(&title, &content),
            UiEvent::SetFilter(filter) => self.state.filter_mode = filter,
            UiEvent::SetView(view) => self.state.view_mode = view,
            UiEvent::Toggle(id) => self.toggle(id),
            UiEvent::OpenEdit(id) => self.open_edit(id),
            UiEvent::SaveEdit { title, content } => self.save_edit(&title, &content),
            UiEvent::CancelEdit => self.state.editing = None,
            UiEvent::Delete(id) => self.delete(id),
            UiEvent::Shortcut(chord) => {
                if chord.ctrl && chord.key.eq_ignore_ascii_case(&'r') {
                    self.load();
                }
            }
        }
        self.frame()
    }

    pub fn frame(&self) -> Frame {
        let stats = self.state.store.stats();
        Frame {
            view: render(
                self.state.store.records(),
                self.state.view_mode,
                self.state.filter_mode,
                &self.state.load_state,
            ),
            stats,
            page_title: page_title(&stats),
            editing: self.state.editing.clone(),
        }
    }

    fn load(&mut self) {
        self.state.load_state = match self.state.store.load(&self.gateway) {
            Ok(count) => {
                info!("loaded {count} todos");
                LoadState::Ready
            }
            Err(_) => LoadState::Failed(LOAD_FAILED.to_string()),
        };
    }

    fn submit(&mut self, title: &str, content: &str) {
        if !title.trim().is_empty() {
            self.gateway.notify(Notice::info("Creating todo..."));
        }
        let result = self
            .state
            .store
            .create(&self.gateway, title, Some(content));
        match result {
            Ok(_) => self.notify(Notice::success("Todo created successfully!")),
            Err(err) => self.notify_failure(err, "Failed to create todo"),
        }
    }

    fn toggle(&mut self, id: i64) {
        match self.state.store.toggle(&self.gateway, id) {
            Ok(Some(updated)) => {
                let message = if updated.completed {
                    "Todo completed!"
                } else {
                    "Todo marked as pending!"
                };
                self.notify(Notice::success(message));
            }
            Ok(None) => {}
            Err(err) => self.notify_failure(err, "Failed to update todo"),
        }
    }

    fn open_edit(&mut self, id: i64) {
        if let Some(record) = self.state.store.get(id) {
            self.state.editing = Some(EditSession {
                id,
                title: record.title.clone(),
                content: record.content.clone().unwrap_or_default(),
            });
        }
    }

    fn save_edit(&mut self, title: &str, content: &str) {
        let Some(session) = &self.state.editing else {
            return;
        };
        let id = session.id;
        match self
            .state
            .store
            .update(&self.gateway, id, title, Some(content))
        {
            Ok(_) => {
                self.state.editing = None;
                self.notify(Notice::success("Todo updated successfully!"));
            }
            Err(err) => self.notify_failure(err, "Failed to update todo"),
        }
    }

    fn delete(&mut self, id: i64) {
        match self.state.store.delete(&self.gateway, &self.confirm, id) {
            Ok(true) => self.notify(Notice::success("Todo deleted successfully!")),
            Ok(false) => {}
            Err(err) => self.notify_failure(err, "Failed to delete todo"),
        }
    }

    fn notify(&self, notice: Notice) {
        self.gateway.notify(notice);
    }

    /// Validation problems are the user's to fix; everything else was
    /// already reported by the gateway and gets a generic follow-up.
    fn notify_failure(&self, err: ApiError, fallback: &str) {
        match err {
            ApiError::Validation(message) => self.notify(Notice::warning(message)),
            _ => self.notify(Notice::error(fallback)),
        }
    }
}
