//! Client core for the todo service: sync, rendering and interaction.
//!
//! # Overview
//! Mirrors a remote todo collection in memory, issues CRUD calls against
//! the REST backend, and renders the collection (with markdown notes) into
//! a view model that any UI backend can display.
//!
//! # Design
//! - Host-does-IO: `TodoClient` builds `HttpRequest` values and parses
//!   `HttpResponse` values; a host `Transport` executes them. The crate
//!   never opens a socket and stays deterministic under test.
//! - `TodoStore` applies only server-confirmed results and discards stale
//!   responses per record.
//! - `render` is a pure function from state to `View`; `html` is one
//!   backend for it.
//! - `InteractionController` owns all application state; there is no
//!   global.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod gateway;
pub mod html;
pub mod http;
pub mod markdown;
pub mod render;
pub mod store;
pub mod types;

pub use client::TodoClient;
pub use controller::{AppState, EditSession, Frame, InteractionController, KeyChord, UiEvent};
pub use error::{ApiError, ErrorKind};
pub use gateway::{Gateway, Notice, NoticeLevel, NoticeLog, Notifier, SilentNotifier, Transport, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use render::{render, Body, EmptyState, ItemView, LoadState, View};
pub use store::{AlwaysConfirm, Confirm, Settled, Ticket, TodoStore};
pub use types::{
    BackendConfig, CreateTodo, FilterMode, HealthStatus, TodoRecord, TodoStats, UpdateTodo, ViewMode,
};
