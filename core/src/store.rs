//! The in-memory mirror of the backend's todo collection.
//!
//! # Design
//! `TodoStore` never mutates optimistically: each operation goes to the
//! server first and only the server's response is written into the local
//! collection. A failed call leaves the collection exactly as it was.
//!
//! Mutations are bracketed by a `Ticket` (`begin_mutation` .. `settle_*`).
//! Tickets carry a store-wide increasing sequence number; a response is only
//! applied if no newer response for the same record has been applied and
//! no reload happened since the ticket was issued. The blocking helpers
//! (`toggle`, `update`, `delete`) use the same path, so a host that runs
//! requests concurrently can call the two halves itself and still get the
//! latest request's result rather than the latest response's.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::ApiError;
use crate::gateway::{Gateway, Notifier, Transport};
use crate::types::{CreateTodo, TodoRecord, TodoStats, UpdateTodo};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this todo?";
pub const EMPTY_TITLE: &str = "Please enter a todo title";

/// Yes/no prompt shown before destructive operations.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Answers yes without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Identifies one in-flight mutation of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub id: i64,
    seq: u64,
}

/// What happened to a server response handed to `settle_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    /// A newer response for the record was already applied, or the
    /// collection was reloaded after the ticket was issued.
    Stale,
    /// The record is not in the local collection.
    Unknown,
    /// The response describes a different record than the ticket.
    Mismatched,
}

#[derive(Debug, Default)]
pub struct TodoStore {
    records: Vec<TodoRecord>,
    next_seq: u64,
    barrier: u64,
    applied: HashMap<i64, u64>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TodoRecord] {
        &self.records
    }

    pub fn get(&self, id: i64) -> Option<&TodoRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> TodoStats {
        TodoStats::of(&self.records)
    }

    /// Replace the collection with the server's list, in server order.
    /// Later duplicates of an id are dropped.
    pub fn load<T: Transport, N: Notifier>(
        &mut self,
        gateway: &Gateway<T, N>,
    ) -> Result<usize, ApiError> {
        let todos = gateway.list()?;
        self.replace_all(todos);
        Ok(self.records.len())
    }

    pub fn replace_all(&mut self, todos: Vec<TodoRecord>) {
        let mut records: Vec<TodoRecord> = Vec::with_capacity(todos.len());
        for todo in todos {
            if records.iter().any(|r| r.id == todo.id) {
                debug!("dropping duplicate todo {} from server list", todo.id);
                continue;
            }
            records.push(todo);
        }
        self.records = records;
        self.applied.clear();
        self.barrier = self.next_seq;
    }

    pub fn create<T: Transport, N: Notifier>(
        &mut self,
        gateway: &Gateway<T, N>,
        title: &str,
        content: Option<&str>,
    ) -> Result<TodoRecord, ApiError> {
        let input = CreateTodo {
            title: validate_title(title)?,
            content: normalize_content(content),
        };
        let created = gateway.create(&input)?;
        self.insert_created(created.clone());
        Ok(created)
    }

    /// Put a newly created record at the head. A record whose id is
    /// already present replaces that copy in place instead.
    pub fn insert_created(&mut self, record: TodoRecord) {
        match self.position(record.id) {
            Some(index) => self.records[index] = record,
            None => self.records.insert(0, record),
        }
    }

    /// Flip `completed` on the server. Returns `Ok(None)` without sending
    /// anything if the id is not in the collection.
    pub fn toggle<T: Transport, N: Notifier>(
        &mut self,
        gateway: &Gateway<T, N>,
        id: i64,
    ) -> Result<Option<TodoRecord>, ApiError> {
        let Some(current) = self.get(id) else {
            return Ok(None);
        };
        let input = UpdateTodo::completed(!current.completed);
        let ticket = self.begin_mutation(id);
        let updated = gateway.update(id, &input)?;
        self.settle_checked(ticket, updated).map(Some)
    }

    pub fn update<T: Transport, N: Notifier>(
        &mut self,
        gateway: &Gateway<T, N>,
        id: i64,
        title: &str,
        content: Option<&str>,
    ) -> Result<TodoRecord, ApiError> {
        let input = UpdateTodo::edit(validate_title(title)?, normalize_content(content));
        let ticket = self.begin_mutation(id);
        let updated = gateway.update(id, &input)?;
        self.settle_checked(ticket, updated)
    }

    /// Delete after confirmation. `Ok(false)` means the user declined and no
    /// request was sent.
    pub fn delete<T: Transport, N: Notifier>(
        &mut self,
        gateway: &Gateway<T, N>,
        confirm: &impl Confirm,
        id: i64,
    ) -> Result<bool, ApiError> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(false);
        }
        let ticket = self.begin_mutation(id);
        gateway.delete(id)?;
        self.settle_delete(ticket);
        Ok(true)
    }

    pub fn begin_mutation(&mut self, id: i64) -> Ticket {
        self.next_seq += 1;
        Ticket {
            id,
            seq: self.next_seq,
        }
    }

    /// Apply a server response for `ticket`, replacing the record in place.
    pub fn settle_update(&mut self, ticket: Ticket, record: TodoRecord) -> Settled {
        if self.is_stale(ticket) {
            debug!("discarding stale response for todo {}", ticket.id);
            return Settled::Stale;
        }
        if record.id != ticket.id {
            warn!("response for todo {} carried id {}", ticket.id, record.id);
            return Settled::Mismatched;
        }
        let Some(index) = self.position(ticket.id) else {
            return Settled::Unknown;
        };
        self.records[index] = record;
        self.applied.insert(ticket.id, ticket.seq);
        Settled::Applied
    }

    fn settle_checked(
        &mut self,
        ticket: Ticket,
        record: TodoRecord,
    ) -> Result<TodoRecord, ApiError> {
        match self.settle_update(ticket, record.clone()) {
            Settled::Mismatched => Err(ApiError::Deserialization(format!(
                "response for todo {} carried id {}",
                ticket.id, record.id
            ))),
            _ => Ok(record),
        }
    }

    /// A confirmed deletion always wins: the server no longer has the
    /// record, whatever other responses are still in flight.
    pub fn settle_delete(&mut self, ticket: Ticket) -> Settled {
        self.applied.remove(&ticket.id);
        match self.position(ticket.id) {
            Some(index) => {
                self.records.remove(index);
                Settled::Applied
            }
            None => Settled::Unknown,
        }
    }

    fn is_stale(&self, ticket: Ticket) -> bool {
        ticket.seq <= self.barrier
            || self
                .applied
                .get(&ticket.id)
                .is_some_and(|&last| last > ticket.seq)
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

fn validate_title(title: &str) -> Result<String, ApiError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation(EMPTY_TITLE.to_string()));
    }
    Ok(title.to_string())
}

fn normalize_content(content: Option<&str>) -> Option<String> {
    content
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
