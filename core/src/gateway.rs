//! Executes client requests through a host-supplied transport.
//!
//! # Design
//! `Gateway` glues the pure `TodoClient` to a `Transport` and a `Notifier`.
//! Every call goes build -> execute -> parse; any failure along the way is
//! logged, reported to the notifier as an error notice and returned to the
//! caller as an `ApiError`. Nothing here panics.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{BackendConfig, CreateTodo, HealthStatus, TodoRecord, UpdateTodo};

/// The request could not be delivered or no response was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TransportError {}

/// Performs one HTTP round-trip. Non-2xx responses are returned as data,
/// not as errors; interpreting the status is the client's job.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

/// A short message for the notification surface (toast, status line, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Observer for user-facing notices.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

impl<N: Notifier + ?Sized> Notifier for Rc<N> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Discards every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// Buffers notices so a host can drain and display them later.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: RefCell<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notice> {
        self.notices.take()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

/// `TodoClient` plus the means to execute its requests.
pub struct Gateway<T, N> {
    client: TodoClient,
    transport: T,
    notifier: N,
}

impl<T: Transport, N: Notifier> Gateway<T, N> {
    pub fn new(client: TodoClient, transport: T, notifier: N) -> Self {
        Self {
            client,
            transport,
            notifier,
        }
    }

    pub fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    pub fn list(&self) -> Result<Vec<TodoRecord>, ApiError> {
        let request = self.client.build_list_todos();
        self.call(Ok(request), TodoClient::parse_list_todos)
    }

    pub fn get(&self, id: i64) -> Result<TodoRecord, ApiError> {
        let request = self.client.build_get_todo(id);
        self.call(Ok(request), TodoClient::parse_get_todo)
    }

    pub fn create(&self, input: &CreateTodo) -> Result<TodoRecord, ApiError> {
        let request = self.client.build_create_todo(input);
        self.call(request, TodoClient::parse_create_todo)
    }

    pub fn update(&self, id: i64, input: &UpdateTodo) -> Result<TodoRecord, ApiError> {
        let request = self.client.build_update_todo(id, input);
        self.call(request, TodoClient::parse_update_todo)
    }

    pub fn delete(&self, id: i64) -> Result<(), ApiError> {
        let request = self.client.build_delete_todo(id);
        self.call(Ok(request), TodoClient::parse_delete_todo)
    }

    pub fn health(&self) -> Result<HealthStatus, ApiError> {
        let request = self.client.build_health();
        self.call(Ok(request), TodoClient::parse_health)
    }

    pub fn backend_config(&self) -> Result<BackendConfig, ApiError> {
        let request = self.client.build_backend_config();
        self.call(Ok(request), TodoClient::parse_backend_config)
    }

    fn call<R>(
        &self,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&TodoClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let result = request.and_then(|request| {
            debug!("{} {}", request.method, request.path);
            let response = self
                .transport
                .execute(request)
                .map_err(|e| ApiError::Network(e.to_string()))?;
            debug!(
                "-> {} ({})",
                response.status,
                response.header("content-type").unwrap_or("no content type")
            );
            parse(&self.client, response)
        });
        if let Err(err) = &result {
            warn!("API call failed: {err}");
            self.notifier
                .notify(Notice::error(format!("API Error: {}", err.message())));
        }
        result
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! A scripted in-memory transport shared by the unit tests.

    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    #[derive(Debug, Default)]
    pub struct ScriptedTransport {
        replies: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
        pub sent: RefCell<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(&self, status: u16, body: impl Into<String>) -> &Self {
            self.replies
                .borrow_mut()
                .push_back(Ok(HttpResponse::new(status, body)));
            self
        }

        pub fn fail(&self, message: &str) -> &Self {
            self.replies
                .borrow_mut()
                .push_back(Err(TransportError(message.to_string())));
            self
        }

        pub fn sent_count(&self) -> usize {
            self.sent.borrow().len()
        }

        pub fn last_body(&self) -> Option<serde_json::Value> {
            let sent = self.sent.borrow();
            let body = sent.last()?.body.as_deref()?;
            serde_json::from_str(body).ok()
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.sent.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("no scripted reply".to_string())))
        }
    }

    pub fn record_json(id: i64, title: &str, completed: bool) -> String {
        serde_json::json!({
            "id": id,
            "title": title,
            "content": null,
            "completed": completed,
            "created_at": "2024-01-05T15:04:00",
            "updated_at": null,
        })
        .to_string()
    }
}
