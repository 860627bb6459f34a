//! Full lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the store and the
//! controller over real HTTP through a ureq-backed `Transport`. Validates
//! that request building, response parsing and local reconciliation work
//! end-to-end with the actual server schema.

use std::cell::Cell;
use std::rc::Rc;

use todo_core::{
    AlwaysConfirm, ApiError, AppState, Body, EmptyState, FilterMode, Gateway, HttpMethod,
    HttpRequest, HttpResponse, InteractionController, NoticeLevel, NoticeLog, SilentNotifier,
    TodoClient, TodoStore, Transport, TransportError, UiEvent,
};

/// Executes requests with ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
struct UreqTransport {
    agent: ureq::Agent,
    calls: Cell<usize>,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            calls: Cell::new(0),
        }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.set(self.calls.get() + 1);
        let result = match (req.method, req.body) {
            (HttpMethod::Get, _) => self.agent.get(&req.path).call(),
            (HttpMethod::Delete, _) => self.agent.delete(&req.path).call(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(&req.path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => self.agent.post(&req.path).send_empty(),
            (HttpMethod::Put, Some(body)) => self
                .agent
                .put(&req.path)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Put, None) => self.agent.put(&req.path).send_empty(),
        };
        let mut response = result.map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();
        Ok(HttpResponse::new(status, body))
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn store_lifecycle() {
    let base = start_server();
    let transport = UreqTransport::new();
    let gateway = Gateway::new(TodoClient::new(&base), &transport, SilentNotifier);
    let mut store = TodoStore::new();

    // Step 1: health and an empty list.
    assert_eq!(gateway.health().unwrap().status, "healthy");
    assert_eq!(store.load(&gateway).unwrap(), 0);

    // Step 2: blank title never reaches the server.
    let before = transport.calls.get();
    let err = store.create(&gateway, "   ", None).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(transport.calls.get(), before);

    // Step 3: create two; the newest is first.
    let milk = store.create(&gateway, "Buy milk", None).unwrap();
    assert!(milk.content.is_none());
    assert!(!milk.completed);
    let notes = store
        .create(&gateway, "Write notes", Some("**bold** idea"))
        .unwrap();
    let order: Vec<i64> = store.records().iter().map(|r| r.id).collect();
    assert_eq!(order, vec![notes.id, milk.id]);

    // Step 4: toggle keeps position.
    let toggled = store.toggle(&gateway, milk.id).unwrap().unwrap();
    assert!(toggled.completed);
    assert_eq!(store.records()[1].id, milk.id);
    assert!(store.records()[1].completed);

    // Step 5: edit title and content.
    let edited = store
        .update(&gateway, notes.id, "Write more notes", Some("_draft_"))
        .unwrap();
    assert_eq!(edited.title, "Write more notes");
    assert_eq!(store.get(notes.id).unwrap().content.as_deref(), Some("_draft_"));

    // Step 6: delete one.
    assert!(store.delete(&gateway, &AlwaysConfirm, milk.id).unwrap());
    assert!(store.get(milk.id).is_none());
    assert_eq!(store.len(), 1);

    // Step 7: the server agrees; reload shows server order.
    assert_eq!(store.load(&gateway).unwrap(), 1);
    assert_eq!(store.records()[0].id, notes.id);

    // Step 8: deleting again is a not-found error and changes nothing.
    let err = gateway.delete(milk.id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "Todo not found"));
    assert_eq!(store.len(), 1);
}

#[test]
fn controller_over_http() {
    let base = start_server();
    let log = Rc::new(NoticeLog::new());
    let gateway = Gateway::new(TodoClient::new(&base), UreqTransport::new(), log.clone());
    let mut app = InteractionController::new(gateway, AlwaysConfirm, AppState::default());

    let frame = app.handle(UiEvent::Start);
    assert_eq!(frame.view.body, Body::Empty(EmptyState::NoTodos));

    for title in ["one", "two", "three"] {
        app.handle(UiEvent::Submit {
            title: title.to_string(),
            content: String::new(),
        });
    }
    let first = app.state().store.records()[0].id;
    let frame = app.handle(UiEvent::Toggle(first));
    assert_eq!(frame.stats.completed, 1);

    let frame = app.handle(UiEvent::SetFilter(FilterMode::Pending));
    let titles: Vec<&str> = frame
        .view
        .items()
        .iter()
        .map(|i| i.title_html.as_str())
        .collect();
    assert_eq!(titles, vec!["two", "one"]);

    let errors = log
        .take()
        .into_iter()
        .filter(|n| n.level == NoticeLevel::Error)
        .count();
    assert_eq!(errors, 0);
}

#[test]
fn unreachable_server_renders_retry() {
    // Bind and drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let log = Rc::new(NoticeLog::new());
    let gateway = Gateway::new(
        TodoClient::new(&format!("http://{addr}")),
        UreqTransport::new(),
        log.clone(),
    );
    let mut app = InteractionController::new(gateway, AlwaysConfirm, AppState::default());

    let frame = app.handle(UiEvent::Start);
    assert!(matches!(
        frame.view.body,
        Body::Empty(EmptyState::LoadFailed { .. })
    ));
    let notices = log.take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.starts_with("API Error: "));
}
