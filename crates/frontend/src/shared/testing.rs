//! In-memory doubles for the platform seams, shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

pub use futures::executor::block_on;

use crate::shared::api::{ApiClient, HttpRequest, HttpResponse, Transport, TransportError};
use crate::shared::data::QueryClient;
use crate::shared::navigation::Navigator;
use crate::shared::notifications::Notifier;
use crate::shared::storage::MemoryStorage;
use crate::shared::theme::{ColorSchemeSubscription, Theme, ThemeSurface};

pub const TEST_BASE_URL: &str = "http://test.local/api";

type SendHook = Box<dyn Fn(&HttpRequest) + Send + Sync>;

/// Replays scripted responses in order and records every request.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    on_send: Mutex<Option<SendHook>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.respond_raw(status, &body.to_string());
    }

    pub fn respond_raw(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    /// Script a request that never gets a response.
    pub fn fail(&self, reason: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError(reason.to_string())));
    }

    /// Run `hook` while each request is in flight.
    pub fn on_send(&self, hook: impl Fn(&HttpRequest) + Send + Sync + 'static) {
        *self.on_send.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(hook) = self.on_send.lock().unwrap().as_ref() {
            hook(&request);
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_string())))
    }
}

/// Adapter wired to in-memory doubles.
pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub storage: Arc<MemoryStorage>,
    pub notifier: Notifier,
    pub client: ApiClient,
    pub queries: QueryClient,
}

impl Harness {
    pub fn new() -> Self {
        let transport = Arc::new(MockTransport::new());
        let storage = Arc::new(MemoryStorage::new());
        let notifier = Notifier::new();
        let client = ApiClient::new(TEST_BASE_URL, transport.clone(), storage.clone(), notifier);
        Self {
            transport,
            storage,
            notifier,
            client,
            queries: QueryClient::default(),
        }
    }
}

type SchemeListener = Arc<dyn Fn(bool) + Send + Sync>;

/// Records applied themes and lets tests flip the OS preference.
pub struct RecordingSurface {
    prefers_dark: AtomicBool,
    applied: Mutex<Vec<Theme>>,
    listeners: Arc<Mutex<Vec<(usize, SchemeListener)>>>,
    next_id: AtomicUsize,
}

impl RecordingSurface {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            prefers_dark: AtomicBool::new(prefers_dark),
            applied: Mutex::new(Vec::new()),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicUsize::new(0),
        }
    }

    pub fn applied(&self) -> Vec<Theme> {
        self.applied.lock().unwrap().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    pub fn emit_change(&self, prefers_dark: bool) {
        self.prefers_dark.store(prefers_dark, Ordering::SeqCst);
        let listeners: Vec<SchemeListener> = self
            .listeners
            .lock()
            .unwrap()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(prefers_dark);
        }
    }
}

impl ThemeSurface for RecordingSurface {
    fn apply(&self, theme: Theme) {
        self.applied.lock().unwrap().push(theme);
    }

    fn prefers_dark(&self) -> bool {
        self.prefers_dark.load(Ordering::SeqCst)
    }

    fn watch_color_scheme(&self, on_change: Box<dyn Fn(bool) + Send + Sync>) -> ColorSchemeSubscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().unwrap().push((id, Arc::from(on_change)));
        let listeners = self.listeners.clone();
        ColorSchemeSubscription::new(move || {
            listeners.lock().unwrap().retain(|(i, _)| *i != id);
        })
    }
}

/// Tracks the current path and every redirect.
pub struct RecordingNavigator {
    path: Mutex<String>,
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            path: Mutex::new(path.to_string()),
            redirects: Mutex::new(Vec::new()),
        }
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.lock().unwrap().clone()
    }

    fn redirect(&self, path: &str) {
        *self.path.lock().unwrap() = path.to_string();
        self.redirects.lock().unwrap().push(path.to_string());
    }
}
