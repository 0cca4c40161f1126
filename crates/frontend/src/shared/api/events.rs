use std::sync::{Arc, RwLock};

/// Auth-class outcomes the adapter reports instead of navigating itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiEvent {
    /// 401. The persisted token has already been cleared.
    SessionExpired,
    /// 403
    Forbidden,
}

type Handler = Arc<dyn Fn(ApiEvent) + Send + Sync>;

/// Late-bound sink for [`ApiEvent`]s.
///
/// The client is built before anything that consumes its events, so the
/// bootstrap connects a handler afterwards. Events emitted with no handler
/// connected are only logged.
#[derive(Clone, Default)]
pub struct ApiEventBus {
    handler: Arc<RwLock<Option<Handler>>>,
}

impl ApiEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previously connected handler.
    pub fn connect(&self, handler: impl Fn(ApiEvent) + Send + Sync + 'static) {
        if let Ok(mut slot) = self.handler.write() {
            *slot = Some(Arc::new(handler));
        }
    }

    pub fn disconnect(&self) {
        if let Ok(mut slot) = self.handler.write() {
            *slot = None;
        }
    }

    pub fn is_connected(&self) -> bool {
        self.handler.read().map(|h| h.is_some()).unwrap_or(false)
    }

    pub fn emit(&self, event: ApiEvent) {
        // clone out so the handler may reconnect without deadlocking
        let handler = self.handler.read().ok().and_then(|h| h.clone());
        match handler {
            Some(handler) => handler(event),
            None => log::debug!("api event {:?} dropped: no handler connected", event),
        }
    }
}
