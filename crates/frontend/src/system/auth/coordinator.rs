//! Turns adapter events into session changes, notifications and redirects.

use std::sync::Arc;

use super::context::AuthStore;
use crate::shared::api::{ApiEvent, ApiEventBus};
use crate::shared::config::AppConfig;
use crate::shared::navigation::Navigator;
use crate::shared::notifications::Notifier;

pub const MSG_SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
pub const MSG_FORBIDDEN: &str = "You do not have permission to perform this action";

#[derive(Clone)]
pub struct SessionCoordinator {
    auth: AuthStore,
    navigator: Arc<dyn Navigator>,
    notifier: Notifier,
    login_path: Arc<str>,
    not_authorized_path: Arc<str>,
}

impl SessionCoordinator {
    pub fn new(auth: AuthStore, navigator: Arc<dyn Navigator>, notifier: Notifier, config: &AppConfig) -> Self {
        Self {
            auth,
            navigator,
            notifier,
            login_path: Arc::from(config.login_path.as_str()),
            not_authorized_path: Arc::from(config.not_authorized_path.as_str()),
        }
    }

    pub fn handle(&self, event: ApiEvent) {
        let current = self.navigator.current_path();
        match event {
            ApiEvent::SessionExpired => {
                self.auth.expire_session();
                if current != *self.login_path {
                    self.notifier.error(MSG_SESSION_EXPIRED);
                    self.navigator.redirect(&self.login_path);
                }
            }
            ApiEvent::Forbidden => {
                if current != *self.not_authorized_path {
                    self.notifier.error(MSG_FORBIDDEN);
                    self.navigator.redirect(&self.not_authorized_path);
                }
            }
        }
    }

    /// Route every event on `bus` through [`handle`](Self::handle) until the
    /// bus is disconnected.
    pub fn connect(self, bus: &ApiEventBus) {
        bus.connect(move |event| self.handle(event));
    }
}
