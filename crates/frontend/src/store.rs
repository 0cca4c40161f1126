//! Process-wide app store: auth and theme slices plus the services they
//! share.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use leptos::prelude::*;

use crate::shared::api::{ApiClient, GlooTransport, Transport};
use crate::shared::config::AppConfig;
use crate::shared::data::QueryClient;
use crate::shared::navigation::Navigator;
use crate::shared::notifications::Notifier;
use crate::shared::storage::{BrowserStorage, KeyValueStore};
use crate::shared::theme::{ColorSchemeSubscription, DocumentSurface, ThemeStore, ThemeSurface};
use crate::system::auth::{AuthStore, SessionCoordinator};

/// Resources acquired by [`AppStore::start`]; released on teardown.
pub struct Startup {
    theme_subscription: Option<ColorSchemeSubscription>,
}

impl Startup {
    pub fn dispose(self) {
        if let Some(subscription) = self.theme_subscription {
            subscription.dispose();
        }
    }
}

#[derive(Clone)]
pub struct AppStore {
    pub auth: AuthStore,
    pub theme: ThemeStore,
    pub client: ApiClient,
    pub notifier: Notifier,
    pub queries: QueryClient,
    started: Arc<AtomicBool>,
}

impl AppStore {
    pub fn new(
        config: &AppConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn KeyValueStore>,
        surface: Arc<dyn ThemeSurface>,
    ) -> Self {
        let notifier = Notifier::new();
        let client = ApiClient::new(&config.api_base_url, transport, storage.clone(), notifier);
        Self {
            auth: AuthStore::new(client.clone(), storage.clone()),
            theme: ThemeStore::new(storage, surface),
            client,
            notifier,
            queries: QueryClient::default(),
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Store wired to `fetch`, `localStorage` and the document.
    pub fn browser(config: &AppConfig) -> Self {
        Self::new(
            config,
            Arc::new(GlooTransport),
            Arc::new(BrowserStorage),
            Arc::new(DocumentSurface),
        )
    }

    /// One-time startup: route adapter events through a
    /// [`SessionCoordinator`], restore the session and initialize the theme.
    ///
    /// Returns `None` on every call after the first.
    pub fn start(&self, navigator: Arc<dyn Navigator>, config: &AppConfig) -> Option<Startup> {
        if self.started.swap(true, Ordering::SeqCst) {
            log::debug!("app store already started");
            return None;
        }
        log::info!("starting app against {}", self.client.base_url());

        SessionCoordinator::new(self.auth.clone(), navigator, self.notifier, config)
            .connect(self.client.events());
        self.auth.restore_auth();
        let theme_subscription = self.theme.init_theme();

        Some(Startup { theme_subscription })
    }

    pub fn shutdown(&self) {
        self.client.events().disconnect();
    }
}

pub fn use_store() -> AppStore {
    use_context::<AppStore>().expect("AppStore not found. Wrap your app with AppProviders.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::storage::{MemoryStorage, THEME_KEY, TOKEN_KEY};
    use crate::shared::testing::{MockTransport, RecordingNavigator, RecordingSurface};
    use crate::shared::theme::Theme;

    struct Fixture {
        store: AppStore,
        storage: Arc<MemoryStorage>,
        surface: Arc<RecordingSurface>,
        navigator: Arc<RecordingNavigator>,
    }

    fn fixture() -> Fixture {
        let storage = Arc::new(MemoryStorage::new());
        let surface = Arc::new(RecordingSurface::new(false));
        let store = AppStore::new(
            &AppConfig::default(),
            Arc::new(MockTransport::new()),
            storage.clone(),
            surface.clone(),
        );
        Fixture {
            store,
            storage,
            surface,
            navigator: Arc::new(RecordingNavigator::at("/dashboard")),
        }
    }

    #[test]
    fn test_start_restores_session_and_theme() {
        let f = fixture();
        f.storage.set(TOKEN_KEY, "persisted");
        f.storage.set(THEME_KEY, "dark");

        let startup = f.store.start(f.navigator.clone(), &AppConfig::default());

        assert!(startup.is_some());
        assert!(f.store.auth.snapshot().is_authenticated);
        assert!(!f.store.auth.snapshot().is_loading);
        assert_eq!(f.store.theme.current(), Theme::Dark);
        assert!(f.store.client.events().is_connected());
    }

    #[test]
    fn test_start_runs_once() {
        let f = fixture();
        let first = f.store.start(f.navigator.clone(), &AppConfig::default());
        let second = f.store.clone().start(f.navigator.clone(), &AppConfig::default());

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(f.surface.listener_count(), 1);
        assert_eq!(f.surface.applied(), vec![Theme::Light]);
    }

    #[test]
    fn test_teardown_releases_listener_and_bus() {
        let f = fixture();
        let startup = f.store.start(f.navigator.clone(), &AppConfig::default()).unwrap();

        startup.dispose();
        f.store.shutdown();

        assert_eq!(f.surface.listener_count(), 0);
        assert!(!f.store.client.events().is_connected());
    }
}
