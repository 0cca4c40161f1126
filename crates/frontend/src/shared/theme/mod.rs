//! Theme slice of the app store.
//!
//! Light and dark themes. An explicit choice is persisted under `theme`;
//! until one exists the app follows the OS color-scheme preference.

pub mod surface;
pub mod theme_toggle;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use leptos::prelude::*;

use crate::shared::storage::{KeyValueStore, THEME_KEY};
pub use surface::{ColorSchemeSubscription, DocumentSurface, ThemeSurface};
pub use theme_toggle::ThemeToggle;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Name used for the root CSS class and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Only the two stored spellings are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

#[derive(Clone)]
pub struct ThemeStore {
    theme: RwSignal<Theme>,
    storage: Arc<dyn KeyValueStore>,
    surface: Arc<dyn ThemeSurface>,
    initialized: Arc<AtomicBool>,
}

impl ThemeStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, surface: Arc<dyn ThemeSurface>) -> Self {
        Self {
            theme: RwSignal::new(Theme::default()),
            storage,
            surface,
            initialized: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn theme(&self) -> Signal<Theme> {
        self.theme.into()
    }

    pub fn current(&self) -> Theme {
        self.theme.get_untracked()
    }

    /// Explicit user choice: apply and persist.
    pub fn set_theme(&self, theme: Theme) {
        log::info!("theme set to {}", theme.as_str());
        self.apply(theme);
        self.storage.set(THEME_KEY, theme.as_str());
    }

    pub fn toggle_theme(&self) {
        self.set_theme(self.current().opposite());
    }

    /// Apply the persisted theme, or the system preference when none is
    /// stored, and start following system changes.
    ///
    /// Runs once per store. Later calls return `None` and register nothing.
    /// The caller owns the returned subscription.
    pub fn init_theme(&self) -> Option<ColorSchemeSubscription> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            log::debug!("init_theme called twice, ignoring");
            return None;
        }

        match self.stored_theme() {
            Some(theme) => self.apply(theme),
            None => self.apply(Theme::from_system(self.surface.prefers_dark())),
        }

        let store = self.clone();
        Some(
            self.surface
                .watch_color_scheme(Box::new(move |prefers_dark| store.follow_system(prefers_dark))),
        )
    }

    fn follow_system(&self, prefers_dark: bool) {
        if self.stored_theme().is_none() {
            self.apply(Theme::from_system(prefers_dark));
        }
    }

    fn stored_theme(&self) -> Option<Theme> {
        self.storage.get(THEME_KEY).as_deref().and_then(Theme::parse)
    }

    /// Not persisted.
    fn apply(&self, theme: Theme) {
        self.theme.set(theme);
        self.surface.apply(theme);
    }
}

pub fn use_theme() -> ThemeStore {
    use_context::<ThemeStore>().expect("ThemeStore not found. Wrap your app with AppProviders.")
}
