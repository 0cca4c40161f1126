//! Current view and redirects.
//!
//! The HTTP adapter never navigates; the bootstrap coordinator does, through
//! a [`Navigator`].

use leptos::prelude::*;
use web_sys::window;

pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn redirect(&self, path: &str);
}

/// Browser navigation over `history.pushState`, mirrored into a path signal
/// the route switch reads.
#[derive(Clone, Copy)]
pub struct Navigation {
    path: RwSignal<String>,
}

fn location_path() -> String {
    window()
        .and_then(|w| w.location().pathname().ok())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "/".to_string())
}

impl Navigation {
    pub fn new() -> Self {
        Self {
            path: RwSignal::new(location_path()),
        }
    }

    /// Pick up back/forward navigation (`popstate`).
    pub fn sync_from_location(&self) {
        self.path.set(location_path());
    }

    pub fn path(&self) -> Signal<String> {
        self.path.into()
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for Navigation {
    fn current_path(&self) -> String {
        self.path.get_untracked()
    }

    fn redirect(&self, path: &str) {
        if self.path.get_untracked() == path {
            return;
        }
        log::debug!("navigate: {}", path);
        if let Some(w) = window() {
            if let Ok(history) = w.history() {
                let _ = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path));
            }
        }
        self.path.set(path.to_string());
    }
}

pub fn use_navigation() -> Navigation {
    use_context::<Navigation>().expect("Navigation not found. Wrap your app with AppProviders.")
}
