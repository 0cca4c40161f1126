use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, MediaQueryList, MediaQueryListEvent};

use super::Theme;

const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// The document the theme is rendered on.
pub trait ThemeSurface: Send + Sync {
    /// Put `theme` on the presentation root.
    fn apply(&self, theme: Theme);

    /// Whether the OS currently prefers a dark color scheme.
    fn prefers_dark(&self) -> bool;

    /// Call `on_change(prefers_dark)` whenever the OS preference changes,
    /// until the returned subscription is disposed.
    fn watch_color_scheme(&self, on_change: Box<dyn Fn(bool) + Send + Sync>) -> ColorSchemeSubscription;
}

/// Handle to a registered color-scheme listener. Disposing (or dropping)
/// it detaches the listener.
pub struct ColorSchemeSubscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl ColorSchemeSubscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Nothing was registered.
    pub fn noop() -> Self {
        Self { teardown: None }
    }

    pub fn dispose(mut self) {
        self.run_teardown();
    }

    fn run_teardown(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for ColorSchemeSubscription {
    fn drop(&mut self) {
        self.run_teardown();
    }
}

/// `<html class="light|dark">` plus `data-theme` on `<body>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentSurface;

fn dark_scheme_query() -> Option<MediaQueryList> {
    window()?.match_media(DARK_SCHEME_QUERY).ok()?
}

impl ThemeSurface for DocumentSurface {
    fn apply(&self, theme: Theme) {
        let Some(document) = window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(root) = document.document_element() {
            let classes = root.class_list();
            let _ = classes.remove_2(Theme::Light.as_str(), Theme::Dark.as_str());
            let _ = classes.add_1(theme.as_str());
        }

        // styling hook kept for stylesheets keyed on the body
        if let Some(body) = document.body() {
            let _ = body.set_attribute("data-theme", theme.as_str());
        }
    }

    fn prefers_dark(&self) -> bool {
        dark_scheme_query().map(|q| q.matches()).unwrap_or(false)
    }

    fn watch_color_scheme(&self, on_change: Box<dyn Fn(bool) + Send + Sync>) -> ColorSchemeSubscription {
        let Some(query) = dark_scheme_query() else {
            return ColorSchemeSubscription::noop();
        };

        let closure = Closure::wrap(Box::new(move |event: MediaQueryListEvent| {
            on_change(event.matches());
        }) as Box<dyn FnMut(_)>);

        if query
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("could not subscribe to color scheme changes");
            return ColorSchemeSubscription::noop();
        }

        ColorSchemeSubscription::new(move || {
            let _ = query.remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            drop(closure);
        })
    }
}
