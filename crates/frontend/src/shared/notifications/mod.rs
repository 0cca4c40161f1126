//! Notification side channel.
//!
//! Store thunks, the HTTP adapter and data hooks report outcomes here; the
//! `Toaster` renders them. Every notification is mirrored to the log.

pub mod toaster;

use leptos::prelude::*;
use uuid::Uuid;

pub use toaster::Toaster;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

impl ToastLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            ToastLevel::Success => "toast toast--success",
            ToastLevel::Error => "toast toast--error",
            ToastLevel::Info => "toast toast--info",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: Uuid,
    pub level: ToastLevel,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct Notifier {
    toasts: RwSignal<Vec<Toast>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
        }
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Success, message.into())
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Error, message.into())
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Info, message.into())
    }

    fn push(&self, level: ToastLevel, message: String) -> Uuid {
        match level {
            ToastLevel::Error => log::warn!("notify: {}", message),
            _ => log::info!("notify: {}", message),
        }
        let id = Uuid::new_v4();
        self.toasts.update(|toasts| toasts.push(Toast { id, level, message }));
        id
    }

    pub fn dismiss(&self, id: Uuid) {
        self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }

    /// Reactive list of visible toasts.
    pub fn toasts(&self) -> Signal<Vec<Toast>> {
        self.toasts.into()
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        self.toasts.get_untracked()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("Notifier not found. Wrap your app with AppProviders.")
}
