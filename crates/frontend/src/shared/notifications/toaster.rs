use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{use_notifier, Toast};

/// Renders the notification queue. Each toast removes itself after `ttl_ms`.
#[component]
pub fn Toaster(#[prop(optional)] ttl_ms: Option<u32>) -> impl IntoView {
    let notifier = use_notifier();
    let ttl_ms = ttl_ms.unwrap_or(4_000);

    view! {
        <div class="toaster" role="status" aria-live="polite">
            <For
                each=move || notifier.toasts().get()
                key=|toast| toast.id
                children=move |toast: Toast| view! { <ToastItem toast=toast ttl_ms=ttl_ms /> }
            />
        </div>
    }
}

#[component]
fn ToastItem(toast: Toast, ttl_ms: u32) -> impl IntoView {
    let notifier = use_notifier();
    let id = toast.id;

    spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(ttl_ms).await;
        notifier.dismiss(id);
    });

    view! {
        <div class=toast.level.css_class()>
            <span class="toast__message">{toast.message}</span>
            <button
                class="toast__close"
                title="Dismiss"
                on:click=move |_| notifier.dismiss(id)
            >
                "×"
            </button>
        </div>
    }
}
