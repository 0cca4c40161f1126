use leptos::prelude::*;

use crate::shared::theme::ThemeToggle;
use crate::system::auth::use_auth;

#[component]
pub fn TopHeader(sidebar_open: RwSignal<bool>) -> impl IntoView {
    let auth = use_auth();
    let session = auth.session();

    view! {
        <header class="top-header">
            <button
                class="top-header__icon-btn"
                title=move || if sidebar_open.get() { "Hide navigation" } else { "Show navigation" }
                on:click=move |_| sidebar_open.update(|open| *open = !*open)
            >
                "☰"
            </button>
            <span class="top-header__title">"DashboardX"</span>
            <div class="top-header__actions">
                <ThemeToggle class="top-header__icon-btn" />
                <span class="top-header__user">
                    {move || session.with(|s| s.user.as_ref().map(|u| u.name.clone()).unwrap_or_default())}
                </span>
                <button class="top-header__icon-btn" title="Log out" on:click=move |_| auth.logout()>
                    "⏻"
                </button>
            </div>
        </header>
    }
}
