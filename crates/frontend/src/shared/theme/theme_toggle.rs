use leptos::prelude::*;

use super::{use_theme, Theme};

/// Sun/moon button flipping between light and dark.
#[component]
pub fn ThemeToggle(#[prop(optional, into)] class: String) -> impl IntoView {
    let store = use_theme();
    let theme = store.theme();
    let class = format!("theme-toggle {}", class).trim_end().to_string();

    view! {
        <button
            class=class
            title="Toggle theme"
            aria-label="Toggle theme"
            on:click=move |_| store.toggle_theme()
        >
            {move || if theme.get() == Theme::Light { "☀" } else { "☾" }}
            <span class="sr-only">"Toggle theme"</span>
        </button>
    }
}
