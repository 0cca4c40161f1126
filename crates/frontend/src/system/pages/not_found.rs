use leptos::prelude::*;

use crate::shared::navigation::{use_navigation, Navigator};

#[component]
pub fn NotFoundPage() -> impl IntoView {
    let navigation = use_navigation();
    let path = navigation.path();

    view! {
        <div class="not-found">
            <h2>"Page not found"</h2>
            <p>{move || format!("Nothing lives at {}", path.get())}</p>
            <button class="btn-primary" on:click=move |_| navigation.redirect("/dashboard")>
                "Go to dashboard"
            </button>
        </div>
    }
}
