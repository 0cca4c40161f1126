use leptos::prelude::*;

use crate::shared::navigation::{use_navigation, Navigator};

#[component]
pub fn NotAuthorizedPage() -> impl IntoView {
    let navigation = use_navigation();

    view! {
        <div class="not-authorized">
            <h2>"Not authorized"</h2>
            <p>"You do not have permission to view this page."</p>
            <button class="btn-primary" on:click=move |_| navigation.redirect("/")>
                "Back to start"
            </button>
        </div>
    }
}
