use leptos::prelude::*;

use super::context::use_auth;
use crate::shared::config::AppConfig;
use crate::shared::navigation::{use_navigation, Navigator};

/// Renders `children` for an authenticated session. Anonymous visitors are
/// sent to the login view.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let navigation = use_navigation();
    let config = use_context::<AppConfig>().expect("AppConfig not found. Wrap your app with AppProviders.");
    let session = auth.session();

    Effect::new(move |_| {
        let (loading, authenticated) = session.with(|s| (s.is_loading, s.is_authenticated));
        if !loading && !authenticated {
            navigation.redirect(&config.login_path);
        }
    });

    view! {
        <Show
            when=move || session.with(|s| !s.is_loading && s.is_authenticated)
            fallback=move || {
                session
                    .with(|s| s.is_loading)
                    .then(|| view! { <div class="auth-loading">"Loading..."</div> })
            }
        >
            {children()}
        </Show>
    }
}

/// Renders `children` only when the user holds `role`.
#[component]
pub fn RequireRole(#[prop(into)] role: String, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();

    view! {
        <Show
            when=move || auth.has_role(&role)
            fallback=|| view! { <div class="access-denied">"Access denied."</div> }
        >
            {children()}
        </Show>
    }
}
