use contracts::system::auth::{LoginCredentials, RegisterCredentials};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::navigation::{use_navigation, Navigator};
use crate::system::auth::use_auth;

/// Sign-in form; `register` opens it in sign-up mode.
#[component]
pub fn LoginPage(#[prop(optional)] register: bool) -> impl IntoView {
    let auth = use_auth();
    let navigation = use_navigation();
    let session = auth.session();

    let (registering, set_registering) = signal(register);
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let is_loading = move || session.with(|s| s.is_loading);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let auth = auth.clone();
        let (name, email, password) = (name.get(), email.get(), password.get());
        let registering = registering.get();

        spawn_local(async move {
            let signed_in = if registering {
                auth.register(&RegisterCredentials { name, email, password }).await
            } else {
                auth.login(&LoginCredentials { email, password }).await
            };
            if signed_in {
                navigation.redirect("/");
            }
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h2>{move || if registering.get() { "Create account" } else { "Sign in" }}</h2>

                <Show when=move || session.with(|s| s.error.is_some())>
                    <div class="error-message">
                        {move || session.with(|s| s.error.clone().unwrap_or_default())}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <Show when=move || registering.get()>
                        <div class="form-group">
                            <label for="name">"Name"</label>
                            <input
                                type="text"
                                id="name"
                                value=move || name.get()
                                on:input=move |ev| set_name.set(event_target_value(&ev))
                                disabled=is_loading
                            />
                        </div>
                    </Show>

                    <div class="form-group">
                        <label for="email">"Email"</label>
                        <input
                            type="email"
                            id="email"
                            value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            required
                            disabled=is_loading
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Password"</label>
                        <input
                            type="password"
                            id="password"
                            value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            required
                            disabled=is_loading
                        />
                    </div>

                    <button type="submit" class="btn-primary" disabled=is_loading>
                        {move || match (is_loading(), registering.get()) {
                            (true, _) => "Please wait...",
                            (false, true) => "Register",
                            (false, false) => "Sign in",
                        }}
                    </button>
                </form>

                <button
                    type="button"
                    class="btn-link"
                    on:click=move |_| set_registering.update(|r| *r = !*r)
                >
                    {move || if registering.get() { "Have an account? Sign in" } else { "No account? Register" }}
                </button>
            </div>
        </div>
    }
}
