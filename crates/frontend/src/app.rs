use std::sync::Arc;

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::routes::routes::AppRoutes;
use crate::shared::config::AppConfig;
use crate::shared::navigation::{use_navigation, Navigation};
use crate::shared::notifications::Toaster;
use crate::store::{use_store, AppStore};

/// Puts the store, its services and the config into context.
#[component]
pub fn AppProviders(
    store: AppStore,
    config: AppConfig,
    navigation: Navigation,
    children: Children,
) -> impl IntoView {
    provide_context(config);
    provide_context(navigation);
    provide_context(store.auth.clone());
    provide_context(store.theme.clone());
    provide_context(store.client.clone());
    provide_context(store.notifier);
    provide_context(store.queries);
    provide_context(store);

    children()
}

/// Runs the one-time startup and undoes it when the tree is torn down.
#[component]
pub fn AppInitializer(children: Children) -> impl IntoView {
    let store = use_store();
    let navigation = use_navigation();
    let config = use_context::<AppConfig>().expect("AppConfig not found. Wrap your app with AppProviders.");

    if let Some(startup) = store.start(Arc::new(navigation), &config) {
        let auth = store.auth.clone();
        spawn_local(async move { auth.verify_session().await });

        let popstate = window_event_listener(ev::popstate, move |_| navigation.sync_from_location());
        let startup = StoredValue::new_local(Some(startup));
        on_cleanup(move || {
            popstate.remove();
            if let Some(startup) = startup.try_update_value(Option::take).flatten() {
                startup.dispose();
            }
            store.shutdown();
        });
    }

    children()
}

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_env();
    let store = AppStore::browser(&config);
    let navigation = Navigation::new();
    let toast_ttl_ms = config.toast_ttl_ms;

    view! {
        <AppProviders store=store config=config navigation=navigation>
            <AppInitializer>
                <Toaster ttl_ms=toast_ttl_ms />
                <AppRoutes />
            </AppInitializer>
        </AppProviders>
    }
}
