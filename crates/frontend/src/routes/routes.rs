use leptos::prelude::*;

use crate::dashboards::DashboardPage;
use crate::layout::Shell;
use crate::shared::navigation::use_navigation;
use crate::system::auth::RequireAuth;
use crate::system::pages::login::LoginPage;
use crate::system::pages::not_authorized::NotAuthorizedPage;
use crate::system::pages::not_found::NotFoundPage;
use crate::system::users::UsersListPage;

/// Where a path leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    NotAuthorized,
    Dashboard,
    Users,
    NotFound,
}

impl Route {
    pub fn resolve(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/not-authorized" => Route::NotAuthorized,
            "" | "/dashboard" => Route::Dashboard,
            "/users" => Route::Users,
            _ => Route::NotFound,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register | Route::NotAuthorized)
    }
}

#[component]
fn MainLayout(route: Memo<Route>) -> impl IntoView {
    view! {
        <Shell>
            {move || match route.get() {
                Route::Dashboard => view! { <DashboardPage /> }.into_any(),
                Route::Users => view! { <UsersListPage /> }.into_any(),
                _ => view! { <NotFoundPage /> }.into_any(),
            }}
        </Shell>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let path = use_navigation().path();
    let route = Memo::new(move |_| Route::resolve(&path.get()));
    let public = Memo::new(move |_| route.get().is_public());

    move || {
        if public.get() {
            match route.get() {
                Route::Register => view! { <LoginPage register=true /> }.into_any(),
                Route::NotAuthorized => view! { <NotAuthorizedPage /> }.into_any(),
                _ => view! { <LoginPage /> }.into_any(),
            }
        } else {
            view! {
                <RequireAuth>
                    <MainLayout route=route />
                </RequireAuth>
            }
            .into_any()
        }
    }
}
