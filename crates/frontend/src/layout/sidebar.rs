//! Role-aware navigation sidebar.

use contracts::system::auth::User;
use leptos::prelude::*;

use crate::shared::navigation::{use_navigation, Navigator};
use crate::system::auth::{has_role, use_auth};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

const USER_ITEMS: &[NavItem] = &[
    NavItem { label: "Dashboard", href: "/dashboard" },
    NavItem { label: "Reports", href: "/reports" },
    NavItem { label: "Documents", href: "/documents" },
];

const ADMIN_ITEMS: &[NavItem] = &[
    NavItem { label: "Users", href: "/users" },
    NavItem { label: "Settings", href: "/settings" },
];

/// Admins get the user items plus the admin section.
pub fn nav_items(is_admin: bool) -> Vec<NavItem> {
    let mut items = USER_ITEMS.to_vec();
    if is_admin {
        items.extend_from_slice(ADMIN_ITEMS);
    }
    items
}

/// "Ada Lovelace" -> "AL"
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[component]
pub fn Sidebar(open: RwSignal<bool>) -> impl IntoView {
    let auth = use_auth();
    let navigation = use_navigation();
    let session = auth.session();
    let path = navigation.path();

    let items = move || session.with(|s| nav_items(has_role(s, "admin")));
    let user = move || session.with(|s| s.user.clone());

    view! {
        <aside class=move || if open.get() { "sidebar" } else { "sidebar sidebar--closed" }>
            <div class="sidebar__brand">"DashboardX"</div>
            <nav class="sidebar__menu">
                <p class="sidebar__section">"Menu"</p>
                <For
                    each=items
                    key=|item| item.href
                    children=move |item: NavItem| {
                        view! {
                            <a
                                href=item.href
                                class=move || {
                                    if path.get() == item.href {
                                        "sidebar__item sidebar__item--active"
                                    } else {
                                        "sidebar__item"
                                    }
                                }
                                on:click=move |ev| {
                                    ev.prevent_default();
                                    navigation.redirect(item.href);
                                }
                            >
                                {item.label}
                            </a>
                        }
                    }
                />
                <div class="sidebar__divider"></div>
                <button class="sidebar__item" on:click={
                    let auth = auth.clone();
                    move |_| auth.logout()
                }>
                    "Logout"
                </button>
            </nav>
            {move || user().map(|u: User| view! {
                <div class="sidebar__profile">
                    <div class="sidebar__avatar">{initials(&u.name)}</div>
                    <div class="sidebar__who">
                        <span class="sidebar__name">{u.name.clone()}</span>
                        <span class="sidebar__role">{u.role.clone()}</span>
                    </div>
                </div>
            })}
        </aside>
    }
}
