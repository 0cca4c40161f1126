use contracts::system::auth::User;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::data::{use_crud, use_data_fetching};
use crate::shared::list_utils::get_sort_indicator;
use crate::system::auth::RequireRole;

const PAGE_SIZES: [u32; 3] = [10, 25, 50];

#[component]
pub fn UsersListPage() -> impl IntoView {
    view! {
        <RequireRole role="admin">
            <UsersList />
        </RequireRole>
    }
}

fn email(user: &User) -> String {
    user.extra
        .get("email")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[component]
fn UsersList() -> impl IntoView {
    let list = use_data_fetching::<User>("/users");
    let crud = use_crud::<User>("/users", Some(list.key()));
    let search = RwSignal::new(String::new());
    let pagination = list.pagination();
    let query = list.query();

    let header = move |field: &'static str, label: &'static str| {
        view! {
            <th class="sortable" on:click=move |_| list.handle_sort(field)>
                {label}
                {move || query.with(|q| get_sort_indicator(q.sort_by.as_deref(), field, q.sort_direction))}
            </th>
        }
    };

    let remove = move |id: String| {
        spawn_local(async move {
            let _ = crud.remove(&id).await;
        });
    };

    view! {
        <div class="page">
            <div class="page__toolbar">
                <input
                    type="search"
                    placeholder="Search"
                    prop:value=move || search.get()
                    on:input=move |ev| search.set(event_target_value(&ev))
                    on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            list.handle_filter_change([("search", search.get_untracked())]);
                        }
                    }
                />
                <button on:click=move |_| {
                    search.set(String::new());
                    list.handle_filter_reset();
                }>"Reset"</button>
                <select on:change=move |ev| {
                    if let Ok(limit) = event_target_value(&ev).parse::<u32>() {
                        list.handle_limit_change(limit);
                    }
                }>
                    {PAGE_SIZES
                        .into_iter()
                        .map(|size| view! {
                            <option value=size.to_string() selected=move || pagination.get().limit == size>
                                {size}
                            </option>
                        })
                        .collect_view()}
                </select>
            </div>

            <Show when=move || list.error.get().is_some()>
                <div class="error-message">{move || list.error.get().unwrap_or_default()}</div>
            </Show>

            <table class=move || if list.loading.get() { "data-table data-table--loading" } else { "data-table" }>
                <thead>
                    <tr>
                        {header("name", "Name")}
                        {header("email", "Email")}
                        {header("role", "Role")}
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || list.data.get()
                        key=|user| user.id.clone()
                        children=move |user: User| {
                            let id = user.id.clone();
                            view! {
                                <tr>
                                    <td>{user.name.clone()}</td>
                                    <td>{email(&user)}</td>
                                    <td>{user.role.clone()}</td>
                                    <td>
                                        <button
                                            disabled=move || crud.remove_status.loading.get()
                                            on:click=move |_| remove(id.clone())
                                        >
                                            "Delete"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <div class="pagination">
                <button
                    disabled=move || pagination.get().page <= 1
                    on:click=move |_| list.handle_page_change(pagination.get_untracked().page.saturating_sub(1))
                >
                    "Prev"
                </button>
                <span>
                    {move || {
                        let p = pagination.get();
                        format!("Page {} of {} ({} total)", p.page, p.total_pages.max(1), p.total)
                    }}
                </span>
                <button
                    disabled=move || { let p = pagination.get(); p.page >= p.total_pages }
                    on:click=move |_| list.handle_page_change(pagination.get_untracked().page + 1)
                >
                    "Next"
                </button>
            </div>
        </div>
    }
}
