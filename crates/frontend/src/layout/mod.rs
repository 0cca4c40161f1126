pub mod sidebar;
pub mod top_header;

use leptos::prelude::*;
use sidebar::Sidebar;
use top_header::TopHeader;

/// Authenticated application shell.
///
/// ```text
/// +---------------------------+
/// |         TopHeader         |
/// +---------+-----------------+
/// | Sidebar |     content     |
/// +---------+-----------------+
/// ```
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let sidebar_open = RwSignal::new(true);

    view! {
        <div class="app-layout">
            <TopHeader sidebar_open=sidebar_open />
            <div class="app-body">
                <Sidebar open=sidebar_open />
                <main class="app-main">{children()}</main>
            </div>
        </div>
    }
}
