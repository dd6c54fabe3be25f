//! Navbar Component
//!
//! App title, shopping list toggle with the recipe count badge, sign-out.

use leptos::prelude::*;

use crate::context::{use_app_context, Page};
use crate::session;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn Navbar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let count = move || store.list_ids().read().len();

    view! {
        <nav class="navbar">
            <button class="navbar-title" on:click=move |_| ctx.navigate(Page::Recipes)>
                "Przepisy"
                <span class="navbar-subtitle">"עברית → Polski"</span>
            </button>
            <div class="navbar-actions">
                <button
                    class=move || if store.list_open().get() { "list-toggle active" } else { "list-toggle" }
                    title="Lista zakupów"
                    on:click=move |_| ctx.list().toggle_panel()
                >
                    "🛒"
                    <Show when=move || { count() > 0 }>
                        <span class="list-badge">{count}</span>
                    </Show>
                </button>
                <button class="logout-btn" on:click=move |_| session::sign_out(ctx)>
                    "Wyloguj"
                </button>
            </div>
        </nav>
    }
}
