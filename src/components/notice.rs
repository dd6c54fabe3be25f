//! Shopping List Notice Component

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

/// Last notice from the shopping list store, dismissable
#[component]
pub fn Notice() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    move || {
        store.list_notice().get().map(|msg| view! {
            <div class="notice">
                <span>{msg}</span>
                <button class="notice-close" on:click=move |_| ctx.list().dismiss_notice()>"×"</button>
            </div>
        })
    }
}
