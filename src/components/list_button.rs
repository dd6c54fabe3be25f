//! Shopping List Button Component
//!
//! Adds a recipe to the shopping list or removes it, disabled while an action
//! for that recipe is in flight. With `add_only` a listed recipe is not
//! removed; the list store answers with its duplicate notice instead.

use leptos::prelude::*;
use leptos::task::spawn_local;
use przepisy_core::models::RecipeId;

use crate::context::use_app_context;
use crate::store::{store_is_list_loading, store_is_listed, use_app_store};

#[component]
pub fn ListButton(recipe_id: RecipeId, #[prop(optional)] add_only: bool) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let listed = move || store_is_listed(&store, recipe_id);
    let loading = move || store_is_list_loading(&store, recipe_id);

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let api = ctx.api();
        let list = ctx.list();
        let remove = listed() && !add_only;
        spawn_local(async move {
            if remove {
                list.remove_recipe(&*api, recipe_id).await;
            } else {
                list.add_recipe(&*api, recipe_id).await;
            }
        });
    };

    view! {
        <button
            class=move || if listed() { "list-btn listed" } else { "list-btn" }
            disabled=loading
            on:click=on_click
        >
            {move || match (loading(), listed()) {
                (true, _) => "…",
                (false, true) => "✓ Na liście",
                (false, false) => "+ Lista zakupów",
            }}
        </button>
    }
}
