//! Global Application State Store
//!
//! Reactive mirror of the core stores for fine-grained rendering. The core
//! stays the source of truth; subscriptions in `App` copy each snapshot here.

use leptos::prelude::*;
use przepisy_core::library::{LibraryFilter, LibraryState};
use przepisy_core::models::{Recipe, RecipeId};
use przepisy_core::shopping::{Checklist, EmailStatus, ListSnapshot, PanelState};
use reactive_stores::Store;

#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Recipe ids on the shopping list
    pub list_ids: Vec<RecipeId>,
    /// Ids with an add/remove in flight
    pub list_loading: Vec<RecipeId>,
    pub list_open: bool,
    pub list_clearing: bool,
    /// Notice from the last list action, if any
    pub list_notice: Option<String>,
    pub recipes: Vec<Recipe>,
    pub filter: LibraryFilter,
    pub library_loading: bool,
    pub library_error: Option<String>,
    pub library_pending: Vec<RecipeId>,
    pub panel: PanelState,
    pub checklist: Checklist,
    pub email: EmailStatus,
}

pub type AppStore = Store<AppState>;

pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Mirror Functions
// ========================

pub fn store_mirror_list(store: &AppStore, snapshot: &ListSnapshot) {
    store.list_ids().set(snapshot.recipe_ids.iter().copied().collect());
    store.list_loading().set(snapshot.loading.iter().copied().collect());
    store.list_open().set(snapshot.is_open);
    store.list_clearing().set(snapshot.clearing);
    store.list_notice().set(snapshot.notice.as_ref().map(|n| n.message().to_string()));
}

pub fn store_mirror_library(store: &AppStore, state: &LibraryState) {
    store.recipes().set(state.recipes.clone());
    store.filter().set(state.filter);
    store.library_loading().set(state.loading);
    store.library_error().set(state.error.clone());
    store.library_pending().set(state.pending.iter().copied().collect());
}

/// Recipes passing the current filter
pub fn store_visible_recipes(store: &AppStore) -> Vec<Recipe> {
    let filter = store.filter().get();
    store.recipes().read().iter().filter(|r| filter.matches(r)).cloned().collect()
}

pub fn store_is_listed(store: &AppStore, id: RecipeId) -> bool {
    store.list_ids().read().contains(&id)
}

pub fn store_is_list_loading(store: &AppStore, id: RecipeId) -> bool {
    store.list_loading().read().contains(&id)
}
