//! Przepisy Frontend App
//!
//! Navbar on top, the recipe list or one recipe below, and the shopping list
//! panel as an overlay.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::components::{Navbar, RecipeDetail, RecipeList, ShoppingListPanel};
use crate::context::{AppContext, Page};
use crate::session;
use crate::store::{store_mirror_library, store_mirror_list, AppState, AppStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let (page, set_page) = signal(Page::Recipes);
    let ctx = AppContext::new(session::client_config(), (page, set_page));
    let store = Store::new(AppState::default());
    provide_context(ctx);
    provide_context(store);

    // Core stores -> reactive mirror. These live as long as the app.
    let api = ctx.api();
    let panel = ctx.panel();
    ctx.list().state().subscribe(move |snapshot| {
        store_mirror_list(&store, snapshot);
        let api = api.clone();
        let panel = panel.clone();
        let snapshot = snapshot.clone();
        spawn_local(async move {
            panel.sync(&*api, &snapshot).await;
        });
    });
    ctx.library().state().subscribe(move |state| store_mirror_library(&store, state));
    ctx.panel().state().subscribe(move |state| store.panel().set(state.clone()));
    ctx.panel().checklist().subscribe(move |checklist| store.checklist().set(checklist.clone()));
    ctx.panel().email_status().observable().subscribe(move |status| store.email().set(status.clone()));

    session::start(ctx);

    view! {
        <div class="app-layout">
            <Navbar />
            <main class="main-content">
                {move || match page.get() {
                    Page::Recipes => view! { <RecipeList /> }.into_any(),
                    Page::Recipe(id) => view! { <RecipeDetail recipe_id=id /> }.into_any(),
                }}
            </main>
            <ShoppingListPanel />
        </div>
    }
}
