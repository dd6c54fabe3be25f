//! Recipe List Component
//!
//! "Moje Przepisy" page: All/Favorites filter and a card per recipe with the
//! favorite star, shopping list button and delete.

use leptos::prelude::*;
use leptos::task::spawn_local;
use przepisy_core::library::LibraryFilter;
use przepisy_core::models::Recipe;

use super::{DeleteConfirmButton, ListButton, Notice};
use crate::context::{use_app_context, Page};
use crate::store::{store_visible_recipes, use_app_store, AppStateStoreFields};

const FILTERS: [LibraryFilter; 2] = [LibraryFilter::All, LibraryFilter::Favorites];

#[component]
pub fn RecipeList() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let visible = Memo::new(move |_| store_visible_recipes(&store));

    // Refresh on every visit so favorites changed on a recipe page show up
    let api = ctx.api();
    let library = ctx.library();
    spawn_local(async move {
        library.load(&*api).await;
    });

    view! {
        <div class="recipe-list-page">
            <div class="recipe-list-header">
                <div>
                    <h2>"Moje Przepisy"</h2>
                    <p class="recipe-count">{move || format!("{} przepisów", store.recipes().read().len())}</p>
                </div>
                <div class="filter-tabs">
                    {FILTERS.iter().map(|filter| {
                        let filter = *filter;
                        view! {
                            <button
                                class=move || if store.filter().get() == filter { "filter-tab active" } else { "filter-tab" }
                                on:click=move |_| ctx.library().set_filter(filter)
                            >
                                {filter.label()}
                            </button>
                        }
                    }).collect_view()}
                </div>
            </div>

            <Notice />
            {move || store.library_error().get().map(|msg| view! { <p class="error-message">{msg}</p> })}

            {move || if store.library_loading().get() {
                view! { <div class="loading">"Ładowanie…"</div> }.into_any()
            } else if visible.get().is_empty() {
                view! {
                    <div class="empty-state">
                        <p class="empty-icon">"🍽"</p>
                        <p>{store.filter().get().empty_message()}</p>
                    </div>
                }.into_any()
            } else {
                view! {
                    <div class="recipe-grid">
                        <For
                            each=move || visible.get()
                            key=|recipe| (recipe.id, recipe.is_favorite)
                            children=move |recipe| view! { <RecipeCard recipe=recipe /> }
                        />
                    </div>
                }.into_any()
            }}
        </div>
    }
}

#[component]
fn RecipeCard(recipe: Recipe) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let id = recipe.id;
    let pending = move || store.library_pending().read().contains(&id);

    let toggle_favorite = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let api = ctx.api();
        let library = ctx.library();
        spawn_local(async move {
            library.toggle_favorite(&*api, id).await;
        });
    };

    let delete = move |_: ()| {
        let api = ctx.api();
        let library = ctx.library();
        let list = ctx.list();
        spawn_local(async move {
            library.delete_recipe(&*api, &list, id).await;
        });
    };

    let star_title = if recipe.is_favorite { "Usuń z ulubionych" } else { "Dodaj do ulubionych" };
    let star_class = if recipe.is_favorite { "favorite-btn active" } else { "favorite-btn" };

    view! {
        <div class="recipe-card" on:click=move |_| ctx.navigate(Page::Recipe(id))>
            <h3 class="recipe-card-title">{recipe.title_pl.clone()}</h3>
            <p class="recipe-card-original" dir="rtl">{recipe.title_original.clone()}</p>
            <div class="recipe-card-tags">
                {recipe.tags.iter().take(4).map(|tag| view! { <span class="tag">{tag.clone()}</span> }).collect_view()}
            </div>
            <div class="recipe-card-actions">
                <button class=star_class title=star_title disabled=pending on:click=toggle_favorite>
                    "★"
                </button>
                <ListButton recipe_id=id />
                <DeleteConfirmButton
                    label=recipe.title_pl.clone()
                    disabled=Signal::derive(pending)
                    on_confirm=Callback::new(delete)
                />
            </div>
        </div>
    }
}
