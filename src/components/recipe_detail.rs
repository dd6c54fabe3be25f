//! Recipe Detail Component
//!
//! One recipe with its variant tabs, the adaptation menu, the alternatives
//! prompt, favorite and personal notes. The core `RecipeView` drives all of
//! it; this component mirrors its snapshots into signals.

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use przepisy_core::models::{note_text, Alternative, DietKind, RecipeId, VariantType};
use przepisy_core::variants::{AdaptPhase, DisplayedRecipe, RecipeView, Tab, VariantState};
use przepisy_core::HttpGateway;

use super::{ListButton, Notice};
use crate::context::{use_app_context, AppContext, Page};

type ViewHandle = StoredValue<Option<Rc<RecipeView>>, LocalStorage>;

const NOT_FOUND: &str = "Nie znaleziono przepisu";

/// Known note keys with their label and icon
fn note_meta(key: &str) -> Option<(&'static str, &'static str)> {
    match key {
        "porcje" => Some(("Porcje", "🍽")),
        "czas_przygotowania" => Some(("Przygotowanie", "⏱")),
        "czas_gotowania" => Some(("Gotowanie", "🔥")),
        _ => None,
    }
}

/// Run `f` against the loaded view, if there is one
fn spawn_on_view<F, Fut>(ctx: AppContext, handle: ViewHandle, f: F)
where
    F: FnOnce(Rc<RecipeView>, Rc<HttpGateway>) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    if let Some(view) = handle.get_value() {
        spawn_local(f(view, ctx.api()));
    }
}

#[component]
pub fn RecipeDetail(recipe_id: RecipeId) -> impl IntoView {
    let ctx = use_app_context();
    let handle: ViewHandle = StoredValue::new_local(None);
    let (state, set_state) = signal(None::<VariantState>);
    let (load_error, set_load_error) = signal(None::<String>);
    let (notes_saved, set_notes_saved) = signal(false);
    let (notes, set_notes) = signal(String::new());

    spawn_local(async move {
        let api = ctx.api();
        match RecipeView::load(&*api, recipe_id, ctx.config()).await {
            Ok(view) => {
                let view = Rc::new(view);
                set_notes.set(view.snapshot().recipe.user_notes.unwrap_or_default());
                set_state.set(Some(view.snapshot()));
                view.state().subscribe(move |s| set_state.set(Some(s.clone())));
                view.notes_saved().observable().subscribe(move |saved| set_notes_saved.set(*saved));
                let kept = view.clone();
                if handle.try_update_value(|slot| *slot = Some(kept)).is_none() {
                    // Page already left
                    view.close();
                }
            }
            Err(e) => {
                let msg = if e.is_not_found() { NOT_FOUND.to_string() } else { e.message() };
                set_load_error.set(Some(msg));
            }
        }
    });

    on_cleanup(move || {
        handle.try_with_value(|slot| {
            if let Some(view) = slot {
                view.close();
            }
        });
    });

    let shown = Memo::new(move |_| state.get().map(|s| s.display()));

    let save_notes = move |_| {
        let text = notes.get_untracked();
        spawn_on_view(ctx, handle, move |view, api| async move {
            if let Some(ticket) = view.save_notes(&*api, &text).await {
                set_timeout(
                    move || {
                        view.notes_saved().expire(ticket);
                    },
                    ticket.after,
                );
            }
        });
    };

    let toggle_favorite = move |_| {
        spawn_on_view(ctx, handle, |view, api| async move {
            view.toggle_favorite(&*api).await;
        });
    };

    view! {
        <div class="recipe-detail">
            <button class="back-btn" on:click=move |_| ctx.navigate(Page::Recipes)>"← Wróć"</button>

            {move || load_error.get().map(|msg| view! {
                <div class="not-found">
                    <div class="not-found-icon">"😕"</div>
                    <p>{msg}</p>
                </div>
            })}

            <Show when=move || state.with(Option::is_none) && load_error.with(Option::is_none)>
                <div class="spinner"></div>
            </Show>

            <Show when=move || state.with(Option::is_some)>
                <VariantBar ctx=ctx handle=handle state=state />
            </Show>

            {move || shown.get().map(|shown| {
                let is_original = shown.tab == Tab::Original;
                let pending = state.with(|s| s.as_ref().is_some_and(|s| s.recipe.is_pending()));
                let favorite_busy = move || state.with(|s| s.as_ref().is_some_and(|s| s.favorite_pending));
                view! {
                    <div class="recipe-header">
                        <span class="variant-badge">{shown.badge.clone()}</span>
                        <h1>{shown.title.clone()}</h1>
                        <button
                            class=if shown.is_favorite { "favorite-btn active" } else { "favorite-btn" }
                            title=if shown.is_favorite { "Usuń z ulubionych" } else { "Dodaj do ulubionych" }
                            disabled=favorite_busy
                            on:click=toggle_favorite
                        >
                            "★"
                        </button>
                        <ListButton recipe_id=recipe_id add_only=true />
                    </div>
                    <div class="recipe-meta">
                        {shown.tags.iter().map(|tag| view! { <span class="tag">{tag.clone()}</span> }).collect_view()}
                        {shown.created.clone().map(|date| view! { <span class="created">{date}</span> })}
                    </div>
                    <Show when=move || pending>
                        <div class="pending-banner">"⏳ Tłumaczenie w toku, treść pojawi się wkrótce."</div>
                    </Show>
                    <RecipeContent shown=shown.clone() />
                    <Show when=move || is_original>
                        <button
                            class="show-original-btn"
                            on:click=move |_| {
                                if let Some(view) = handle.get_value() {
                                    view.toggle_show_original();
                                }
                            }
                        >
                            "Pokaż oryginał"
                        </button>
                    </Show>
                }
            })}

            <Notice />
            {move || state.get().and_then(|s| s.action_error).map(|msg| view! { <p class="error-message">{msg}</p> })}

            <Show when=move || state.with(Option::is_some)>
                <section class="recipe-section">
                    <h2>"📝 Moje notatki"</h2>
                    <textarea
                        rows="4"
                        placeholder="Dodaj własne notatki, wskazówki lub modyfikacje…"
                        prop:value=move || notes.get()
                        on:input=move |ev| set_notes.set(event_target_value(&ev))
                    ></textarea>
                    <div class="notes-actions">
                        <button class="save-notes-btn" on:click=save_notes>"Zapisz notatki"</button>
                        <Show when=move || notes_saved.get()>
                            <span class="notes-saved">"✓ Zapisano"</span>
                        </Show>
                    </div>
                </section>
            </Show>

            <AlternativesModal ctx=ctx handle=handle state=state />
        </div>
    }
}

/// Tabs for the original and each cached variant, plus the adapt menu
#[component]
fn VariantBar(ctx: AppContext, handle: ViewHandle, state: ReadSignal<Option<VariantState>>) -> impl IntoView {
    let (menu_open, set_menu_open) = signal(false);
    let tabs = move || {
        state.with(|s| {
            s.as_ref().map_or_else(Vec::new, |s| {
                s.variants().iter().map(|v| v.variant_type.clone()).collect::<Vec<_>>()
            })
        })
    };
    let active = move || state.with(|s| s.as_ref().map(|s| s.active.clone()).unwrap_or_default());
    let phase = move |t: &VariantType| state.with(|s| s.as_ref().map_or(AdaptPhase::Absent, |s| s.phase(t)));

    let switch = move |tab: Tab| {
        if let Some(view) = handle.get_value() {
            view.switch_tab(tab);
        }
    };

    let request = move |variant_type: VariantType| {
        set_menu_open.set(false);
        spawn_on_view(ctx, handle, move |view, api| async move {
            view.request_variant(&*api, variant_type).await;
        });
    };

    view! {
        <div class="variant-bar">
            <button
                class=move || if active() == Tab::Original { "variant-tab active" } else { "variant-tab" }
                on:click=move |_| switch(Tab::Original)
            >
                "Oryginał"
            </button>
            <For
                each=tabs
                key=|t| t.clone()
                children=move |variant_type| {
                    let tab = Tab::Variant(variant_type.clone());
                    let is_active = {
                        let tab = tab.clone();
                        move || active() == tab
                    };
                    view! {
                        <button
                            class=move || if is_active() { "variant-tab active" } else { "variant-tab" }
                            on:click=move |_| switch(tab.clone())
                        >
                            {variant_type.label().to_string()}
                        </button>
                    }
                }
            />
            <div class="adapt-menu">
                <button class="adapt-btn" on:click=move |_| set_menu_open.update(|open| *open = !*open)>
                    "✨ Dostosuj"
                </button>
                <Show when=move || menu_open.get()>
                    <div class="adapt-dropdown" on:mouseleave=move |_| set_menu_open.set(false)>
                        {DietKind::ALL.iter().map(|kind| {
                            let variant_type = VariantType::from(*kind);
                            let for_disabled = variant_type.clone();
                            let for_mark = variant_type.clone();
                            view! {
                                <button
                                    class="adapt-option"
                                    disabled=move || phase(&for_disabled) == AdaptPhase::Requesting
                                    on:click=move |_| request(variant_type.clone())
                                >
                                    {kind.label()}
                                    {move || match phase(&for_mark) {
                                        AdaptPhase::Cached => " ✓",
                                        AdaptPhase::Requesting => " …",
                                        AdaptPhase::Absent | AdaptPhase::NeedsChoice => "",
                                    }}
                                </button>
                            }
                        }).collect_view()}
                    </div>
                </Show>
            </div>
        </div>
        {move || state.with(|s| s.as_ref().and_then(|s| s.last_error.clone())).map(|msg| view! {
            <p class="adapt-error">{msg}</p>
        })}
    }
}

/// Ingredients, steps, notes and substitutions of the active tab
#[component]
fn RecipeContent(shown: DisplayedRecipe) -> impl IntoView {
    let meta: Vec<(&'static str, &'static str, String)> = shown
        .notes
        .iter()
        .filter_map(|(key, value)| note_meta(key).map(|(label, icon)| (label, icon, note_text(value))))
        .collect();

    view! {
        <div class="recipe-content">
            <div class="note-meta">
                {meta.into_iter().map(|(label, icon, text)| view! {
                    <span class="note-chip">{icon} " " {label} ": " {text}</span>
                }).collect_view()}
            </div>

            {(!shown.warnings.is_empty()).then(|| view! {
                <div class="warnings">
                    {shown.warnings.iter().map(|w| view! { <p class="warning">"⚠ " {w.clone()}</p> }).collect_view()}
                </div>
            })}

            {shown.original.clone().map(|original| view! {
                <div class="original-side" dir="rtl">
                    <h2>{original.title}</h2>
                    <ul>
                        {original.ingredients.into_iter().map(|i| view! { <li>{i}</li> }).collect_view()}
                    </ul>
                </div>
            })}

            {(!shown.ingredients.is_empty()).then(|| view! {
                <section class="recipe-section">
                    <h2>"🥕 Składniki"</h2>
                    <ul class="ingredients">
                        {shown.ingredients.iter().map(|i| view! { <li>{i.clone()}</li> }).collect_view()}
                    </ul>
                </section>
            })}

            {(!shown.steps.is_empty()).then(|| view! {
                <section class="recipe-section">
                    <h2>"👨‍🍳 Przygotowanie"</h2>
                    <ol class="steps">
                        {shown.steps.iter().map(|s| view! { <li>{s.clone()}</li> }).collect_view()}
                    </ol>
                </section>
            })}

            {(!shown.substitutions.is_empty()).then(|| view! {
                <section class="recipe-section substitutions">
                    <h2>"🔄 Zamienniki składników"</h2>
                    {shown.substitutions.iter().map(|(from, to)| view! {
                        <p><strong>{from.clone()}</strong> " → " {to.clone()}</p>
                    }).collect_view()}
                </section>
            })}
        </div>
    }
}

/// Shown when the adapter declined and offered alternatives
#[component]
fn AlternativesModal(ctx: AppContext, handle: ViewHandle, state: ReadSignal<Option<VariantState>>) -> impl IntoView {
    let choice = move || state.with(|s| s.as_ref().and_then(|s| s.choice.clone()));

    let pick = move |variant_type: VariantType, alternative: Alternative| {
        spawn_on_view(ctx, handle, move |view, api| async move {
            view.resolve_alternative(&*api, variant_type, &alternative).await;
        });
    };

    let dismiss = move |_| {
        if let Some(view) = handle.get_value() {
            view.dismiss_choice();
        }
    };

    move || {
        choice().map(|choice| {
            let busy = state.with(|s| s.as_ref().is_some_and(|s| s.is_requesting(&choice.variant_type)));
            view! {
                <div class="modal-backdrop">
                    <div class="modal alternatives-modal">
                        <h2>{format!("Nie da się przygotować wersji: {}", choice.variant_type.label())}</h2>
                        <p>"Wybierz jedną z propozycji:"</p>
                        {choice.alternatives.iter().cloned().map(|alternative| {
                            let variant_type = choice.variant_type.clone();
                            let chosen = alternative.clone();
                            view! {
                                <div class="alternative">
                                    <h3>{alternative.title.clone()}</h3>
                                    <p class="alternative-reason">{alternative.reason.clone()}</p>
                                    <button
                                        class="pick-btn"
                                        disabled=busy
                                        on:click=move |_| pick(variant_type.clone(), chosen.clone())
                                    >
                                        "Wybierz"
                                    </button>
                                </div>
                            }
                        }).collect_view()}
                        <button class="cancel-btn" on:click=dismiss>"Anuluj"</button>
                    </div>
                </div>
            }
        })
    }
}
