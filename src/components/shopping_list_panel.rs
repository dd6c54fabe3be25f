//! Shopping List Panel Component
//!
//! Overlay with the aggregated ingredients grouped by category, a checklist
//! with progress, and print/email/clear actions.

use leptos::prelude::*;
use leptos::task::spawn_local;
use przepisy_core::models::{item_key, Aggregate};
use przepisy_core::shopping::{EmailSend, EmailStatus};

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

fn recipe_count_label(count: usize) -> String {
    let noun = if count == 1 { "przepis" } else { "przepisów" };
    format!("{} {}", count, noun)
}

#[component]
pub fn ShoppingListPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let count = move || store.list_ids().read().len();
    let loading = move || store.panel().read().loading;

    let print = move |_| {
        let printed = ctx.panel().print(|| {
            let _ = window().print();
        });
        if !printed {
            log::debug!("Print skipped while the list is loading");
        }
    };

    let send_email = move |_| {
        let api = ctx.api();
        let panel = ctx.panel();
        spawn_local(async move {
            let ticket = match panel.send_email(&*api).await {
                EmailSend::Sent(ticket) | EmailSend::Failed(_, ticket) => ticket,
                EmailSend::Refused => return,
            };
            set_timeout(
                move || {
                    panel.email_status().expire(ticket);
                },
                ticket.after,
            );
        });
    };

    let clear = move |_| {
        let api = ctx.api();
        let list = ctx.list();
        spawn_local(async move {
            list.clear(&*api).await;
        });
    };

    let email_class = move || match store.email().get() {
        EmailStatus::Sent => "email-btn sent",
        EmailStatus::Failed(_) => "email-btn failed",
        EmailStatus::Idle | EmailStatus::Sending => "email-btn",
    };

    view! {
        <Show when=move || store.list_open().get()>
            <div class="panel-backdrop" on:click=move |_| ctx.list().close_panel()></div>
            <aside class="shopping-panel">
                <header class="panel-header">
                    <div>
                        <h2>"Lista zakupów"</h2>
                        <p class="panel-count">{move || recipe_count_label(count())}</p>
                    </div>
                    <button class="panel-close" on:click=move |_| ctx.list().close_panel()>"×"</button>
                </header>

                <div class="panel-body">
                    {move || if count() == 0 {
                        view! {
                            <div class="empty-state">
                                <div class="empty-icon">"🧺"</div>
                                <p>"Lista jest pusta"</p>
                                <p class="hint">"Dodaj przepisy, aby zobaczyć składniki"</p>
                            </div>
                        }.into_any()
                    } else {
                        // Old rows stay hidden until the recomputed aggregate lands
                        match (loading(), store.panel().read().aggregate.clone()) {
                            (false, Some(aggregate)) if aggregate.is_empty() => {
                                view! { <p class="hint">"Brak składników do wyświetlenia"</p> }.into_any()
                            }
                            (false, Some(aggregate)) => view! { <AggregateList aggregate=aggregate /> }.into_any(),
                            _ => view! { <div class="spinner"></div> }.into_any(),
                        }
                    }}
                    {move || store.panel().read().error.clone().map(|msg| view! { <p class="error-message">{msg}</p> })}
                </div>

                <footer class="panel-footer">
                    <Show when=move || { count() > 0 }>
                        <div class="progress">
                            <div class="progress-bar" style:width=move || {
                                let total = store.panel().read().total_items();
                                format!("{}%", store.checklist().read().progress(total))
                            }></div>
                        </div>
                    </Show>
                    <div class="panel-actions">
                        <button class="print-btn" disabled=loading on:click=print>"🖨 Drukuj"</button>
                        <button
                            class=email_class
                            disabled=move || loading() || store.email().get() == EmailStatus::Sending
                            on:click=send_email
                        >
                            {move || match store.email().get() {
                                EmailStatus::Idle => "✉ Wyślij na email".to_string(),
                                status => status.label().to_string(),
                            }}
                        </button>
                        <button
                            class="clear-btn"
                            disabled=move || store.list_clearing().get() || count() == 0
                            on:click=clear
                        >
                            "Wyczyść"
                        </button>
                    </div>
                </footer>
            </aside>
        </Show>
    }
}

/// Categories in display order, each item with its checkbox
#[component]
fn AggregateList(aggregate: Aggregate) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let sections = aggregate
        .categories()
        .map(|(category, items)| {
            let rows = items
                .iter()
                .enumerate()
                .map(|(index, label)| {
                    let key = item_key(category, index);
                    let for_checked = key.clone();
                    let for_class = key.clone();
                    view! {
                        <li class=move || {
                            if store.checklist().read().is_checked(&for_class) { "list-item checked" } else { "list-item" }
                        }>
                            <label>
                                <input
                                    type="checkbox"
                                    prop:checked=move || store.checklist().read().is_checked(&for_checked)
                                    on:change=move |_| {
                                        ctx.panel().toggle_item(&key);
                                    }
                                />
                                <span>{label.clone()}</span>
                            </label>
                        </li>
                    }
                })
                .collect_view();
            view! {
                <section class="category">
                    <h3>{category.icon()} " " {category.label()}</h3>
                    <ul>{rows}</ul>
                </section>
            }
        })
        .collect_view();

    view! { <div class="aggregate">{sections}</div> }
}
