//! Delete Confirm Button Component
//!
//! Inline two-step delete: the trash button turns into "Usunąć?" with ✓/✗.

use leptos::prelude::*;

/// # Arguments
/// * `label` - what is being deleted, shown in the prompt
/// * `disabled` - true while a delete for the same record is running
/// * `on_confirm` - runs once the user confirms
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] label: String,
    #[prop(into)] disabled: Signal<bool>,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (confirm_delete, set_confirm_delete) = signal(false);

    view! {
        <Show when=move || !confirm_delete.get()>
            <button
                class="delete-btn"
                title="Usuń przepis"
                disabled=move || disabled.get()
                on:click=move |ev| {
                    ev.stop_propagation();
                    set_confirm_delete.set(true);
                }
            >
                "🗑"
            </button>
        </Show>
        <Show when=move || confirm_delete.get()>
            <span class="delete-confirm">
                <span class="delete-confirm-text">{format!("Usunąć \"{}\"?", label)}</span>
                <button
                    class="confirm-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirm_delete.set(false);
                        on_confirm.run(());
                    }
                >
                    "✓"
                </button>
                <button
                    class="cancel-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirm_delete.set(false);
                    }
                >
                    "✗"
                </button>
            </span>
        </Show>
    }
}
