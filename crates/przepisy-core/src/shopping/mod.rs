//! Shopping List
//!
//! Session-wide list of recipes, the aggregated panel over it and the
//! per-panel checklist.

pub mod checklist;
pub mod ids;
pub mod list;
pub mod panel;

pub use checklist::{progress_percent, Checklist};
pub use ids::{apply_add, apply_remove, replace_ids, RecipeIds};
pub use list::{ListAction, ListNotice, ListSnapshot, ShoppingList, ALREADY_ON_LIST};
pub use panel::{EmailSend, EmailStatus, Fetch, PanelState, ShoppingPanel};
