//! UI Components
//!
//! Leptos components over the core stores.

mod delete_confirm_button;
mod list_button;
mod navbar;
mod notice;
mod recipe_detail;
mod recipe_list;
mod shopping_list_panel;

pub use delete_confirm_button::DeleteConfirmButton;
pub use list_button::ListButton;
pub use navbar::Navbar;
pub use notice::Notice;
pub use recipe_detail::RecipeDetail;
pub use recipe_list::RecipeList;
pub use shopping_list_panel::ShoppingListPanel;
