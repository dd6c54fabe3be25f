//! Models
//!
//! Data structures matching the API's JSON.

mod recipe;
mod shopping;
mod variant;

pub use recipe::{note_text, Ingredient, Recipe, RecipeId};
pub use shopping::{
    item_key, AddToListRequest, Aggregate, AggregateResponse, Category, RecipeIdsResponse,
};
pub use variant::{
    AdaptOutcome, AdaptRequest, AdaptResponse, Alternative, DietKind, Variant, VariantType,
};
