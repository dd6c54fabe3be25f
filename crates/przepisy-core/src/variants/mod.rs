//! Recipe Variants
//!
//! Per-recipe cache of diet-adapted variants and the state machine that
//! generates them on demand.

mod machine;
mod view;

pub use machine::{
    AdaptPhase, AdaptResolution, DisplayedRecipe, OriginalSide, PendingChoice, RequestStart, Tab,
    VariantState,
};
pub use view::{RecipeView, VariantRequest};
