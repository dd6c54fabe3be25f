//! Variant State Machine
//!
//! Pure state of one open recipe: the original, the cached variants, which
//! types are being requested, the pending alternatives choice and the active
//! tab. No I/O here; `RecipeView` drives it around gateway calls.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::ApiResult;
use crate::models::{AdaptOutcome, Alternative, Ingredient, Recipe, Variant, VariantType};

/// What the recipe view is showing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Original,
    Variant(VariantType),
}

/// Lifecycle of one variant type within the open recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptPhase {
    Absent,
    Requesting,
    Cached,
    NeedsChoice,
}

/// Alternatives offered for a type that could not be adapted
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChoice {
    pub variant_type: VariantType,
    pub alternatives: Vec<Alternative>,
}

/// Decision taken before any network call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStart {
    /// Type already cached; the active tab moved to it
    Switched,
    /// A request for this type is outstanding
    Busy,
    /// Caller must issue the request now
    Issue,
}

/// How a finished request changed the state
#[derive(Debug, Clone, PartialEq)]
pub enum AdaptResolution {
    Cached(VariantType),
    NeedsChoice(usize),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantState {
    pub recipe: Recipe,
    variants: Vec<Variant>,
    requesting: BTreeSet<VariantType>,
    pub choice: Option<PendingChoice>,
    pub active: Tab,
    /// Last adaptation failure, verbatim
    pub last_error: Option<String>,
    /// Last favorite/notes failure
    pub action_error: Option<String>,
    /// A favorite toggle is in flight
    pub favorite_pending: bool,
    pub show_original: bool,
}

impl VariantState {
    pub fn new(recipe: Recipe, variants: Vec<Variant>) -> Self {
        let mut state = Self {
            recipe,
            variants: Vec::new(),
            requesting: BTreeSet::new(),
            choice: None,
            active: Tab::Original,
            last_error: None,
            action_error: None,
            favorite_pending: false,
            show_original: false,
        };
        for variant in variants {
            state.insert_variant(variant);
        }
        state
    }

    /// Cached variants in the order they were obtained
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn variant(&self, variant_type: &VariantType) -> Option<&Variant> {
        self.variants.iter().find(|v| &v.variant_type == variant_type)
    }

    pub fn is_cached(&self, variant_type: &VariantType) -> bool {
        self.variant(variant_type).is_some()
    }

    pub fn is_requesting(&self, variant_type: &VariantType) -> bool {
        self.requesting.contains(variant_type)
    }

    pub fn phase(&self, variant_type: &VariantType) -> AdaptPhase {
        if self.is_requesting(variant_type) {
            AdaptPhase::Requesting
        } else if self.is_cached(variant_type) {
            AdaptPhase::Cached
        } else if self.choice.as_ref().is_some_and(|c| &c.variant_type == variant_type) {
            AdaptPhase::NeedsChoice
        } else {
            AdaptPhase::Absent
        }
    }

    // At most one variant per type: a newer one replaces the cached record.
    fn insert_variant(&mut self, variant: Variant) {
        match self.variants.iter_mut().find(|v| v.variant_type == variant.variant_type) {
            Some(slot) => *slot = variant,
            None => self.variants.push(variant),
        }
    }

    /// Start a plain adaptation request for `variant_type`
    pub fn begin_request(&mut self, variant_type: &VariantType) -> RequestStart {
        if self.is_cached(variant_type) {
            self.active = Tab::Variant(variant_type.clone());
            return RequestStart::Switched;
        }
        self.begin(variant_type)
    }

    /// Start a request driven by a chosen alternative
    pub fn begin_resolve(&mut self, variant_type: &VariantType) -> RequestStart {
        self.begin(variant_type)
    }

    fn begin(&mut self, variant_type: &VariantType) -> RequestStart {
        if !self.requesting.insert(variant_type.clone()) {
            return RequestStart::Busy;
        }
        self.last_error = None;
        RequestStart::Issue
    }

    /// Apply the response of a plain request
    pub fn finish_request(
        &mut self,
        variant_type: &VariantType,
        result: ApiResult<AdaptOutcome>,
    ) -> AdaptResolution {
        self.requesting.remove(variant_type);
        match result {
            Ok(AdaptOutcome::Adapted(variant)) => {
                if self.choice.as_ref().is_some_and(|c| &c.variant_type == variant_type) {
                    self.choice = None;
                }
                let cached = variant.variant_type.clone();
                self.insert_variant(variant);
                self.active = Tab::Variant(cached.clone());
                AdaptResolution::Cached(cached)
            }
            Ok(AdaptOutcome::Infeasible(alternatives)) => {
                let count = alternatives.len();
                self.choice = Some(PendingChoice {
                    variant_type: variant_type.clone(),
                    alternatives,
                });
                AdaptResolution::NeedsChoice(count)
            }
            Err(err) => {
                let message = err.message();
                self.last_error = Some(message.clone());
                AdaptResolution::Failed(message)
            }
        }
    }

    /// Apply the response of an alternative-driven request. The choice panel
    /// closes whatever the outcome.
    pub fn finish_resolve(
        &mut self,
        variant_type: &VariantType,
        result: ApiResult<AdaptOutcome>,
    ) -> AdaptResolution {
        let resolution = self.finish_request(variant_type, result);
        self.choice = None;
        resolution
    }

    pub fn dismiss_choice(&mut self) {
        self.choice = None;
    }

    /// Switch to the original or a cached variant. Unknown tabs are refused.
    pub fn switch_tab(&mut self, tab: Tab) -> bool {
        if let Tab::Variant(variant_type) = &tab {
            if !self.is_cached(variant_type) {
                return false;
            }
        }
        self.active = tab;
        true
    }

    /// Content for the active tab
    pub fn display(&self) -> DisplayedRecipe {
        let recipe = &self.recipe;
        let base = DisplayedRecipe {
            tab: Tab::Original,
            badge: "Oryginał".to_string(),
            title: recipe.title_pl.clone(),
            ingredients: labels(&recipe.ingredients_pl),
            steps: recipe.steps_pl.clone(),
            notes: recipe.notes.clone(),
            warnings: Vec::new(),
            substitutions: recipe.substitutions.clone(),
            tags: recipe.tags.clone(),
            created: recipe.created_label(),
            is_favorite: recipe.is_favorite,
            original: None,
        };

        match &self.active {
            Tab::Variant(variant_type) => match self.variant(variant_type) {
                Some(variant) => DisplayedRecipe {
                    tab: self.active.clone(),
                    badge: variant_type.label().to_string(),
                    title: variant.title_pl.clone(),
                    ingredients: labels(&variant.ingredients_pl),
                    steps: variant.steps_pl.clone(),
                    notes: variant.notes.clone(),
                    warnings: variant.warnings(),
                    substitutions: BTreeMap::new(),
                    ..base
                },
                None => base,
            },
            Tab::Original if self.show_original && !recipe.title_original.is_empty() => {
                DisplayedRecipe {
                    original: Some(OriginalSide {
                        title: recipe.title_original.clone(),
                        ingredients: labels(&recipe.ingredients_original),
                    }),
                    ..base
                }
            }
            Tab::Original => base,
        }
    }
}

fn labels(ingredients: &[Ingredient]) -> Vec<String> {
    ingredients.iter().map(Ingredient::label).collect()
}

/// Untranslated side shown next to the original tab
#[derive(Debug, Clone, PartialEq)]
pub struct OriginalSide {
    pub title: String,
    pub ingredients: Vec<String>,
}

/// Everything the recipe page renders. Content fields come from the active
/// record only; tags, date and favorite always come from the original recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedRecipe {
    pub tab: Tab,
    pub badge: String,
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub notes: BTreeMap<String, Value>,
    pub warnings: Vec<String>,
    pub substitutions: BTreeMap<String, String>,
    pub tags: Vec<String>,
    pub created: Option<String>,
    pub is_favorite: bool,
    pub original: Option<OriginalSide>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::models::DietKind;
    use crate::testing::{recipe, variant};

    fn vegan() -> VariantType {
        DietKind::Vegan.into()
    }

    #[test]
    fn test_cached_type_switches_without_issuing() {
        let mut state = VariantState::new(recipe(1, "Zupa"), vec![variant(1, "vegan", &["tofu"])]);
        assert_eq!(state.begin_request(&vegan()), RequestStart::Switched);
        assert_eq!(state.active, Tab::Variant(vegan()));
        assert_eq!(state.phase(&vegan()), AdaptPhase::Cached);
    }

    #[test]
    fn test_second_begin_while_requesting_is_busy() {
        let mut state = VariantState::new(recipe(1, "Zupa"), vec![]);
        assert_eq!(state.begin_request(&vegan()), RequestStart::Issue);
        assert_eq!(state.begin_request(&vegan()), RequestStart::Busy);
        assert_eq!(state.phase(&vegan()), AdaptPhase::Requesting);
        // Other types are independent
        assert_eq!(state.begin_request(&DietKind::Kosher.into()), RequestStart::Issue);
    }

    #[test]
    fn test_success_caches_and_activates() {
        let mut state = VariantState::new(recipe(1, "Zupa"), vec![]);
        state.begin_request(&vegan());
        let res = state.finish_request(&vegan(), Ok(AdaptOutcome::Adapted(variant(1, "vegan", &["1 cebula bez masła"]))));
        assert_eq!(res, AdaptResolution::Cached(vegan()));
        let shown = state.display();
        assert_eq!(shown.ingredients, vec!["1 cebula bez masła"]);
        assert_eq!(shown.steps, vec!["Krok wariantu."]);
        assert_eq!(shown.badge, "Wegański");
        // Recipe-level metadata stays with the original
        assert_eq!(shown.tags, vec!["zupa"]);
        assert_eq!(shown.created.as_deref(), Some("1 stycznia 2024"));
        assert!(shown.substitutions.is_empty());
    }

    #[test]
    fn test_failure_keeps_tab_and_cache() {
        let mut state = VariantState::new(recipe(1, "Zupa"), vec![]);
        state.begin_request(&vegan());
        let err = ApiError::Server { status: 502, detail: "OPENAI_API_KEY is not configured on the server.".into() };
        let res = state.finish_request(&vegan(), Err(err));
        assert_eq!(res, AdaptResolution::Failed("OPENAI_API_KEY is not configured on the server.".into()));
        assert_eq!(state.active, Tab::Original);
        assert!(state.variants().is_empty());
        assert_eq!(state.phase(&vegan()), AdaptPhase::Absent);
        // Retry is allowed and clears the old error
        assert_eq!(state.begin_request(&vegan()), RequestStart::Issue);
        assert_eq!(state.last_error, None);
    }

    #[test]
    fn test_infeasible_surfaces_choice_without_caching() {
        let mut state = VariantState::new(recipe(1, "Zupa"), vec![]);
        state.begin_request(&vegan());
        let alts = vec![Alternative { title: "Leczo".into(), instruction: "Zrób leczo".into(), reason: "r".into() }];
        let res = state.finish_request(&vegan(), Ok(AdaptOutcome::Infeasible(alts)));
        assert_eq!(res, AdaptResolution::NeedsChoice(1));
        assert_eq!(state.phase(&vegan()), AdaptPhase::NeedsChoice);
        assert!(state.variants().is_empty());
        assert_eq!(state.active, Tab::Original);
    }

    #[test]
    fn test_resolve_clears_choice_even_on_failure() {
        let mut state = VariantState::new(recipe(1, "Zupa"), vec![]);
        state.begin_request(&vegan());
        state.finish_request(&vegan(), Ok(AdaptOutcome::Infeasible(vec![])));
        assert_eq!(state.begin_resolve(&vegan()), RequestStart::Issue);
        state.finish_resolve(&vegan(), Err(ApiError::Transport("offline".into())));
        assert!(state.choice.is_none());
        assert!(state.last_error.is_some());
    }

    #[test]
    fn test_one_variant_per_type() {
        let mut state = VariantState::new(
            recipe(1, "Zupa"),
            vec![variant(1, "vegan", &["a"]), variant(1, "vegan", &["b"])],
        );
        assert_eq!(state.variants().len(), 1);
        assert_eq!(state.variants()[0].ingredients_pl[0].label(), "b");
        state.begin_resolve(&vegan());
        state.finish_resolve(&vegan(), Ok(AdaptOutcome::Adapted(variant(1, "vegan", &["c"]))));
        assert_eq!(state.variants().len(), 1);
    }

    #[test]
    fn test_switch_tab_refuses_uncached() {
        let mut state = VariantState::new(recipe(1, "Zupa"), vec![variant(1, "kosher", &["x"])]);
        assert!(!state.switch_tab(Tab::Variant(vegan())));
        assert!(state.switch_tab(Tab::Variant(DietKind::Kosher.into())));
        assert_eq!(state.display().ingredients, vec!["x"]);
        assert!(state.switch_tab(Tab::Original));
        assert_eq!(state.display().ingredients, vec!["500g pomidory", "1 sztuka cebula"]);
    }

    #[test]
    fn test_show_original_only_on_original_tab() {
        let mut state = VariantState::new(recipe(1, "Zupa"), vec![variant(1, "vegan", &["x"])]);
        state.show_original = true;
        assert_eq!(state.display().original.map(|o| o.title), Some("מרק עגבניות".to_string()));
        state.switch_tab(Tab::Variant(vegan()));
        assert!(state.display().original.is_none());
    }
}
