//! Recipe View Store
//!
//! One instance per open recipe page. Wraps `VariantState` in an observable
//! cell and runs the gateway calls around each transition. Once closed, late
//! responses are dropped instead of applied.

use log::{debug, info, warn};
use std::cell::Cell;

use super::machine::{AdaptResolution, DisplayedRecipe, RequestStart, Tab, VariantState};
use crate::api::ApiGateway;
use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::flash::{FlashStatus, RevertTicket};
use crate::models::{AdaptRequest, Alternative, Recipe, RecipeId, Variant, VariantType};
use crate::observable::Observable;

/// What a variant request ended in
#[derive(Debug, Clone, PartialEq)]
pub enum VariantRequest {
    /// Already cached: only the tab changed, no call was made
    Switched,
    /// A request for this type is already outstanding; nothing issued
    InFlight,
    Adapted(VariantType),
    /// Adapter offered this many alternatives instead
    NeedsChoice(usize),
    Failed(String),
    /// The view was closed before the response arrived
    Discarded,
}

impl From<AdaptResolution> for VariantRequest {
    fn from(resolution: AdaptResolution) -> Self {
        match resolution {
            AdaptResolution::Cached(t) => VariantRequest::Adapted(t),
            AdaptResolution::NeedsChoice(n) => VariantRequest::NeedsChoice(n),
            AdaptResolution::Failed(msg) => VariantRequest::Failed(msg),
        }
    }
}

pub struct RecipeView {
    state: Observable<VariantState>,
    closed: Cell<bool>,
    notes_saved: FlashStatus<bool>,
    config: ClientConfig,
}

impl RecipeView {
    pub fn new(recipe: Recipe, variants: Vec<Variant>, config: ClientConfig) -> Self {
        Self {
            state: Observable::new(VariantState::new(recipe, variants)),
            closed: Cell::new(false),
            notes_saved: FlashStatus::new(),
            config,
        }
    }

    /// Fetch the recipe and its stored variants. A missing recipe is an
    /// error; missing variants are not.
    pub async fn load(api: &dyn ApiGateway, id: RecipeId, config: ClientConfig) -> ApiResult<Self> {
        let recipe = api.fetch_recipe(id).await?;
        let variants = match api.fetch_variants(id).await {
            Ok(variants) => variants,
            Err(e) => {
                warn!("Variants for recipe {} unavailable: {}", id, e);
                Vec::new()
            }
        };
        info!("Opened recipe {} with {} cached variants", id, variants.len());
        Ok(Self::new(recipe, variants, config))
    }

    pub fn id(&self) -> RecipeId {
        self.state.with(|s| s.recipe.id)
    }

    pub fn state(&self) -> &Observable<VariantState> {
        &self.state
    }

    pub fn snapshot(&self) -> VariantState {
        self.state.get()
    }

    pub fn display(&self) -> DisplayedRecipe {
        self.state.with(VariantState::display)
    }

    pub fn notes_saved(&self) -> &FlashStatus<bool> {
        &self.notes_saved
    }

    /// Stop applying responses; call when the page goes away
    pub fn close(&self) {
        self.closed.set(true);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    // ========================
    // Adaptation
    // ========================

    /// Show `variant_type`, generating it first if it is not cached yet.
    pub async fn request_variant(&self, api: &dyn ApiGateway, variant_type: VariantType) -> VariantRequest {
        match self.state.update(|s| s.begin_request(&variant_type)) {
            RequestStart::Switched => return VariantRequest::Switched,
            RequestStart::Busy => return VariantRequest::InFlight,
            RequestStart::Issue => {}
        }
        debug!("Adapting recipe {} to {}", self.id(), variant_type);
        let result = api.adapt(self.id(), &AdaptRequest::new(variant_type.clone())).await;
        if self.closed.get() {
            return VariantRequest::Discarded;
        }
        self.state.update(|s| s.finish_request(&variant_type, result)).into()
    }

    /// Retry `variant_type` with the instruction of a chosen alternative.
    pub async fn resolve_alternative(
        &self,
        api: &dyn ApiGateway,
        variant_type: VariantType,
        alternative: &Alternative,
    ) -> VariantRequest {
        if self.state.update(|s| s.begin_resolve(&variant_type)) == RequestStart::Busy {
            return VariantRequest::InFlight;
        }
        debug!("Adapting recipe {} via alternative {:?}", self.id(), alternative.title);
        let request = AdaptRequest::from_alternative(variant_type.clone(), alternative);
        let result = api.adapt(self.id(), &request).await;
        if self.closed.get() {
            return VariantRequest::Discarded;
        }
        self.state.update(|s| s.finish_resolve(&variant_type, result)).into()
    }

    pub fn switch_tab(&self, tab: Tab) -> bool {
        self.state.update(|s| s.switch_tab(tab))
    }

    pub fn dismiss_choice(&self) {
        self.state.update(VariantState::dismiss_choice);
    }

    pub fn toggle_show_original(&self) {
        self.state.update(|s| s.show_original = !s.show_original);
    }

    // ========================
    // Favorite & Notes (original recipe only)
    // ========================

    /// Flip the favorite flag. Returns the new value, or `None` when a toggle
    /// was already running or the call failed.
    pub async fn toggle_favorite(&self, api: &dyn ApiGateway) -> Option<bool> {
        let target = self.state.update(|s| {
            if s.favorite_pending {
                return None;
            }
            s.favorite_pending = true;
            Some(!s.recipe.is_favorite)
        })?;
        let result = api.set_favorite(self.id(), target).await;
        if self.closed.get() {
            return None;
        }
        match result {
            Ok(recipe) => {
                let value = recipe.is_favorite;
                self.state.update(|s| s.favorite_pending = false);
                self.apply_recipe(recipe);
                Some(value)
            }
            Err(e) => {
                warn!("Favorite toggle for recipe {} failed: {}", self.id(), e);
                self.state.update(|s| {
                    s.favorite_pending = false;
                    s.action_error = Some(e.message());
                });
                None
            }
        }
    }

    /// Save the free-text notes. Blank text clears them. On success returns
    /// the ticket that hides the "saved" marker.
    pub async fn save_notes(&self, api: &dyn ApiGateway, text: &str) -> Option<RevertTicket> {
        let notes = if text.trim().is_empty() { None } else { Some(text) };
        let result = api.save_notes(self.id(), notes).await;
        if self.closed.get() {
            return None;
        }
        match result {
            Ok(recipe) => {
                self.apply_recipe(recipe);
                Some(self.notes_saved.show_for(true, self.config.notes_saved_window()))
            }
            Err(e) => {
                self.state.update(|s| s.action_error = Some(e.message()));
                None
            }
        }
    }

    // Only user-owned fields move; translated content is immutable.
    fn apply_recipe(&self, recipe: Recipe) {
        self.state.update(|s| {
            s.recipe.is_favorite = recipe.is_favorite;
            s.recipe.user_notes = recipe.user_notes;
            s.action_error = None;
        });
    }
}
