//! Recipe Library
//!
//! The user's recipes as shown on the list page, with the favorites filter.
//! Deleting a recipe also evicts it from the shopping list.

use log::{info, warn};
use std::collections::BTreeSet;

use crate::api::ApiGateway;
use crate::models::{Recipe, RecipeId};
use crate::observable::Observable;
use crate::shopping::ShoppingList;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LibraryFilter {
    #[default]
    All,
    Favorites,
}

impl LibraryFilter {
    pub fn label(&self) -> &'static str {
        match self {
            LibraryFilter::All => "Wszystkie",
            LibraryFilter::Favorites => "★ Ulubione",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            LibraryFilter::All => "Brak przepisów",
            LibraryFilter::Favorites => "Brak ulubionych przepisów",
        }
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            LibraryFilter::All => true,
            LibraryFilter::Favorites => recipe.is_favorite,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibraryState {
    pub recipes: Vec<Recipe>,
    pub filter: LibraryFilter,
    pub loading: bool,
    pub error: Option<String>,
    /// Ids with a favorite toggle or delete in flight
    pub pending: BTreeSet<RecipeId>,
}

impl Default for LibraryState {
    fn default() -> Self {
        Self {
            recipes: Vec::new(),
            filter: LibraryFilter::All,
            loading: true,
            error: None,
            pending: BTreeSet::new(),
        }
    }
}

impl LibraryState {
    pub fn visible(&self) -> Vec<Recipe> {
        self.recipes.iter().filter(|r| self.filter.matches(r)).cloned().collect()
    }

    pub fn recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }
}

#[derive(Default)]
pub struct RecipeLibrary {
    state: Observable<LibraryState>,
}

impl RecipeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Observable<LibraryState> {
        &self.state
    }

    pub fn snapshot(&self) -> LibraryState {
        self.state.get()
    }

    pub fn visible(&self) -> Vec<Recipe> {
        self.state.with(LibraryState::visible)
    }

    pub fn set_filter(&self, filter: LibraryFilter) {
        self.state.update(|s| s.filter = filter);
    }

    pub async fn load(&self, api: &dyn ApiGateway) -> bool {
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = api.list_recipes().await;
        self.state.update(|s| {
            s.loading = false;
            match result {
                Ok(recipes) => {
                    info!("Loaded {} recipes", recipes.len());
                    s.recipes = recipes;
                    true
                }
                Err(e) => {
                    warn!("Failed to load recipes: {}", e);
                    s.error = Some(e.message());
                    false
                }
            }
        })
    }

    /// Forget the previous user's recipes; the next `load` fills them again
    pub fn reset(&self) {
        self.state.set(LibraryState::default());
    }

    fn begin(&self, id: RecipeId) -> bool {
        self.state.update(|s| s.pending.insert(id))
    }

    pub async fn toggle_favorite(&self, api: &dyn ApiGateway, id: RecipeId) -> Option<bool> {
        let current = self.state.with(|s| s.recipe(id).map(|r| r.is_favorite))?;
        if !self.begin(id) {
            return None;
        }
        let result = api.set_favorite(id, !current).await;
        self.state.update(|s| {
            s.pending.remove(&id);
            match result {
                Ok(updated) => {
                    let value = updated.is_favorite;
                    if let Some(slot) = s.recipes.iter_mut().find(|r| r.id == updated.id) {
                        *slot = updated;
                    }
                    Some(value)
                }
                Err(e) => {
                    warn!("Favorite toggle for recipe {} failed: {}", id, e);
                    s.error = Some(e.message());
                    None
                }
            }
        })
    }

    /// Delete after the user confirmed. On success the recipe leaves both
    /// the library and the shopping list.
    pub async fn delete_recipe(&self, api: &dyn ApiGateway, list: &ShoppingList, id: RecipeId) -> bool {
        if !self.begin(id) {
            return false;
        }
        let result = api.delete_recipe(id).await;
        let deleted = self.state.update(|s| {
            s.pending.remove(&id);
            match result {
                Ok(()) => {
                    s.recipes.retain(|r| r.id != id);
                    true
                }
                Err(e) => {
                    warn!("Failed to delete recipe {}: {}", id, e);
                    s.error = Some(e.message());
                    false
                }
            }
        });
        if deleted {
            info!("Deleted recipe {}", id);
            list.evict(id);
        }
        deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::testing::{recipe, Call, MockGateway};

    fn api_with(ids: &[RecipeId]) -> MockGateway {
        let api = MockGateway::new();
        for id in ids {
            api.recipes.borrow_mut().insert(*id, recipe(*id, &format!("Przepis {}", id)));
        }
        api
    }

    #[tokio::test]
    async fn test_load_and_filter() {
        let api = api_with(&[1, 2, 3]);
        api.recipes.borrow_mut().get_mut(&2).unwrap().is_favorite = true;
        let library = RecipeLibrary::new();
        assert!(library.snapshot().loading);

        assert!(library.load(&api).await);
        assert!(!library.snapshot().loading);
        assert_eq!(library.visible().len(), 3);

        library.set_filter(LibraryFilter::Favorites);
        let visible: Vec<RecipeId> = library.visible().iter().map(|r| r.id).collect();
        assert_eq!(visible, vec![2]);
    }

    #[tokio::test]
    async fn test_load_failure_sets_error() {
        let api = api_with(&[]);
        api.fail_next("list_recipes", ApiError::Transport("offline".into()));
        let library = RecipeLibrary::new();
        assert!(!library.load(&api).await);
        assert_eq!(library.snapshot().error.as_deref(), Some(crate::error::CONNECTION_FAILED));
    }

    #[tokio::test]
    async fn test_toggle_favorite_replaces_recipe() {
        let api = api_with(&[1]);
        let library = RecipeLibrary::new();
        library.load(&api).await;

        assert_eq!(library.toggle_favorite(&api, 1).await, Some(true));
        assert!(library.snapshot().recipe(1).unwrap().is_favorite);
        assert_eq!(library.toggle_favorite(&api, 1).await, Some(false));
        assert_eq!(api.count(|c| matches!(c, Call::SetFavorite(1, _))), 2);
        assert_eq!(library.toggle_favorite(&api, 99).await, None);
    }

    #[tokio::test]
    async fn test_delete_evicts_from_shopping_list() {
        let api = api_with(&[1, 2]);
        api.list_ids.borrow_mut().extend([1, 2]);
        let library = RecipeLibrary::new();
        let list = ShoppingList::new();
        library.load(&api).await;
        list.sign_in(&api).await;

        assert!(library.delete_recipe(&api, &list, 1).await);
        assert!(library.snapshot().recipe(1).is_none());
        assert!(!list.is_in_list(1));
        assert!(list.is_in_list(2));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_everything() {
        let api = api_with(&[1]);
        api.list_ids.borrow_mut().insert(1);
        let library = RecipeLibrary::new();
        let list = ShoppingList::new();
        library.load(&api).await;
        list.sign_in(&api).await;
        api.fail_next("delete_recipe", ApiError::Server { status: 500, detail: "boom".into() });

        assert!(!library.delete_recipe(&api, &list, 1).await);
        assert!(library.snapshot().recipe(1).is_some());
        assert!(list.is_in_list(1));
        assert_eq!(library.snapshot().error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_reset_forgets_recipes() {
        let api = api_with(&[1, 2]);
        let library = RecipeLibrary::new();
        library.load(&api).await;
        library.set_filter(LibraryFilter::Favorites);

        library.reset();
        let state = library.snapshot();
        assert!(state.recipes.is_empty());
        assert_eq!(state.filter, LibraryFilter::All);
        assert!(state.loading);
    }
}
