//! Test Gateway
//!
//! In-memory `ApiGateway` that records every call, answers from scripted
//! state and can park a call until the test releases it.

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, VecDeque};
use tokio::sync::oneshot;

use crate::api::ApiGateway;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    AdaptOutcome, AdaptRequest, Aggregate, AggregateResponse, Ingredient, Recipe, RecipeId,
    Variant, VariantType,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    ListRecipes,
    FetchRecipe(RecipeId),
    FetchVariants(RecipeId),
    Adapt(RecipeId, String, Option<String>),
    SetFavorite(RecipeId, bool),
    SaveNotes(RecipeId, Option<String>),
    DeleteRecipe(RecipeId),
    ListIds,
    Add(RecipeId),
    Remove(RecipeId),
    Clear,
    Aggregate,
    Email,
}

#[derive(Default)]
pub(crate) struct MockGateway {
    calls: RefCell<Vec<Call>>,
    pub recipes: RefCell<HashMap<RecipeId, Recipe>>,
    pub variants: RefCell<HashMap<RecipeId, Vec<Variant>>>,
    pub list_ids: RefCell<BTreeSet<RecipeId>>,
    adapt_replies: RefCell<VecDeque<ApiResult<AdaptOutcome>>>,
    aggregate_replies: RefCell<VecDeque<ApiResult<Aggregate>>>,
    failures: RefCell<HashMap<&'static str, ApiError>>,
    gates: RefCell<HashMap<&'static str, VecDeque<oneshot::Receiver<()>>>>,
    parked: Cell<usize>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipe(self, recipe: Recipe) -> Self {
        self.recipes.borrow_mut().insert(recipe.id, recipe);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn reply_adapt(&self, reply: ApiResult<AdaptOutcome>) {
        self.adapt_replies.borrow_mut().push_back(reply);
    }

    pub fn reply_aggregate(&self, reply: ApiResult<Aggregate>) {
        self.aggregate_replies.borrow_mut().push_back(reply);
    }

    /// Next call of `op` fails with `err`
    pub fn fail_next(&self, op: &'static str, err: ApiError) {
        self.failures.borrow_mut().insert(op, err);
    }

    /// Next call of `op` waits until the returned sender fires (or drops)
    pub fn hold(&self, op: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().entry(op).or_default().push_back(rx);
        tx
    }

    /// Number of calls currently parked on a gate
    pub fn parked(&self) -> usize {
        self.parked.get()
    }

    async fn enter(&self, op: &'static str, call: Call) -> ApiResult<()> {
        self.calls.borrow_mut().push(call);
        let gate = self.gates.borrow_mut().get_mut(op).and_then(VecDeque::pop_front);
        match gate {
            Some(rx) => {
                self.parked.set(self.parked.get() + 1);
                let _ = rx.await;
                self.parked.set(self.parked.get() - 1);
            }
            None => tokio::task::yield_now().await,
        }
        match self.failures.borrow_mut().remove(op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn ids(&self) -> Vec<RecipeId> {
        self.list_ids.borrow().iter().copied().collect()
    }
}

#[async_trait(?Send)]
impl ApiGateway for MockGateway {
    async fn list_recipes(&self) -> ApiResult<Vec<Recipe>> {
        self.enter("list_recipes", Call::ListRecipes).await?;
        let mut recipes: Vec<Recipe> = self.recipes.borrow().values().cloned().collect();
        recipes.sort_by_key(|r| r.id);
        Ok(recipes)
    }

    async fn fetch_recipe(&self, id: RecipeId) -> ApiResult<Recipe> {
        self.enter("fetch_recipe", Call::FetchRecipe(id)).await?;
        self.recipes
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Recipe not found".into()))
    }

    async fn fetch_variants(&self, id: RecipeId) -> ApiResult<Vec<Variant>> {
        self.enter("fetch_variants", Call::FetchVariants(id)).await?;
        Ok(self.variants.borrow().get(&id).cloned().unwrap_or_default())
    }

    async fn adapt(&self, id: RecipeId, request: &AdaptRequest) -> ApiResult<AdaptOutcome> {
        // Reply is bound at call time so parked calls keep their own answer
        let reply = self.adapt_replies.borrow_mut().pop_front();
        let call = Call::Adapt(id, request.variant_type.to_string(), request.custom_title.clone());
        self.enter("adapt", call).await?;
        reply.unwrap_or_else(|| {
            Err(ApiError::Server {
                status: 500,
                detail: "no scripted reply".into(),
            })
        })
    }

    async fn set_favorite(&self, id: RecipeId, is_favorite: bool) -> ApiResult<Recipe> {
        self.enter("set_favorite", Call::SetFavorite(id, is_favorite)).await?;
        let mut recipes = self.recipes.borrow_mut();
        let recipe = recipes
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound("Recipe not found".into()))?;
        recipe.is_favorite = is_favorite;
        Ok(recipe.clone())
    }

    async fn save_notes(&self, id: RecipeId, user_notes: Option<&str>) -> ApiResult<Recipe> {
        let notes = user_notes.map(str::to_string);
        self.enter("save_notes", Call::SaveNotes(id, notes.clone())).await?;
        let mut recipes = self.recipes.borrow_mut();
        let recipe = recipes
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound("Recipe not found".into()))?;
        recipe.user_notes = notes;
        Ok(recipe.clone())
    }

    async fn delete_recipe(&self, id: RecipeId) -> ApiResult<()> {
        self.enter("delete_recipe", Call::DeleteRecipe(id)).await?;
        self.recipes.borrow_mut().remove(&id);
        self.list_ids.borrow_mut().remove(&id);
        Ok(())
    }

    async fn shopping_list_ids(&self) -> ApiResult<Vec<RecipeId>> {
        self.enter("list_ids", Call::ListIds).await?;
        Ok(self.ids())
    }

    async fn add_to_list(&self, id: RecipeId) -> ApiResult<Vec<RecipeId>> {
        self.enter("add", Call::Add(id)).await?;
        self.list_ids.borrow_mut().insert(id);
        Ok(self.ids())
    }

    async fn remove_from_list(&self, id: RecipeId) -> ApiResult<Vec<RecipeId>> {
        self.enter("remove", Call::Remove(id)).await?;
        self.list_ids.borrow_mut().remove(&id);
        Ok(self.ids())
    }

    async fn clear_list(&self) -> ApiResult<()> {
        self.enter("clear", Call::Clear).await?;
        self.list_ids.borrow_mut().clear();
        Ok(())
    }

    async fn aggregate(&self) -> ApiResult<Aggregate> {
        let reply = self.aggregate_replies.borrow_mut().pop_front();
        self.enter("aggregate", Call::Aggregate).await?;
        match reply {
            Some(reply) => reply,
            None => {
                let labels: Vec<String> = self.ids().iter().map(|id| format!("składnik {}", id)).collect();
                Ok(aggregate_of(serde_json::json!({ "Inne": labels })))
            }
        }
    }

    async fn email_list(&self) -> ApiResult<()> {
        self.enter("email", Call::Email).await
    }
}

// ========================
// Fixtures
// ========================

pub(crate) fn recipe(id: RecipeId, title: &str) -> Recipe {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title_pl": title,
        "title_original": "מרק עגבניות",
        "ingredients_pl": [
            {"amount": "500g", "name": "pomidory"},
            {"amount": "1 sztuka", "name": "cebula"}
        ],
        "steps_pl": ["Podsmaż cebulę.", "Dodaj pomidory."],
        "tags": ["zupa"],
        "notes": {"porcje": "4"},
        "created_at": "2024-01-01T00:00:00Z"
    }))
    .expect("valid recipe fixture")
}

pub(crate) fn variant(recipe_id: RecipeId, variant_type: &str, ingredients: &[&str]) -> Variant {
    Variant {
        id: None,
        recipe_id,
        variant_type: VariantType::from(variant_type.to_string()),
        title_pl: format!("Wariant {}", variant_type),
        ingredients_pl: ingredients.iter().map(|s| Ingredient::Plain(s.to_string())).collect(),
        steps_pl: vec!["Krok wariantu.".into()],
        notes: Default::default(),
        created_at: Some("2024-02-02T00:00:00Z".into()),
    }
}

/// Aggregate from a `{category: [labels]}` JSON object
pub(crate) fn aggregate_of(items: serde_json::Value) -> Aggregate {
    let response: AggregateResponse =
        serde_json::from_value(serde_json::json!({ "items": items })).expect("valid aggregate fixture");
    Aggregate::from_response(response)
}
