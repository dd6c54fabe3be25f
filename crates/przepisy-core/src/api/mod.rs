//! API Gateway
//!
//! The seam between the state core and the server. Stores take a
//! `&dyn ApiGateway` per call so tests can script responses.

mod http;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{AdaptOutcome, AdaptRequest, Aggregate, Recipe, RecipeId, Variant};

pub use http::HttpGateway;

/// One method per server operation. Futures are `?Send`: everything runs on
/// the single UI thread.
#[async_trait(?Send)]
pub trait ApiGateway {
    // ========================
    // Recipes
    // ========================

    async fn list_recipes(&self) -> ApiResult<Vec<Recipe>>;

    async fn fetch_recipe(&self, id: RecipeId) -> ApiResult<Recipe>;

    async fn fetch_variants(&self, id: RecipeId) -> ApiResult<Vec<Variant>>;

    async fn adapt(&self, id: RecipeId, request: &AdaptRequest) -> ApiResult<AdaptOutcome>;

    async fn set_favorite(&self, id: RecipeId, is_favorite: bool) -> ApiResult<Recipe>;

    async fn save_notes(&self, id: RecipeId, user_notes: Option<&str>) -> ApiResult<Recipe>;

    async fn delete_recipe(&self, id: RecipeId) -> ApiResult<()>;

    // ========================
    // Shopping list
    // ========================

    async fn shopping_list_ids(&self) -> ApiResult<Vec<RecipeId>>;

    async fn add_to_list(&self, id: RecipeId) -> ApiResult<Vec<RecipeId>>;

    async fn remove_from_list(&self, id: RecipeId) -> ApiResult<Vec<RecipeId>>;

    async fn clear_list(&self) -> ApiResult<()>;

    async fn aggregate(&self) -> ApiResult<Aggregate>;

    async fn email_list(&self) -> ApiResult<()>;
}
