//! HTTP Gateway
//!
//! `ApiGateway` over reqwest. On wasm32 reqwest drives the browser's fetch.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;

use super::ApiGateway;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    AdaptOutcome, AdaptRequest, AdaptResponse, AddToListRequest, Aggregate, AggregateResponse,
    Recipe, RecipeId, RecipeIdsResponse, Variant,
};

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
struct FavoriteArgs {
    is_favorite: bool,
}

#[derive(Serialize)]
struct NotesArgs<'a> {
    user_notes: Option<&'a str>,
}

#[derive(Serialize)]
struct EmptyArgs {}

pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: RefCell<Option<String>>,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: RefCell::new(None),
        }
    }

    /// Bearer credential from the session layer; `None` after sign-out
    pub fn set_token(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue a request; `Ok(None)` for 204, the raw body otherwise.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<Option<String>> {
        debug!("{} {}", method, path);
        let mut builder = self.client.request(method.clone(), self.url(path));
        let token = self.token.borrow().clone();
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            let err = ApiError::from_status(status.as_u16(), &text);
            warn!("{} {} failed: {}", method, path, err);
            return Err(err);
        }
        Ok(Some(text))
    }

    async fn json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let text = self
            .send(method, path, body)
            .await?
            .ok_or_else(|| ApiError::Decode(format!("empty response from {}", path)))?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.json(Method::GET, path, None::<&EmptyArgs>).await
    }

    /// For endpoints whose body, if any, is ignored
    async fn call<B: Serialize>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<()> {
        self.send(method, path, body).await.map(|_| ())
    }
}

#[async_trait(?Send)]
impl ApiGateway for HttpGateway {
    async fn list_recipes(&self) -> ApiResult<Vec<Recipe>> {
        self.get("/recipes/").await
    }

    async fn fetch_recipe(&self, id: RecipeId) -> ApiResult<Recipe> {
        self.get(&format!("/recipes/{}", id)).await
    }

    async fn fetch_variants(&self, id: RecipeId) -> ApiResult<Vec<Variant>> {
        self.get(&format!("/recipes/{}/variants", id)).await
    }

    async fn adapt(&self, id: RecipeId, request: &AdaptRequest) -> ApiResult<AdaptOutcome> {
        let response: AdaptResponse = self
            .json(Method::POST, &format!("/recipes/{}/adapt", id), Some(request))
            .await?;
        response.into_outcome()
    }

    async fn set_favorite(&self, id: RecipeId, is_favorite: bool) -> ApiResult<Recipe> {
        let args = FavoriteArgs { is_favorite };
        self.json(Method::PATCH, &format!("/recipes/{}/favorite", id), Some(&args))
            .await
    }

    async fn save_notes(&self, id: RecipeId, user_notes: Option<&str>) -> ApiResult<Recipe> {
        let args = NotesArgs { user_notes };
        self.json(Method::PATCH, &format!("/recipes/{}/notes", id), Some(&args))
            .await
    }

    async fn delete_recipe(&self, id: RecipeId) -> ApiResult<()> {
        self.call(Method::DELETE, &format!("/recipes/{}", id), None::<&EmptyArgs>)
            .await
    }

    async fn shopping_list_ids(&self) -> ApiResult<Vec<RecipeId>> {
        let response: RecipeIdsResponse = self.get("/shopping-list/recipes").await?;
        Ok(response.recipe_ids)
    }

    async fn add_to_list(&self, id: RecipeId) -> ApiResult<Vec<RecipeId>> {
        let args = AddToListRequest { recipe_id: id };
        let response: RecipeIdsResponse = self
            .json(Method::POST, "/shopping-list/add", Some(&args))
            .await?;
        Ok(response.recipe_ids)
    }

    async fn remove_from_list(&self, id: RecipeId) -> ApiResult<Vec<RecipeId>> {
        let response: RecipeIdsResponse = self
            .json(
                Method::DELETE,
                &format!("/shopping-list/remove/{}", id),
                None::<&EmptyArgs>,
            )
            .await?;
        Ok(response.recipe_ids)
    }

    async fn clear_list(&self) -> ApiResult<()> {
        self.call(Method::DELETE, "/shopping-list/clear", None::<&EmptyArgs>)
            .await
    }

    async fn aggregate(&self) -> ApiResult<Aggregate> {
        let response: AggregateResponse = self.get("/shopping-list/").await?;
        Ok(Aggregate::from_response(response))
    }

    async fn email_list(&self) -> ApiResult<()> {
        self.call(Method::POST, "/shopping-list/email", Some(&EmptyArgs {}))
            .await
    }
}
