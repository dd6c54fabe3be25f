//! Session Wiring
//!
//! API location, bearer token and the sign-in/out hooks of the core stores.
//! Login itself lives outside this app; it leaves the token in local storage.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;
use przepisy_core::ClientConfig;

use crate::context::AppContext;

const TOKEN_KEY: &str = "token";

/// Base URL from the build environment, `/api` otherwise
pub fn client_config() -> ClientConfig {
    match option_env!("PRZEPISY_API_URL") {
        Some(url) if !url.is_empty() => ClientConfig::with_base_url(url),
        _ => ClientConfig::default(),
    }
}

fn storage() -> Option<web_sys::Storage> {
    window().local_storage().ok().flatten()
}

pub fn stored_token() -> Option<String> {
    storage()?
        .get_item(TOKEN_KEY)
        .ok()
        .flatten()
        .filter(|t| !t.is_empty())
}

/// Attach the stored token and load the shopping list.
pub fn start(ctx: AppContext) {
    let token = stored_token();
    if token.is_none() {
        warn!("No session token in local storage; requests go out unauthenticated");
    }
    ctx.api().set_token(token);

    let api = ctx.api();
    let list = ctx.list();
    spawn_local(async move {
        list.sign_in(&*api).await;
    });
}

/// Forget the token and everything loaded for the previous user.
pub fn sign_out(ctx: AppContext) {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(TOKEN_KEY);
    }
    ctx.api().set_token(None);
    ctx.list().sign_out();
    ctx.library().reset();
    ctx.navigate(crate::context::Page::Recipes);
}
