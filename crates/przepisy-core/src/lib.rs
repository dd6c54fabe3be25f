//! Przepisy Client State Core
//!
//! Layered like the app it serves:
//! - models: wire entities shared with the API
//! - api: the gateway seam and its HTTP implementation
//! - variants: per-recipe variant cache and adaptation state machine
//! - shopping: session-wide shopping list, aggregate panel and checklist
//! - library: recipe list with favorites filter and delete

pub mod api;
pub mod config;
pub mod error;
pub mod flash;
pub mod library;
pub mod models;
pub mod observable;
pub mod shopping;
pub mod variants;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiGateway, HttpGateway};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use observable::Observable;
