//! Application Context
//!
//! Session-wide core stores and navigation, provided via Leptos Context API.
//! The core stores are single-threaded, so they sit behind local stored values.

use std::rc::Rc;

use leptos::prelude::*;
use przepisy_core::library::RecipeLibrary;
use przepisy_core::models::RecipeId;
use przepisy_core::shopping::{ShoppingList, ShoppingPanel};
use przepisy_core::{ClientConfig, HttpGateway};

/// Which page the main area shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Recipes,
    Recipe(RecipeId),
}

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    api: StoredValue<Rc<HttpGateway>, LocalStorage>,
    list: StoredValue<Rc<ShoppingList>, LocalStorage>,
    panel: StoredValue<Rc<ShoppingPanel>, LocalStorage>,
    library: StoredValue<Rc<RecipeLibrary>, LocalStorage>,
    config: StoredValue<ClientConfig>,
    /// Current page - read
    pub page: ReadSignal<Page>,
    /// Current page - write
    set_page: WriteSignal<Page>,
}

impl AppContext {
    pub fn new(config: ClientConfig, page: (ReadSignal<Page>, WriteSignal<Page>)) -> Self {
        Self {
            api: StoredValue::new_local(Rc::new(HttpGateway::new(&config))),
            list: StoredValue::new_local(Rc::new(ShoppingList::new())),
            panel: StoredValue::new_local(Rc::new(ShoppingPanel::new(config.clone()))),
            library: StoredValue::new_local(Rc::new(RecipeLibrary::new())),
            config: StoredValue::new(config),
            page: page.0,
            set_page: page.1,
        }
    }

    pub fn api(&self) -> Rc<HttpGateway> {
        self.api.get_value()
    }

    pub fn list(&self) -> Rc<ShoppingList> {
        self.list.get_value()
    }

    pub fn panel(&self) -> Rc<ShoppingPanel> {
        self.panel.get_value()
    }

    pub fn library(&self) -> Rc<RecipeLibrary> {
        self.library.get_value()
    }

    pub fn config(&self) -> ClientConfig {
        self.config.get_value()
    }

    pub fn navigate(&self, page: Page) {
        self.set_page.set(page);
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
