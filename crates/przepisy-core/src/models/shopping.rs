//! Shopping List Entities
//!
//! Wire shapes for the shopping-list endpoints and the categorized aggregate.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::recipe::RecipeId;

/// Fixed aisle categories, declared in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Produce,
    Dairy,
    MeatFish,
    SpicesSauces,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Produce,
        Category::Dairy,
        Category::MeatFish,
        Category::SpicesSauces,
        Category::Other,
    ];

    /// Name used by the API and shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Category::Produce => "Warzywa i owoce",
            Category::Dairy => "Nabiał",
            Category::MeatFish => "Mięso i ryby",
            Category::SpicesSauces => "Przyprawy i sosy",
            Category::Other => "Inne",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Produce => "🥦",
            Category::Dairy => "🧀",
            Category::MeatFish => "🥩",
            Category::SpicesSauces => "🫙",
            Category::Other => "🛒",
        }
    }

    /// Unknown labels land in `Other`
    pub fn from_label(label: &str) -> Self {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .unwrap_or(Category::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIdsResponse {
    pub recipe_ids: Vec<RecipeId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddToListRequest {
    pub recipe_id: RecipeId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateResponse {
    #[serde(default)]
    pub items: HashMap<String, Vec<String>>,
}

/// Checklist key of one aggregate row: `"{category}::{index}"`
pub fn item_key(category: Category, index: usize) -> String {
    format!("{}::{}", category.label(), index)
}

/// Merged ingredient labels grouped by category, as computed by the server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    items: BTreeMap<Category, Vec<String>>,
}

impl Aggregate {
    pub fn from_response(response: AggregateResponse) -> Self {
        let mut items: BTreeMap<Category, Vec<String>> = BTreeMap::new();
        // Sort by label so merging unknown categories into Other is deterministic
        let mut raw: Vec<(String, Vec<String>)> = response.items.into_iter().collect();
        raw.sort_by(|a, b| a.0.cmp(&b.0));
        for (label, labels) in raw {
            items.entry(Category::from_label(&label)).or_default().extend(labels);
        }
        items.retain(|_, labels| !labels.is_empty());
        Self { items }
    }

    /// Rows of one category, empty when absent
    pub fn category(&self, category: Category) -> &[String] {
        self.items.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty categories in display order
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.items.iter().map(|(c, labels)| (*c, labels.as_slice()))
    }

    pub fn total_items(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }

    /// Every checklist key of this aggregate
    pub fn keys(&self) -> Vec<String> {
        self.categories()
            .flat_map(|(c, labels)| (0..labels.len()).map(move |i| item_key(c, i)))
            .collect()
    }
}
