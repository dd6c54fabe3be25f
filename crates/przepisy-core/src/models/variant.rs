//! Variant Entities
//!
//! Diet-adapted renditions of a recipe and the adapt request/response shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::recipe::{note_text, Ingredient, RecipeId};
use crate::error::{ApiError, ApiResult};

/// Fixed diets the adapt endpoint understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DietKind {
    Vegetarian,
    Vegan,
    DairyFree,
    GlutenFree,
    Kosher,
}

impl DietKind {
    pub const ALL: [DietKind; 5] = [
        DietKind::Vegetarian,
        DietKind::Vegan,
        DietKind::DairyFree,
        DietKind::GlutenFree,
        DietKind::Kosher,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DietKind::Vegetarian => "vegetarian",
            DietKind::Vegan => "vegan",
            DietKind::DairyFree => "dairy_free",
            DietKind::GlutenFree => "gluten_free",
            DietKind::Kosher => "kosher",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        DietKind::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DietKind::Vegetarian => "Wegetariański",
            DietKind::Vegan => "Wegański",
            DietKind::DairyFree => "Bez nabiału",
            DietKind::GlutenFree => "Bez glutenu",
            DietKind::Kosher => "Koszerny",
        }
    }
}

/// Key of a variant within its recipe. Serialized as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VariantType {
    Diet(DietKind),
    /// Free-form adaptation born from an alternative suggestion
    Custom(String),
}

impl VariantType {
    pub fn as_str(&self) -> &str {
        match self {
            VariantType::Diet(kind) => kind.as_str(),
            VariantType::Custom(name) => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            VariantType::Diet(kind) => kind.label(),
            VariantType::Custom(name) => name,
        }
    }
}

impl From<String> for VariantType {
    fn from(s: String) -> Self {
        match DietKind::parse(&s) {
            Some(kind) => VariantType::Diet(kind),
            None => VariantType::Custom(s),
        }
    }
}

impl From<VariantType> for String {
    fn from(t: VariantType) -> Self {
        t.as_str().to_string()
    }
}

impl From<DietKind> for VariantType {
    fn from(kind: DietKind) -> Self {
        VariantType::Diet(kind)
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub id: Option<u32>,
    pub recipe_id: RecipeId,
    pub variant_type: VariantType,
    pub title_pl: String,
    #[serde(default)]
    pub ingredients_pl: Vec<Ingredient>,
    #[serde(default)]
    pub steps_pl: Vec<String>,
    #[serde(default)]
    pub notes: BTreeMap<String, Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Variant {
    /// Warning strings the adapter attached to this variant
    pub fn warnings(&self) -> Vec<String> {
        ["ostrzeżenia", "warnings"]
            .iter()
            .filter_map(|key| self.notes.get(*key))
            .flat_map(|value| match value {
                Value::Array(items) => items.iter().map(note_text).collect(),
                Value::String(s) if !s.is_empty() => vec![s.clone()],
                _ => Vec::new(),
            })
            .filter(|w| !w.is_empty())
            .collect()
    }
}

/// A fallback the server offers when a diet cannot be met
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub title: String,
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub reason: String,
}

impl Alternative {
    /// Instruction sent back to the adapter; the title stands in when empty.
    pub fn instruction_or_title(&self) -> &str {
        if self.instruction.trim().is_empty() {
            &self.title
        } else {
            &self.instruction
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdaptRequest {
    pub variant_type: VariantType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_title: Option<String>,
}

impl AdaptRequest {
    pub fn new(variant_type: VariantType) -> Self {
        Self {
            variant_type,
            custom_instruction: None,
            custom_title: None,
        }
    }

    pub fn from_alternative(variant_type: VariantType, alternative: &Alternative) -> Self {
        Self {
            variant_type,
            custom_instruction: Some(alternative.instruction_or_title().to_string()),
            custom_title: Some(alternative.title.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdaptResponse {
    pub can_adapt: bool,
    #[serde(default)]
    pub variant: Option<Variant>,
    #[serde(default)]
    pub alternatives: Option<Vec<Alternative>>,
}

/// Result of one adaptation attempt. Never stored past the interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum AdaptOutcome {
    Adapted(Variant),
    Infeasible(Vec<Alternative>),
}

impl AdaptResponse {
    pub fn into_outcome(self) -> ApiResult<AdaptOutcome> {
        if self.can_adapt {
            self.variant
                .map(AdaptOutcome::Adapted)
                .ok_or_else(|| ApiError::Decode("can_adapt without variant".to_string()))
        } else {
            Ok(AdaptOutcome::Infeasible(self.alternatives.unwrap_or_default()))
        }
    }
}
