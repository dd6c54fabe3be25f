//! Recipe Entity
//!
//! A translated recipe as the API returns it. Only `is_favorite` and
//! `user_notes` change after translation.

use chrono::{DateTime, Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub type RecipeId = u32;

/// One ingredient line. The API sends either a bare string or `{amount, name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ingredient {
    Plain(String),
    Structured {
        #[serde(default)]
        amount: Option<String>,
        #[serde(default)]
        name: String,
    },
}

impl Ingredient {
    /// Display label, the only place the two shapes are told apart
    pub fn label(&self) -> String {
        match self {
            Ingredient::Plain(text) => text.clone(),
            Ingredient::Structured { amount, name } => {
                format!("{} {}", amount.as_deref().unwrap_or(""), name).trim().to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    #[serde(default)]
    pub title_original: String,
    pub title_pl: String,
    #[serde(default)]
    pub ingredients_pl: Vec<Ingredient>,
    #[serde(default)]
    pub ingredients_original: Vec<Ingredient>,
    #[serde(default)]
    pub steps_pl: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub substitutions: BTreeMap<String, String>,
    #[serde(default)]
    pub notes: BTreeMap<String, Value>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub user_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Recipe {
    /// Translation still running: nothing to show yet
    pub fn is_pending(&self) -> bool {
        self.ingredients_pl.is_empty() && self.steps_pl.is_empty()
    }

    /// Creation date as "1 stycznia 2024"
    pub fn created_label(&self) -> Option<String> {
        self.created_at.as_deref().and_then(polish_date)
    }
}

/// Render a note value: strings verbatim, lists joined, anything else as JSON.
pub fn note_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(note_text).collect::<Vec<_>>().join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

const MONTHS_GENITIVE: [&str; 12] = [
    "stycznia", "lutego", "marca", "kwietnia", "maja", "czerwca",
    "lipca", "sierpnia", "września", "października", "listopada", "grudnia",
];

fn polish_date(raw: &str) -> Option<String> {
    // Server timestamps come with or without an offset
    let naive = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()?;
    let month = MONTHS_GENITIVE[naive.month0() as usize];
    Some(format!("{} {} {}", naive.day(), month, naive.year()))
}
