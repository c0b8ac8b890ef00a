use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::recipe::Recipe;

/// Search filters applied by `RetrievalService::search`.
///
/// Empty or whitespace-only values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub recipe_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn recipe_type(mut self, recipe_type: impl Into<String>) -> Self {
        self.recipe_type = Some(recipe_type.into());
        self
    }

    pub fn ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.ingredient = Some(ingredient.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn region_value(&self) -> Option<&str> {
        non_blank(&self.region)
    }

    pub fn type_value(&self) -> Option<&str> {
        non_blank(&self.recipe_type)
    }

    pub fn ingredient_value(&self) -> Option<&str> {
        non_blank(&self.ingredient)
    }

    pub fn tag_value(&self) -> Option<&str> {
        non_blank(&self.tag)
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.region_value().is_none()
            && self.type_value().is_none()
            && self.ingredient_value().is_none()
            && self.tag_value().is_none()
    }

    /// All set fields ANDed: region and type equality, tag membership,
    /// case-insensitive ingredient substring.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(region) = self.region_value() {
            if recipe.region != region {
                return false;
            }
        }
        if let Some(recipe_type) = self.type_value() {
            if recipe.recipe_type != recipe_type {
                return false;
            }
        }
        if let Some(tag) = self.tag_value() {
            if !recipe.has_tag(tag) {
                return false;
            }
        }
        if let Some(ingredient) = self.ingredient_value() {
            if !recipe.has_ingredient(ingredient) {
                return false;
            }
        }
        true
    }

    /// Deterministic cache key for these filters plus a free-text query.
    ///
    /// Fields are emitted in sorted name order and unset fields are left out,
    /// so equal filters always map to the same key.
    pub fn cache_key(&self, query: &str) -> String {
        let mut fields = BTreeMap::new();
        if let Some(v) = self.ingredient_value() {
            fields.insert("ingredient", v);
        }
        if let Some(v) = self.region_value() {
            fields.insert("region", v);
        }
        if let Some(v) = self.tag_value() {
            fields.insert("tag", v);
        }
        if let Some(v) = self.type_value() {
            fields.insert("type", v);
        }

        // BTreeMap serializes in key order, with values escaped
        let filters = serde_json::to_string(&fields).unwrap_or_default();
        format!("{}|q={}", filters, query.trim())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
