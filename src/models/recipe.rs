use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recipe as returned by a gateway.
///
/// Recipes are immutable once built; the cache, the recent-views queue and
/// every service result share them through `Arc<Recipe>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Stable identifier for the lifetime of the corpus
    pub id: u64,

    pub title: String,

    /// Cuisine or area (e.g. "Indian")
    #[serde(default)]
    pub region: String,

    /// Dish category (e.g. "Dessert")
    #[serde(rename = "type", default)]
    pub recipe_type: String,

    #[serde(default)]
    pub description: String,

    /// Ingredient lines, measure first ("2 cups basmati rice")
    #[serde(default)]
    pub ingredients: Vec<String>,

    #[serde(default)]
    pub instructions: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub image_url: String,

    /// Minutes
    #[serde(default)]
    pub prep_time: u32,

    /// Minutes
    #[serde(default)]
    pub cook_time: u32,

    #[serde(default)]
    pub servings: u32,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Creates a recipe with the given id and title, everything else empty.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            region: String::new(),
            recipe_type: String::new(),
            description: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            tags: Vec::new(),
            image_url: String::new(),
            prep_time: 0,
            cook_time: 0,
            servings: 0,
            created_at: Utc::now(),
        }
    }

    /// Identity key used by the favorites set and the recent-views queue.
    pub fn identity_key(&self) -> String {
        self.id.to_string()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_type(mut self, recipe_type: impl Into<String>) -> Self {
        self.recipe_type = recipe_type.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_instructions<I, S>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions = instructions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Sets prep time, cook time (minutes) and servings
    pub fn with_timing(mut self, prep_time: u32, cook_time: u32, servings: u32) -> Self {
        self.prep_time = prep_time;
        self.cook_time = cook_time;
        self.servings = servings;
        self
    }

    /// Total time in minutes
    pub fn total_time(&self) -> u32 {
        self.prep_time + self.cook_time
    }

    /// Case-insensitive substring match against any ingredient line.
    pub fn has_ingredient(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.ingredients
            .iter()
            .any(|ingredient| ingredient.to_lowercase().contains(&needle))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
