//! Per-field postings over a corpus snapshot.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::models::{Recipe, SearchFilters};

/// Ingredient tokens this short or shorter are not indexed
pub const MIN_TOKEN_LEN: usize = 3;

/// Set of recipe ids
pub type Postings = HashSet<u64>;

/// Indexed recipe fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexField {
    Tag,
    Region,
    Type,
    Ingredient,
}

impl IndexField {
    pub const ALL: [IndexField; 4] = [
        IndexField::Tag,
        IndexField::Region,
        IndexField::Type,
        IndexField::Ingredient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexField::Tag => "tag",
            IndexField::Region => "region",
            IndexField::Type => "type",
            IndexField::Ingredient => "ingredient",
        }
    }
}

impl fmt::Display for IndexField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tag" | "tags" => Ok(IndexField::Tag),
            "region" | "cuisine" | "area" => Ok(IndexField::Region),
            "type" | "category" => Ok(IndexField::Type),
            "ingredient" | "ingredients" => Ok(IndexField::Ingredient),
            other => Err(format!("Unknown index field: {}", other)),
        }
    }
}

/// Inverted index over tags, region, type and ingredient tokens.
///
/// Built wholesale from a corpus snapshot; never patched incrementally.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    tags: HashMap<String, Postings>,
    regions: HashMap<String, Postings>,
    types: HashMap<String, Postings>,
    ingredients: HashMap<String, Postings>,
    recipe_count: usize,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from a corpus in one go
    pub fn from_recipes(recipes: &[Arc<Recipe>]) -> Self {
        let mut index = Self::new();
        index.build(recipes);
        index
    }

    /// Replaces all postings with ones computed from `recipes`.
    ///
    /// Tags are lower-cased, region and type are kept verbatim, ingredients
    /// are lower-cased and split on whitespace with short tokens dropped.
    pub fn build(&mut self, recipes: &[Arc<Recipe>]) {
        let mut tags: HashMap<String, Postings> = HashMap::new();
        let mut regions: HashMap<String, Postings> = HashMap::new();
        let mut types: HashMap<String, Postings> = HashMap::new();
        let mut ingredients: HashMap<String, Postings> = HashMap::new();

        for recipe in recipes {
            for tag in &recipe.tags {
                tags.entry(tag.to_lowercase()).or_default().insert(recipe.id);
            }

            if !recipe.region.is_empty() {
                regions
                    .entry(recipe.region.clone())
                    .or_default()
                    .insert(recipe.id);
            }

            if !recipe.recipe_type.is_empty() {
                types
                    .entry(recipe.recipe_type.clone())
                    .or_default()
                    .insert(recipe.id);
            }

            for line in &recipe.ingredients {
                for token in tokenize(line) {
                    ingredients.entry(token).or_default().insert(recipe.id);
                }
            }
        }

        self.tags = tags;
        self.regions = regions;
        self.types = types;
        self.ingredients = ingredients;
        self.recipe_count = recipes.len();

        debug!(
            "Built index over {} recipes: {} tags, {} regions, {} types, {} ingredient tokens",
            self.recipe_count,
            self.tags.len(),
            self.regions.len(),
            self.types.len(),
            self.ingredients.len()
        );
    }

    /// Postings for `field = value`, empty if nothing is indexed under it.
    ///
    /// Tag and ingredient probes are lower-cased to match indexing.
    pub fn lookup(&self, field: IndexField, value: &str) -> Postings {
        let postings = match field {
            IndexField::Tag => self.tags.get(&value.to_lowercase()),
            IndexField::Region => self.regions.get(value),
            IndexField::Type => self.types.get(value),
            IndexField::Ingredient => self.ingredients.get(&value.to_lowercase()),
        };
        postings.cloned().unwrap_or_default()
    }

    /// AND of all given sets. Zero sets yield the empty set.
    pub fn intersect(sets: &[Postings]) -> Postings {
        let Some((first, rest)) = sets.split_first() else {
            return Postings::new();
        };

        // Start from the smallest set to keep the scan short
        let smallest = rest
            .iter()
            .fold(first, |acc, s| if s.len() < acc.len() { s } else { acc });

        smallest
            .iter()
            .filter(|id| sets.iter().all(|s| s.contains(*id)))
            .copied()
            .collect()
    }

    /// Candidate ids for the region, type and tag parts of `filters`.
    ///
    /// Returns None when none of those fields is set. Ingredient filters are
    /// substring matches and cannot be answered from tokens, so they are not
    /// consulted here.
    pub fn candidates(&self, filters: &SearchFilters) -> Option<Postings> {
        let mut sets = Vec::new();
        if let Some(region) = filters.region_value() {
            sets.push(self.lookup(IndexField::Region, region));
        }
        if let Some(recipe_type) = filters.type_value() {
            sets.push(self.lookup(IndexField::Type, recipe_type));
        }
        if let Some(tag) = filters.tag_value() {
            sets.push(self.lookup(IndexField::Tag, tag));
        }

        if sets.is_empty() {
            None
        } else {
            Some(Self::intersect(&sets))
        }
    }

    /// Distinct indexed values of a field, sorted
    pub fn values(&self, field: IndexField) -> Vec<String> {
        let map = match field {
            IndexField::Tag => &self.tags,
            IndexField::Region => &self.regions,
            IndexField::Type => &self.types,
            IndexField::Ingredient => &self.ingredients,
        };
        let mut values: Vec<String> = map.keys().cloned().collect();
        values.sort();
        values
    }

    pub fn tags(&self) -> Vec<String> {
        self.values(IndexField::Tag)
    }

    /// Number of recipes in the snapshot the index was built from
    pub fn recipe_count(&self) -> usize {
        self.recipe_count
    }

    pub fn token_count(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipe_count == 0
    }
}

/// Lower-cased whitespace tokens of an ingredient line, noise dropped
pub fn tokenize(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_lowercase)
}
