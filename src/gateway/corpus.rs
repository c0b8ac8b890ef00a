//! In-memory recipe corpus answering gateway-style queries.

use std::collections::BTreeSet;

use crate::models::Recipe;

/// A fixed list of recipes with the lookups a gateway needs
#[derive(Debug, Clone, Default)]
pub struct RecipeCorpus {
    recipes: Vec<Recipe>,
}

impl RecipeCorpus {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Region match ignores ASCII case
    pub fn by_region(&self, region: &str) -> Vec<Recipe> {
        self.filtered(|r| r.region.eq_ignore_ascii_case(region.trim()))
    }

    pub fn by_ingredient(&self, ingredient: &str) -> Vec<Recipe> {
        let ingredient = ingredient.trim();
        self.filtered(|r| r.has_ingredient(ingredient))
    }

    /// Matches the query against title, description and tags
    pub fn by_query(&self, query: &str, region: Option<&str>, recipe_type: Option<&str>) -> Vec<Recipe> {
        let needle = query.trim().to_lowercase();
        self.filtered(|r| {
            let text_match = needle.is_empty()
                || r.title.to_lowercase().contains(&needle)
                || r.description.to_lowercase().contains(&needle)
                || r.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            let region_match = region.map_or(true, |reg| r.region.eq_ignore_ascii_case(reg));
            let type_match = recipe_type.map_or(true, |t| r.recipe_type.eq_ignore_ascii_case(t));
            text_match && region_match && type_match
        })
    }

    /// Looks a recipe up by its textual id; non-numeric ids match nothing
    pub fn by_id(&self, id: &str) -> Option<Recipe> {
        let id: u64 = id.trim().parse().ok()?;
        self.recipes.iter().find(|r| r.id == id).cloned()
    }

    pub fn regions(&self) -> Vec<String> {
        Self::distinct(self.recipes.iter().map(|r| r.region.as_str()))
    }

    pub fn types(&self) -> Vec<String> {
        Self::distinct(self.recipes.iter().map(|r| r.recipe_type.as_str()))
    }

    fn filtered<F>(&self, predicate: F) -> Vec<Recipe>
    where
        F: Fn(&Recipe) -> bool,
    {
        self.recipes.iter().filter(|r| predicate(r)).cloned().collect()
    }

    fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
        values
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> RecipeCorpus {
        RecipeCorpus::new(vec![
            Recipe::new(1, "Chicken Tikka Masala")
                .with_region("Indian")
                .with_type("Chicken")
                .with_ingredients(["500g Chicken Breast", "1 cup Yogurt"]),
            Recipe::new(2, "Kung Pao Chicken")
                .with_region("Chinese")
                .with_type("Chicken")
                .with_ingredients(["400g Chicken Thighs", "50g Peanuts"]),
            Recipe::new(3, "Panna Cotta")
                .with_region("Italian")
                .with_type("Dessert")
                .with_tags(["dessert", "creamy"])
                .with_ingredients(["500ml Double Cream"]),
        ])
    }

    fn ids(recipes: &[Recipe]) -> Vec<u64> {
        recipes.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_by_region_ignores_case() {
        assert_eq!(ids(&corpus().by_region("indian")), vec![1]);
        assert!(corpus().by_region("Mexican").is_empty());
    }

    #[test]
    fn test_by_ingredient() {
        assert_eq!(ids(&corpus().by_ingredient("chicken")), vec![1, 2]);
        assert_eq!(ids(&corpus().by_ingredient("cream")), vec![3]);
    }

    #[test]
    fn test_by_query_with_narrowing() {
        let c = corpus();
        assert_eq!(ids(&c.by_query("chicken", None, None)), vec![1, 2]);
        assert_eq!(ids(&c.by_query("chicken", Some("Chinese"), None)), vec![2]);
        assert_eq!(ids(&c.by_query("creamy", None, Some("dessert"))), vec![3]);
        assert!(c.by_query("chicken", None, Some("Dessert")).is_empty());
    }

    #[test]
    fn test_by_id() {
        let c = corpus();
        assert_eq!(c.by_id("2").map(|r| r.id), Some(2));
        assert!(c.by_id("99").is_none());
        assert!(c.by_id("abc").is_none());
    }

    #[test]
    fn test_distinct_regions_and_types() {
        let c = corpus();
        assert_eq!(c.regions(), vec!["Chinese", "Indian", "Italian"]);
        assert_eq!(c.types(), vec!["Chicken", "Dessert"]);
    }
}
