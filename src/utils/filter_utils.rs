use crate::error::{AppError, ValidationErrors};
use crate::models::recipe_models::RecipeFilter;

/// Query flags accept the same spellings the web client sends.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl RecipeFilter {
    /// Built from raw query pairs so repeated `tags` keys survive.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, AppError> {
        let mut filter = RecipeFilter::default();
        let mut errors = ValidationErrors::new();

        for (key, value) in pairs {
            match key.as_str() {
                "author" => match value.parse::<i32>() {
                    Ok(id) => filter.author = Some(id),
                    Err(_) => errors.add("author", "A valid integer is required."),
                },
                "tags" => {
                    if !value.is_empty() && !filter.tags.contains(value) {
                        filter.tags.push(value.clone());
                    }
                }
                "is_favorited" => match parse_flag(value) {
                    Some(flag) => filter.is_favorited = flag,
                    None => errors.add("is_favorited", "Must be a boolean."),
                },
                "is_in_shopping_cart" => match parse_flag(value) {
                    Some(flag) => filter.is_in_shopping_cart = flag,
                    None => errors.add("is_in_shopping_cart", "Must be a boolean."),
                },
                _ => {}
            }
        }

        errors.into_result()?;
        Ok(filter)
    }
}

/// `recipes_limit` on the subscriptions list; absent means unlimited.
pub fn parse_recipes_limit(raw: Option<&str>) -> Result<Option<usize>, AppError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|_| AppError::validation("recipes_limit", "A non-negative integer is required.")),
    }
}
