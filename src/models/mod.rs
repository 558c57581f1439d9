pub mod catalog_models;
pub mod favorite_models;
pub mod recipe_models;
pub mod token_models;
pub mod user_models;
