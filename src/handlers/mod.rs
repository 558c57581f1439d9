pub mod catalog_handlers;
pub mod favorite_handlers;
pub mod recipe_handlers;
pub mod user_handlers;
