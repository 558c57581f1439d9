pub mod auth_utils;
pub mod catalog_import_utils;
pub mod engagement_utils;
pub mod filter_utils;
pub mod recipe_utils;
pub mod shopping_list_utils;
pub mod subscription_utils;
pub mod token_utils;
pub mod validation_utils;
