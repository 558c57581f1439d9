use actix_web::web;

use crate::handlers::favorite_handlers::{
    add_favorite, add_to_shopping_cart, download_shopping_cart, remove_favorite,
    remove_from_shopping_cart,
};
use crate::handlers::recipe_handlers::{
    create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/recipes")
            .route("", web::get().to(list_recipes))
            .route("", web::post().to(create_recipe))
            .route("/download_shopping_cart", web::get().to(download_shopping_cart))
            .route("/{recipe_id}", web::get().to(get_recipe))
            .route("/{recipe_id}", web::put().to(update_recipe))
            .route("/{recipe_id}", web::patch().to(update_recipe))
            .route("/{recipe_id}", web::delete().to(delete_recipe))
            .route("/{recipe_id}/favorite", web::post().to(add_favorite))
            .route("/{recipe_id}/favorite", web::delete().to(remove_favorite))
            .route("/{recipe_id}/shopping_cart", web::post().to(add_to_shopping_cart))
            .route("/{recipe_id}/shopping_cart", web::delete().to(remove_from_shopping_cart)),
    );
}
