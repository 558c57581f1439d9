use actix_web::web;

use crate::handlers::catalog_handlers::{get_ingredient, get_tag, list_ingredients, list_tags};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tags")
            .route("", web::get().to(list_tags))
            .route("/{tag_id}", web::get().to(get_tag)),
    );
    cfg.service(
        web::scope("/ingredients")
            .route("", web::get().to(list_ingredients))
            .route("/{ingredient_id}", web::get().to(get_ingredient)),
    );
}
