use actix_web::web;

use crate::handlers::user_handlers::{
    create_user, get_me, get_subscriptions, get_user, list_users, subscribe, unsubscribe,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            .route("/me", web::get().to(get_me))
            .route("/subscriptions", web::get().to(get_subscriptions))
            .route("/{user_id}", web::get().to(get_user))
            .route("/{user_id}/subscribe", web::post().to(subscribe))
            .route("/{user_id}/subscribe", web::delete().to(unsubscribe)),
    );
}
