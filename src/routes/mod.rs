pub mod catalog_routes;
pub mod recipe_routes;
pub mod user_routes;

use actix_web::{error, web, HttpRequest};

use crate::error::AppError;
use crate::middleware::auth_middleware::AuthMiddlewareFactory;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(
            web::scope("/api")
                .wrap(AuthMiddlewareFactory)
                .configure(recipe_routes::configure)
                .configure(catalog_routes::configure)
                .configure(user_routes::configure),
        );
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation("body", err.to_string()).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation("query", err.to_string()).into()
}

fn path_error(_err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound("Not found").into()
}
