use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web::Data,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use tracing::{debug, error};

use crate::config::Config;
use crate::constants::middleware_constants::is_public_route;
use crate::error::AppError;
use crate::utils::token_utils::verify_jwt;

/// Verifies bearer tokens for everything under `/api` and attaches the
/// `Claims` to the request. Anonymous callers only reach public routes.
pub struct AuthMiddlewareFactory;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddleware {
            service: Arc::new(service),
        }))
    }
}

pub struct AuthMiddleware<S> {
    service: Arc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let secret = req.app_data::<Data<Config>>().map(|c| c.jwt_secret.clone());
        let public = is_public_route(req.method(), req.path());

        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string());

        Box::pin(async move {
            let Some(secret) = secret else {
                error!("application config is not registered");
                return Err(actix_web::error::ErrorInternalServerError(
                    "Authentication is not configured",
                ));
            };

            match token {
                Some(token) => match verify_jwt(&token, &secret) {
                    Some(claims) => {
                        req.extensions_mut().insert(claims);
                    }
                    None => {
                        debug!(path = %req.path(), "rejected invalid token");
                        return Ok(req.error_response(AppError::Unauthorized).map_into_right_body());
                    }
                },
                None if public => {}
                None => {
                    return Ok(req.error_response(AppError::Unauthorized).map_into_right_body());
                }
            }

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}
