use std::collections::HashSet;

use actix_web::web::{self, ReqData};
use actix_web::HttpResponse;
use bcrypt::hash;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::info;

use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::error::{AppError, ValidationErrors};
use crate::models::token_models::Claims;
use crate::models::user_models::{
    CreateUser, CreatedUserResponse, NewUser, SubscriptionQuery, User, UserResponse,
};
use crate::schema::{subscriptions, users};
use crate::utils::auth_utils::current_user;
use crate::utils::engagement_utils::{self, is_subscribed};
use crate::utils::filter_utils::parse_recipes_limit;
use crate::utils::subscription_utils::{find_user, list_subscriptions, subscription_view};
use crate::utils::validation_utils::validate_new_user;

pub async fn create_user(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    payload: web::Json<CreateUser>,
) -> Result<HttpResponse, AppError> {
    let data = payload.into_inner();
    validate_new_user(&data).into_result()?;

    let mut conn = get_conn(&pool)?;

    let mut errors = ValidationErrors::new();
    let email_taken: bool = diesel::select(diesel::dsl::exists(
        users::table.filter(users::email.eq(&data.email)),
    ))
    .get_result(&mut conn)?;
    if email_taken {
        errors.add("email", "A user with that email already exists.");
    }
    let username_taken: bool = diesel::select(diesel::dsl::exists(
        users::table.filter(users::username.eq(&data.username)),
    ))
    .get_result(&mut conn)?;
    if username_taken {
        errors.add("username", "A user with that username already exists.");
    }
    errors.into_result()?;

    let pwd_hash = hash(&data.password, config.bcrypt_cost)?;
    let new_user = NewUser {
        email: &data.email,
        username: &data.username,
        first_name: &data.first_name,
        last_name: &data.last_name,
        password_hash: &pwd_hash,
        is_staff: false,
        created_at: Utc::now().naive_utc(),
    };

    // Two registrations racing past the checks above still meet the unique index.
    let user: User = diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                AppError::validation("username", "A user with that username or email already exists.")
            }
            other => AppError::Database(other),
        })?;

    info!(user_id = user.id, "user registered");
    Ok(HttpResponse::Created().json(CreatedUserResponse::from(user)))
}

pub async fn list_users(
    pool: web::Data<DbPool>,
    claims: Option<ReqData<Claims>>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;

    let all = users::table
        .select(User::as_select())
        .order(users::id)
        .load::<User>(&mut conn)?;

    let followed: HashSet<i32> = match claims {
        Some(claims) => subscriptions::table
            .filter(subscriptions::follower_id.eq(claims.user_id()?))
            .select(subscriptions::author_id)
            .load::<i32>(&mut conn)?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    let list: Vec<UserResponse> = all
        .iter()
        .map(|u| UserResponse::new(u, followed.contains(&u.id)))
        .collect();
    Ok(HttpResponse::Ok().json(list))
}

pub async fn get_user(
    pool: web::Data<DbPool>,
    user_id: web::Path<i32>,
    claims: Option<ReqData<Claims>>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;
    let user = find_user(&mut conn, user_id.into_inner())?;

    let subscribed = match claims {
        Some(claims) => is_subscribed(&mut conn, claims.user_id()?, user.id)?,
        None => false,
    };

    Ok(HttpResponse::Ok().json(UserResponse::new(&user, subscribed)))
}

pub async fn get_me(
    pool: web::Data<DbPool>,
    claims: ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;
    let me = current_user(&mut conn, &claims)?;

    Ok(HttpResponse::Ok().json(UserResponse::new(&me, false)))
}

pub async fn subscribe(
    pool: web::Data<DbPool>,
    user_id: web::Path<i32>,
    query: web::Query<SubscriptionQuery>,
    claims: ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let limit = parse_recipes_limit(query.recipes_limit.as_deref())?;
    let mut conn = get_conn(&pool)?;
    let follower = current_user(&mut conn, &claims)?;
    let author = find_user(&mut conn, user_id.into_inner())?;

    engagement_utils::subscribe(&mut conn, follower.id, author.id)?;
    info!(follower_id = follower.id, author_id = author.id, "subscribed");

    let body = subscription_view(&mut conn, &author, limit)?;
    Ok(HttpResponse::Created().json(body))
}

pub async fn unsubscribe(
    pool: web::Data<DbPool>,
    user_id: web::Path<i32>,
    claims: ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;
    let follower = current_user(&mut conn, &claims)?;
    let author = find_user(&mut conn, user_id.into_inner())?;

    engagement_utils::unsubscribe(&mut conn, follower.id, author.id)?;
    info!(follower_id = follower.id, author_id = author.id, "unsubscribed");
    Ok(HttpResponse::NoContent().finish())
}

pub async fn get_subscriptions(
    pool: web::Data<DbPool>,
    query: web::Query<SubscriptionQuery>,
    claims: ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let limit = parse_recipes_limit(query.recipes_limit.as_deref())?;
    let mut conn = get_conn(&pool)?;
    let follower = current_user(&mut conn, &claims)?;

    let list = list_subscriptions(&mut conn, follower.id, limit)?;
    Ok(HttpResponse::Ok().json(list))
}
