#![allow(dead_code)]

use chrono::Utc;
use diesel::prelude::*;
use tempfile::TempDir;

use foodgram::config::Config;
use foodgram::db::{init_pool, DbConn, DbPool};
use foodgram::models::catalog_models::{Ingredient, NewIngredient, NewTag, Tag};
use foodgram::models::recipe_models::{IngredientAmount, Recipe, RecipePayload};
use foodgram::models::user_models::{NewUser, User};
use foodgram::schema::{ingredients, tags, users};
use foodgram::utils::recipe_utils::create_recipe;
use foodgram::utils::token_utils::generate_jwt;

pub const SECRET: &[u8] = b"integration-secret";

/// A throwaway database file plus the config the app runs with.
pub struct TestContext {
    _dir: TempDir,
    pub pool: DbPool,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foodgram-test.sqlite3");
        let database_url = path.to_str().unwrap().to_string();
        let pool = init_pool(&database_url, 4).unwrap();

        let config = Config {
            database_url,
            jwt_secret: SECRET.to_vec(),
            host: "127.0.0.1".into(),
            port: 0,
            workers: 1,
            pool_size: 4,
            bcrypt_cost: 4,
            pdf_font_path: None,
        };

        Self {
            _dir: dir,
            pool,
            config,
        }
    }

    pub fn conn(&self) -> DbConn {
        self.pool.get().unwrap()
    }

    pub fn user(&self, username: &str) -> User {
        self.insert_user(username, false)
    }

    pub fn staff(&self, username: &str) -> User {
        self.insert_user(username, true)
    }

    fn insert_user(&self, username: &str, is_staff: bool) -> User {
        let email = format!("{username}@example.com");
        diesel::insert_into(users::table)
            .values(&NewUser {
                email: &email,
                username,
                first_name: "Test",
                last_name: "Cook",
                password_hash: "not-a-real-hash",
                is_staff,
                created_at: Utc::now().naive_utc(),
            })
            .returning(User::as_returning())
            .get_result(&mut self.conn())
            .unwrap()
    }

    pub fn tag(&self, slug: &str) -> Tag {
        diesel::insert_into(tags::table)
            .values(&NewTag {
                name: slug,
                color: "#E26C2D",
                slug,
            })
            .returning(Tag::as_returning())
            .get_result(&mut self.conn())
            .unwrap()
    }

    pub fn ingredient(&self, name: &str, unit: &str) -> Ingredient {
        diesel::insert_into(ingredients::table)
            .values(&NewIngredient {
                name,
                measurement_unit: unit,
            })
            .returning(Ingredient::as_returning())
            .get_result(&mut self.conn())
            .unwrap()
    }

    /// Stores a recipe straight through the recipe service, skipping HTTP.
    pub fn recipe(&self, author: &User, name: &str, lines: &[(&Ingredient, i32)], tags: &[&Tag]) -> Recipe {
        let payload = payload(name, lines, tags);
        create_recipe(&mut self.conn(), author.id, &payload).unwrap()
    }

    pub fn bearer(&self, user: &User) -> (&'static str, String) {
        let token = generate_jwt(&user.id.to_string(), SECRET).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    pub fn count(&self, sql_table: &str) -> i64 {
        #[derive(QueryableByName)]
        struct Count {
            #[diesel(sql_type = diesel::sql_types::BigInt)]
            n: i64,
        }
        diesel::sql_query(format!("SELECT COUNT(*) AS n FROM {sql_table}"))
            .get_result::<Count>(&mut self.conn())
            .unwrap()
            .n
    }
}

pub fn payload(name: &str, lines: &[(&Ingredient, i32)], tags: &[&Tag]) -> RecipePayload {
    RecipePayload {
        ingredients: lines
            .iter()
            .map(|(ingredient, amount)| IngredientAmount {
                id: ingredient.id,
                amount: *amount,
            })
            .collect(),
        tags: tags.iter().map(|t| t.id).collect(),
        image: "data:image/png;base64,iVBORw0KGgo=".into(),
        name: name.into(),
        text: "Mix everything and cook.".into(),
        cooking_time: 25,
    }
}

/// Builds the full application the way `main` does, around one context.
#[macro_export]
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.pool.clone()))
                .app_data(actix_web::web::Data::new($ctx.config.clone()))
                .configure(foodgram::routes::configure),
        )
        .await
    };
}
