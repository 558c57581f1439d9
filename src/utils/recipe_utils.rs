use std::collections::{HashMap, HashSet};

use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::error::{AppError, ValidationErrors};
use crate::models::catalog_models::{Ingredient, Tag};
use crate::models::recipe_models::{
    IngredientLine, NewRecipe, NewRecipeIngredient, NewRecipeTag, Recipe, RecipeAction,
    RecipeDetails, RecipeFilter, RecipeIngredient, RecipePayload, RecipeRepresentation,
    RecipeShape, RecipeTag, UpdateRecipe,
};
use crate::models::user_models::{User, UserResponse};
use crate::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_baskets,
    subscriptions, tags, users,
};
use crate::utils::validation_utils::validate_recipe;

pub fn find_recipe(conn: &mut SqliteConnection, recipe_id: i32) -> Result<Recipe, AppError> {
    recipes::table
        .find(recipe_id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or(AppError::NotFound("Recipe not found"))
}

/// Newest first, narrowed by whatever the filter carries. Personal filters
/// without a viewer match nothing.
pub fn list_recipes(
    conn: &mut SqliteConnection,
    filter: &RecipeFilter,
    viewer: Option<i32>,
) -> Result<Vec<Recipe>, AppError> {
    let mut query = recipes::table
        .select(Recipe::as_select())
        .order((recipes::pub_date.desc(), recipes::id.desc()))
        .into_boxed();

    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    if !filter.tags.is_empty() {
        let tagged: Vec<i32> = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(&filter.tags))
            .select(recipe_tags::recipe_id)
            .distinct()
            .load(conn)?;
        query = query.filter(recipes::id.eq_any(tagged));
    }

    if filter.is_favorited || filter.is_in_shopping_cart {
        let Some(user_id) = viewer else {
            return Ok(Vec::new());
        };
        if filter.is_favorited {
            let favorited: Vec<i32> = favorites::table
                .filter(favorites::user_id.eq(user_id))
                .select(favorites::recipe_id)
                .load(conn)?;
            query = query.filter(recipes::id.eq_any(favorited));
        }
        if filter.is_in_shopping_cart {
            let basketed: Vec<i32> = shopping_baskets::table
                .filter(shopping_baskets::user_id.eq(user_id))
                .select(shopping_baskets::recipe_id)
                .load(conn)?;
            query = query.filter(recipes::id.eq_any(basketed));
        }
    }

    Ok(query.load(conn)?)
}

/// Create the recipe row and all of its components, or nothing.
pub fn create_recipe(
    conn: &mut SqliteConnection,
    author_id: i32,
    payload: &RecipePayload,
) -> Result<Recipe, AppError> {
    validate_recipe(payload).into_result()?;

    conn.immediate_transaction::<_, AppError, _>(|conn| {
        check_references(conn, payload)?;

        let new_recipe = NewRecipe {
            author_id,
            name: payload.name.trim(),
            text: &payload.text,
            image: &payload.image,
            cooking_time: payload.cooking_time,
            pub_date: Utc::now().naive_utc(),
        };
        let recipe_id: i32 = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(recipes::id)
            .get_result(conn)?;

        insert_components(conn, recipe_id, payload)?;
        find_recipe(conn, recipe_id)
    })
}

/// Overwrite scalar fields and swap the whole ingredient and tag sets.
pub fn update_recipe(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    payload: &RecipePayload,
) -> Result<Recipe, AppError> {
    validate_recipe(payload).into_result()?;

    conn.immediate_transaction::<_, AppError, _>(|conn| {
        check_references(conn, payload)?;

        let changes = UpdateRecipe {
            name: payload.name.trim(),
            text: &payload.text,
            image: &payload.image,
            cooking_time: payload.cooking_time,
        };
        let updated = diesel::update(recipes::table.find(recipe_id))
            .set(&changes)
            .execute(conn)?;
        if updated == 0 {
            return Err(AppError::NotFound("Recipe not found"));
        }

        diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
            .execute(conn)?;
        diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
            .execute(conn)?;
        insert_components(conn, recipe_id, payload)?;

        find_recipe(conn, recipe_id)
    })
}

/// Removes the recipe with every row that points at it.
pub fn delete_recipe(conn: &mut SqliteConnection, recipe_id: i32) -> Result<(), AppError> {
    conn.immediate_transaction::<_, AppError, _>(|conn| {
        diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
            .execute(conn)?;
        diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
            .execute(conn)?;
        diesel::delete(favorites::table.filter(favorites::recipe_id.eq(recipe_id))).execute(conn)?;
        diesel::delete(shopping_baskets::table.filter(shopping_baskets::recipe_id.eq(recipe_id)))
            .execute(conn)?;

        let deleted = diesel::delete(recipes::table.find(recipe_id)).execute(conn)?;
        if deleted == 0 {
            return Err(AppError::NotFound("Recipe not found"));
        }
        Ok(())
    })
}

fn check_references(conn: &mut SqliteConnection, payload: &RecipePayload) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();

    let ingredient_ids: Vec<i32> = payload.ingredients.iter().map(|line| line.id).collect();
    let known: HashSet<i32> = ingredients::table
        .filter(ingredients::id.eq_any(&ingredient_ids))
        .select(ingredients::id)
        .load::<i32>(conn)?
        .into_iter()
        .collect();
    for id in ingredient_ids.iter().filter(|id| !known.contains(id)) {
        errors.add("ingredients", format!("Invalid pk \"{id}\" - object does not exist."));
    }

    let known: HashSet<i32> = tags::table
        .filter(tags::id.eq_any(&payload.tags))
        .select(tags::id)
        .load::<i32>(conn)?
        .into_iter()
        .collect();
    for id in payload.tags.iter().filter(|id| !known.contains(id)) {
        errors.add("tags", format!("Invalid pk \"{id}\" - object does not exist."));
    }

    errors.into_result()
}

fn insert_components(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    payload: &RecipePayload,
) -> QueryResult<()> {
    let lines: Vec<NewRecipeIngredient> = payload
        .ingredients
        .iter()
        .map(|line| NewRecipeIngredient {
            recipe_id,
            ingredient_id: line.id,
            amount: line.amount,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&lines)
        .execute(conn)?;

    let tag_rows: Vec<NewRecipeTag> = payload
        .tags
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&tag_rows)
        .execute(conn)?;

    Ok(())
}

/// Render recipes in the shape the action calls for. `viewer` drives the
/// personal flags and is never someone other than the caller.
pub fn represent_recipes(
    conn: &mut SqliteConnection,
    action: RecipeAction,
    recipes: Vec<Recipe>,
    viewer: Option<i32>,
) -> Result<Vec<RecipeRepresentation>, AppError> {
    match action.shape() {
        RecipeShape::Short => Ok(recipes
            .iter()
            .map(|recipe| RecipeRepresentation::Short(recipe.into()))
            .collect()),
        RecipeShape::Full => Ok(load_details(conn, recipes, viewer)?
            .into_iter()
            .map(|details| RecipeRepresentation::Full(details.into()))
            .collect()),
    }
}

pub fn represent_recipe(
    conn: &mut SqliteConnection,
    action: RecipeAction,
    recipe: Recipe,
    viewer: Option<i32>,
) -> Result<RecipeRepresentation, AppError> {
    represent_recipes(conn, action, vec![recipe], viewer)?
        .pop()
        .ok_or(AppError::NotFound("Recipe not found"))
}

fn load_details(
    conn: &mut SqliteConnection,
    recipes: Vec<Recipe>,
    viewer: Option<i32>,
) -> Result<Vec<RecipeDetails>, AppError> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
    let author_ids: Vec<i32> = recipes
        .iter()
        .map(|r| r.author_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let authors: HashMap<i32, User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load::<User>(conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let tag_rows: Vec<(RecipeTag, Tag)> = RecipeTag::belonging_to(&recipes)
        .inner_join(tags::table)
        .select((RecipeTag::as_select(), Tag::as_select()))
        .order(recipe_tags::id)
        .load(conn)?;
    let tags_per_recipe = tag_rows.grouped_by(&recipes);

    let ingredient_rows: Vec<(RecipeIngredient, Ingredient)> = RecipeIngredient::belonging_to(&recipes)
        .inner_join(ingredients::table)
        .select((RecipeIngredient::as_select(), Ingredient::as_select()))
        .order(recipe_ingredients::id)
        .load(conn)?;
    let ingredients_per_recipe = ingredient_rows.grouped_by(&recipes);

    let mut favorited = HashSet::new();
    let mut in_cart = HashSet::new();
    let mut subscribed = HashSet::new();
    if let Some(user_id) = viewer {
        favorited = favorites::table
            .filter(favorites::user_id.eq(user_id))
            .filter(favorites::recipe_id.eq_any(&recipe_ids))
            .select(favorites::recipe_id)
            .load::<i32>(conn)?
            .into_iter()
            .collect();
        in_cart = shopping_baskets::table
            .filter(shopping_baskets::user_id.eq(user_id))
            .filter(shopping_baskets::recipe_id.eq_any(&recipe_ids))
            .select(shopping_baskets::recipe_id)
            .load::<i32>(conn)?
            .into_iter()
            .collect();
        subscribed = subscriptions::table
            .filter(subscriptions::follower_id.eq(user_id))
            .filter(subscriptions::author_id.eq_any(&author_ids))
            .select(subscriptions::author_id)
            .load::<i32>(conn)?
            .into_iter()
            .collect();
    }

    recipes
        .into_iter()
        .zip(tags_per_recipe)
        .zip(ingredients_per_recipe)
        .map(|((recipe, tag_rows), ingredient_rows)| {
            let author = authors
                .get(&recipe.author_id)
                .ok_or(AppError::NotFound("Author not found"))?;
            Ok(RecipeDetails {
                author: UserResponse::new(author, subscribed.contains(&recipe.author_id)),
                tags: tag_rows.into_iter().map(|(_, tag)| tag).collect(),
                ingredients: ingredient_rows
                    .iter()
                    .map(|(line, ingredient)| IngredientLine::new(line, ingredient))
                    .collect(),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                recipe,
            })
        })
        .collect()
}
