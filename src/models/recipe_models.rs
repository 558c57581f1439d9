use chrono::NaiveDateTime;
use diesel::prelude::{AsChangeset, Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::models::catalog_models::{Ingredient, Tag};
use crate::models::user_models::{User, UserResponse};

// --------------------- Recipe Models ---------------------
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(belongs_to(User, foreign_key = author_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub pub_date: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub author_id: i32,
    pub name: &'a str,
    pub text: &'a str,
    pub image: &'a str,
    pub cooking_time: i32,
    pub pub_date: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
pub struct UpdateRecipe<'a> {
    pub name: &'a str,
    pub text: &'a str,
    pub image: &'a str,
    pub cooking_time: i32,
}

// --------------------- Recipe Components ---------------------
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
#[diesel(belongs_to(Recipe, foreign_key = recipe_id))]
#[diesel(belongs_to(Ingredient, foreign_key = ingredient_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeIngredient {
    pub id: i32,
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(table_name = crate::schema::recipe_tags)]
#[diesel(belongs_to(Recipe, foreign_key = recipe_id))]
#[diesel(belongs_to(Tag, foreign_key = tag_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeTag {
    pub id: i32,
    pub recipe_id: i32,
    pub tag_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_tags)]
pub struct NewRecipeTag {
    pub recipe_id: i32,
    pub tag_id: i32,
}

// --------------------- Request Models ---------------------
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IngredientAmount {
    pub id: i32,
    pub amount: i32,
}

/// Body of recipe create and update. Update replaces everything, so both
/// verbs take the same shape.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RecipePayload {
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<i32>,
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Parsed list filters. Tag slugs are OR-ed together.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<i32>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

// --------------------- Response Models ---------------------
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IngredientLine {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl IngredientLine {
    pub fn new(line: &RecipeIngredient, ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
            measurement_unit: ingredient.measurement_unit.clone(),
            amount: line.amount,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<Tag>,
    pub author: UserResponse,
    pub ingredients: Vec<IngredientLine>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ShortRecipeResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<&Recipe> for ShortRecipeResponse {
    fn from(r: &Recipe) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            image: r.image.clone(),
            cooking_time: r.cooking_time,
        }
    }
}

/// Everything the full representation needs, already loaded.
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub author: UserResponse,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<IngredientLine>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl From<RecipeDetails> for RecipeResponse {
    fn from(d: RecipeDetails) -> Self {
        Self {
            id: d.recipe.id,
            tags: d.tags,
            author: d.author,
            ingredients: d.ingredients,
            is_favorited: d.is_favorited,
            is_in_shopping_cart: d.is_in_shopping_cart,
            name: d.recipe.name,
            image: d.recipe.image,
            text: d.recipe.text,
            cooking_time: d.recipe.cooking_time,
        }
    }
}

/// The operation a recipe is being rendered for. Each one maps to a single
/// output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeAction {
    List,
    Retrieve,
    Create,
    Update,
    Favorite,
    ShoppingCart,
    Subscriptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeShape {
    Full,
    Short,
}

impl RecipeAction {
    pub fn shape(self) -> RecipeShape {
        match self {
            RecipeAction::List
            | RecipeAction::Retrieve
            | RecipeAction::Create
            | RecipeAction::Update => RecipeShape::Full,
            RecipeAction::Favorite | RecipeAction::ShoppingCart | RecipeAction::Subscriptions => {
                RecipeShape::Short
            }
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
pub enum RecipeRepresentation {
    Full(RecipeResponse),
    Short(ShortRecipeResponse),
}
