use std::collections::HashSet;

use crate::error::ValidationErrors;
use crate::models::recipe_models::RecipePayload;
use crate::models::user_models::CreateUser;

pub const MIN_INGREDIENTS: usize = 2;
pub const MIN_AMOUNT: i32 = 1;
pub const MIN_COOKING_TIME: i32 = 1;
pub const MAX_RECIPE_NAME_LEN: usize = 200;
pub const FORBIDDEN_USERNAMES: &[&str] = &["me"];

/// Shape checks on a recipe body. Whether the ids exist is checked against
/// the store inside the write transaction.
pub fn validate_recipe(payload: &RecipePayload) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let name = payload.name.trim();
    if name.is_empty() {
        errors.add("name", "This field may not be blank.");
    } else if name.chars().count() > MAX_RECIPE_NAME_LEN {
        errors.add(
            "name",
            format!("Ensure this field has no more than {MAX_RECIPE_NAME_LEN} characters."),
        );
    }
    if payload.text.trim().is_empty() {
        errors.add("text", "This field may not be blank.");
    }
    if payload.image.trim().is_empty() {
        errors.add("image", "This field may not be blank.");
    }
    if payload.cooking_time < MIN_COOKING_TIME {
        errors.add(
            "cooking_time",
            format!("Ensure this value is greater than or equal to {MIN_COOKING_TIME}."),
        );
    }

    if payload.ingredients.len() < MIN_INGREDIENTS {
        errors.add(
            "ingredients",
            format!("A recipe needs at least {MIN_INGREDIENTS} ingredients."),
        );
    }
    let mut seen = HashSet::new();
    for line in &payload.ingredients {
        if !seen.insert(line.id) {
            errors.add("ingredients", format!("Ingredient {} is listed more than once.", line.id));
        }
        if line.amount < MIN_AMOUNT {
            errors.add(
                "ingredients",
                format!("Amount for ingredient {} must be at least {MIN_AMOUNT}.", line.id),
            );
        }
    }

    if payload.tags.is_empty() {
        errors.add("tags", "At least one tag is required.");
    }
    let mut seen = HashSet::new();
    for tag in &payload.tags {
        if !seen.insert(*tag) {
            errors.add("tags", format!("Tag {tag} is listed more than once."));
        }
    }

    errors
}

pub fn validate_new_user(payload: &CreateUser) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    for (field, value) in [
        ("email", &payload.email),
        ("username", &payload.username),
        ("first_name", &payload.first_name),
        ("last_name", &payload.last_name),
        ("password", &payload.password),
    ] {
        if value.trim().is_empty() {
            errors.add(field, "This field may not be blank.");
        }
    }

    if !payload.email.is_empty() && !payload.email.contains('@') {
        errors.add("email", "Enter a valid email address.");
    }
    if FORBIDDEN_USERNAMES.contains(&payload.username.as_str()) {
        errors.add("username", format!("Username '{}' is not allowed.", payload.username));
    }
    if !payload.username.is_empty() && payload.username == payload.email {
        errors.add("username", "Username and email must differ.");
    }

    errors
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::models::recipe_models::IngredientAmount;

    fn payload() -> RecipePayload {
        RecipePayload {
            ingredients: vec![
                IngredientAmount { id: 1, amount: 5 },
                IngredientAmount { id: 2, amount: 10 },
            ],
            tags: vec![1],
            image: "data:image/png;base64,AAAA".into(),
            name: "Pancakes".into(),
            text: "Mix and fry".into(),
            cooking_time: 20,
        }
    }

    #[test]
    fn accepts_well_formed_recipe() {
        assert!(validate_recipe(&payload()).is_empty());
    }

    #[rstest]
    #[case::single_ingredient(|p: &mut RecipePayload| { p.ingredients.truncate(1); }, "ingredients")]
    #[case::no_ingredients(|p: &mut RecipePayload| { p.ingredients.clear(); }, "ingredients")]
    #[case::duplicate_ingredient(|p: &mut RecipePayload| { p.ingredients[1].id = 1; }, "ingredients")]
    #[case::zero_amount(|p: &mut RecipePayload| { p.ingredients[0].amount = 0; }, "ingredients")]
    #[case::negative_amount(|p: &mut RecipePayload| { p.ingredients[1].amount = -3; }, "ingredients")]
    #[case::zero_cooking_time(|p: &mut RecipePayload| { p.cooking_time = 0; }, "cooking_time")]
    #[case::no_tags(|p: &mut RecipePayload| { p.tags.clear(); }, "tags")]
    #[case::duplicate_tags(|p: &mut RecipePayload| { p.tags = vec![1, 1]; }, "tags")]
    #[case::blank_name(|p: &mut RecipePayload| { p.name = "  ".into(); }, "name")]
    #[case::long_name(|p: &mut RecipePayload| { p.name = "x".repeat(201); }, "name")]
    #[case::blank_text(|p: &mut RecipePayload| { p.text.clear(); }, "text")]
    #[case::blank_image(|p: &mut RecipePayload| { p.image.clear(); }, "image")]
    fn rejects_malformed_recipe(#[case] mutate: fn(&mut RecipePayload), #[case] field: &str) {
        let mut p = payload();
        mutate(&mut p);
        let errors = validate_recipe(&p);
        assert!(errors.field(field).is_some(), "expected error on {field}, got {errors}");
    }

    #[test]
    fn name_length_is_measured_after_trimming() {
        let mut p = payload();
        p.name = format!("  {}  ", "x".repeat(MAX_RECIPE_NAME_LEN));
        assert!(validate_recipe(&p).field("name").is_none());

        p.name = format!(" {} ", "x".repeat(MAX_RECIPE_NAME_LEN + 1));
        assert!(validate_recipe(&p).field("name").is_some());
    }

    fn user() -> CreateUser {
        CreateUser {
            email: "cook@example.com".into(),
            username: "cook".into(),
            first_name: "Ann".into(),
            last_name: "Cook".into(),
            password: "s3cret-pass".into(),
        }
    }

    #[test]
    fn accepts_well_formed_user() {
        assert!(validate_new_user(&user()).is_empty());
    }

    #[rstest]
    #[case::forbidden_me(|u: &mut CreateUser| { u.username = "me".into(); }, "username")]
    #[case::username_equals_email(|u: &mut CreateUser| { u.username = u.email.clone(); }, "username")]
    #[case::bad_email(|u: &mut CreateUser| { u.email = "cook.example.com".into(); }, "email")]
    #[case::blank_password(|u: &mut CreateUser| { u.password.clear(); }, "password")]
    #[case::blank_first_name(|u: &mut CreateUser| { u.first_name = " ".into(); }, "first_name")]
    fn rejects_malformed_user(#[case] mutate: fn(&mut CreateUser), #[case] field: &str) {
        let mut u = user();
        mutate(&mut u);
        assert!(validate_new_user(&u).field(field).is_some());
    }
}
