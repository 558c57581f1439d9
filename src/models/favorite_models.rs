use chrono::NaiveDateTime;
use diesel::prelude::Insertable;

// Relation rows are only ever inserted or deleted; reads select single columns.

#[derive(Insertable)]
#[diesel(table_name = crate::schema::favorites)]
pub struct NewFavorite {
    pub user_id: i32,
    pub recipe_id: i32,
    pub added_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shopping_baskets)]
pub struct NewShoppingBasket {
    pub user_id: i32,
    pub recipe_id: i32,
    pub added_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct NewSubscription {
    pub follower_id: i32,
    pub author_id: i32,
    pub created_at: NaiveDateTime,
}
