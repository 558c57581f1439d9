mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use common::{payload, TestContext};
use foodgram::utils::token_utils::generate_jwt;

#[actix_web::test]
async fn anonymous_reads_are_allowed_but_writes_are_not() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let flour = ctx.ingredient("Flour", "g");
    let milk = ctx.ingredient("Milk", "ml");
    let tag = ctx.tag("breakfast");

    for uri in ["/api/recipes", "/api/tags", "/api/ingredients", "/api/users"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK, "{uri}");
    }

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .set_json(payload("Pancakes", &[(&flour, 1), (&milk, 1)], &[&tag]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"].is_string());
    assert_eq!(ctx.count("recipes"), 0);
}

#[actix_web::test]
async fn invalid_tokens_are_rejected_everywhere() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let foreign = generate_jwt("1", b"someone-elses-secret").unwrap();

    for token in ["garbage", foreign.as_str()] {
        let req = test::TestRequest::get()
            .uri("/api/recipes")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn token_for_deleted_user_is_unauthorized() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let token = generate_jwt("4242", common::SECRET).unwrap();

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn ingredient_search_is_a_case_sensitive_prefix() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    ctx.ingredient("Salt", "g");
    ctx.ingredient("Salmon", "g");
    ctx.ingredient("sal ammoniac", "g");
    ctx.ingredient("Sugar", "g");

    let req = test::TestRequest::get().uri("/api/ingredients?name=Sal").to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Salmon", "Salt"]);

    let all: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/ingredients").to_request()).await;
    assert_eq!(all.as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn tags_and_ingredients_by_id() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let tag = ctx.tag("dinner");
    let salt = ctx.ingredient("Salt", "g");

    let req = test::TestRequest::get().uri(&format!("/api/tags/{}", tag.id)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["slug"], "dinner");
    assert_eq!(body["color"], "#E26C2D");

    let req = test::TestRequest::get().uri(&format!("/api/ingredients/{}", salt.id)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["measurement_unit"], "g");

    let req = test::TestRequest::get().uri("/api/tags/77").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
