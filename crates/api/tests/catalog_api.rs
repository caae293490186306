//! HTTP-level integration tests for categories and genres.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, delete_auth, get, post_json, post_json_auth};
use serde_json::json;
use sqlx::PgPool;
use yamdb_core::roles::Role;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_list_uses_page_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/v1/categories").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 0);
    assert!(json["next"].is_null());
    assert!(json["previous"].is_null());
    assert_eq!(json["results"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_creates_category(pool: PgPool) {
    let admin = common::user_token(&pool, "admin", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/v1/categories",
        json!({ "name": "Film", "slug": "film" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await, json!({ "name": "Film", "slug": "film" }));

    let json = body_json(get(app, "/v1/categories").await).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["slug"], "film");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_superuser_flag_grants_catalog_writes(pool: PgPool) {
    let user = common::create_user(&pool, "root", Role::User).await;
    let user = yamdb_db::repositories::UserRepo::promote_to_superuser(&pool, user.id)
        .await
        .unwrap()
        .unwrap();
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/v1/genres",
        json!({ "name": "Rock", "slug": "rock" }),
        &common::token_for(&user),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_catalog_writes_require_admin(pool: PgPool) {
    let user = common::user_token(&pool, "plain", Role::User).await;
    let moderator = common::user_token(&pool, "mod", Role::Moderator).await;
    let app = common::build_test_app(pool);
    let body = json!({ "name": "Rock", "slug": "rock" });

    let anonymous = post_json(app.clone(), "/v1/genres", body.clone()).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let as_user = post_json_auth(app.clone(), "/v1/genres", body.clone(), &user).await;
    assert_eq!(as_user.status(), StatusCode::FORBIDDEN);

    let as_moderator = post_json_auth(app.clone(), "/v1/genres", body, &moderator).await;
    assert_eq!(as_moderator.status(), StatusCode::FORBIDDEN);

    let anonymous_delete = delete(app, "/v1/genres/rock").await;
    assert_eq!(anonymous_delete.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_and_invalid_slugs_are_rejected(pool: PgPool) {
    let admin = common::user_token(&pool, "admin", Role::Admin).await;
    let app = common::build_test_app(pool);
    common::create_genre(&app, &admin, "Rock", "rock").await;

    let duplicate = post_json_auth(
        app.clone(),
        "/v1/genres",
        json!({ "name": "Rock again", "slug": "rock" }),
        &admin,
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
    let json = body_json(duplicate).await;
    assert!(json["fields"]["slug"].is_array());

    let invalid = post_json_auth(
        app.clone(),
        "/v1/genres",
        json!({ "name": "Jazz", "slug": "jazz & blues" }),
        &admin,
    )
    .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let too_long = post_json_auth(
        app,
        "/v1/genres",
        json!({ "name": "Jazz", "slug": "j".repeat(51) }),
        &admin,
    )
    .await;
    assert_eq!(too_long.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_filters_by_name(pool: PgPool) {
    let admin = common::user_token(&pool, "admin", Role::Admin).await;
    let app = common::build_test_app(pool);
    common::create_genre(&app, &admin, "Rock", "rock").await;
    common::create_genre(&app, &admin, "Punk Rock", "punk").await;
    common::create_genre(&app, &admin, "Jazz", "jazz").await;

    let json = body_json(get(app, "/v1/genres?search=rock").await).await;

    assert_eq!(json["count"], 2);
    let slugs: Vec<&str> = json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["punk", "rock"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pagination_links_and_bounds(pool: PgPool) {
    let admin = common::user_token(&pool, "admin", Role::Admin).await;
    let app = common::build_test_app(pool);
    for i in 0..12 {
        common::create_genre(&app, &admin, &format!("Genre {i:02}"), &format!("g{i:02}")).await;
    }

    let first = body_json(get(app.clone(), "/v1/genres").await).await;
    assert_eq!(first["count"], 12);
    assert_eq!(first["results"].as_array().unwrap().len(), 10);
    assert_eq!(first["next"], "/v1/genres?page=2");
    assert!(first["previous"].is_null());

    let second = body_json(get(app.clone(), "/v1/genres?page=2").await).await;
    assert_eq!(second["results"].as_array().unwrap().len(), 2);
    assert!(second["next"].is_null());
    assert_eq!(second["previous"], "/v1/genres");

    let beyond = get(app.clone(), "/v1/genres?page=3").await;
    assert_eq!(beyond.status(), StatusCode::NOT_FOUND);

    let zero = get(app, "/v1/genres?page=0").await;
    assert_eq!(zero.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_by_slug(pool: PgPool) {
    let admin = common::user_token(&pool, "admin", Role::Admin).await;
    let app = common::build_test_app(pool);
    common::create_category(&app, &admin, "Book", "book").await;

    let response = delete_auth(app.clone(), "/v1/categories/book", &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let again = delete_auth(app, "/v1/categories/book", &admin).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_category_keeps_its_titles(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (admin, title_id) = common::seed_title(&pool, &app).await;

    let response = delete_auth(app.clone(), "/v1/categories/film", &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/v1/titles/{title_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["category"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_genre_unlinks_titles(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (admin, title_id) = common::seed_title(&pool, &app).await;

    let response = delete_auth(app.clone(), "/v1/genres/drama", &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(app, &format!("/v1/titles/{title_id}")).await).await;
    assert_eq!(json["genre"], json!([]));
}
