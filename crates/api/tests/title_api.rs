//! HTTP-level integration tests for titles.

mod common;

use axum::http::StatusCode;
use chrono::Datelike;
use common::{body_json, delete_auth, get, patch_json, patch_json_auth, post_json_auth};
use serde_json::json;
use sqlx::PgPool;
use yamdb_core::roles::Role;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_title_returns_full_representation(pool: PgPool) {
    let admin = common::user_token(&pool, "admin", Role::Admin).await;
    let app = common::build_test_app(pool);
    common::create_genre(&app, &admin, "Drama", "drama").await;
    common::create_genre(&app, &admin, "Crime", "crime").await;
    common::create_category(&app, &admin, "Film", "film").await;

    let response = post_json_auth(
        app,
        "/v1/titles",
        json!({
            "name": "The Godfather",
            "year": 1972,
            "description": "Family business",
            "genre": ["drama", "crime"],
            "category": "film",
        }),
        &admin,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["id"].is_i64());
    assert_eq!(json["name"], "The Godfather");
    assert_eq!(json["year"], 1972);
    assert!(json["rating"].is_null());
    assert_eq!(json["description"], "Family business");
    assert_eq!(
        json["genre"],
        json!([
            { "name": "Crime", "slug": "crime" },
            { "name": "Drama", "slug": "drama" },
        ])
    );
    assert_eq!(json["category"], json!({ "name": "Film", "slug": "film" }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_title_validation(pool: PgPool) {
    let admin = common::user_token(&pool, "admin", Role::Admin).await;
    let app = common::build_test_app(pool);
    common::create_genre(&app, &admin, "Drama", "drama").await;
    let next_year = chrono::Utc::now().year() + 1;

    let cases = [
        json!({ "name": "No genres", "year": 2000, "genre": [] }),
        json!({ "name": "Future", "year": next_year, "genre": ["drama"] }),
        json!({ "name": "Unknown genre", "year": 2000, "genre": ["nope"] }),
        json!({ "name": "Unknown category", "year": 2000, "genre": ["drama"], "category": "nope" }),
        json!({ "name": "", "year": 2000, "genre": ["drama"] }),
        json!({ "name": "x".repeat(257), "year": 2000, "genre": ["drama"] }),
        json!({ "name": "Missing year", "genre": ["drama"] }),
    ];

    for body in cases {
        let response = post_json_auth(app.clone(), "/v1/titles", body.clone(), &admin).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "accepted {body}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_current_year_is_allowed(pool: PgPool) {
    let admin = common::user_token(&pool, "admin", Role::Admin).await;
    let app = common::build_test_app(pool);
    common::create_genre(&app, &admin, "Drama", "drama").await;

    let response = post_json_auth(
        app,
        "/v1/titles",
        json!({ "name": "Fresh", "year": chrono::Utc::now().year(), "genre": ["drama"] }),
        &admin,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_json(response).await["category"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_admins_cannot_write_titles(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_admin, title_id) = common::seed_title(&pool, &app).await;
    let user = common::user_token(&pool, "plain", Role::User).await;
    let uri = format!("/v1/titles/{title_id}");

    let anonymous = patch_json(app.clone(), &uri, json!({ "name": "X" })).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let as_user = patch_json_auth(app.clone(), &uri, json!({ "name": "X" }), &user).await;
    assert_eq!(as_user.status(), StatusCode::FORBIDDEN);

    let delete = delete_auth(app.clone(), &uri, &user).await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);

    let read = get(app, &uri).await;
    assert_eq!(read.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (admin, _) = common::seed_title(&pool, &app).await;
    common::create_genre(&app, &admin, "Comedy", "comedy").await;
    common::create_category(&app, &admin, "Book", "book").await;
    common::create_title(
        &app,
        &admin,
        json!({ "name": "Three Men in a Boat", "year": 1889, "genre": ["comedy"], "category": "book" }),
    )
    .await;
    common::create_title(
        &app,
        &admin,
        json!({ "name": "Some Like It Hot", "year": 1959, "genre": ["comedy"], "category": "film" }),
    )
    .await;

    let names = |json: serde_json::Value| -> Vec<String> {
        json["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect()
    };

    let all = body_json(get(app.clone(), "/v1/titles").await).await;
    assert_eq!(all["count"], 3);

    let by_genre = body_json(get(app.clone(), "/v1/titles?genre=comedy").await).await;
    assert_eq!(names(by_genre), vec!["Some Like It Hot", "Three Men in a Boat"]);

    let by_category = body_json(get(app.clone(), "/v1/titles?category=film").await).await;
    assert_eq!(names(by_category), vec!["Some Like It Hot", "The Godfather"]);

    let by_year = body_json(get(app.clone(), "/v1/titles?year=1889").await).await;
    assert_eq!(names(by_year), vec!["Three Men in a Boat"]);

    let by_name = body_json(get(app.clone(), "/v1/titles?name=god").await).await;
    assert_eq!(names(by_name), vec!["The Godfather"]);

    let combined =
        body_json(get(app.clone(), "/v1/titles?genre=comedy&category=book").await).await;
    assert_eq!(names(combined), vec!["Three Men in a Boat"]);

    let bad_year = get(app, "/v1/titles?year=abc").await;
    assert_eq!(bad_year.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_updates_only_given_fields(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (admin, title_id) = common::seed_title(&pool, &app).await;
    common::create_genre(&app, &admin, "Crime", "crime").await;
    let uri = format!("/v1/titles/{title_id}");

    let response = patch_json_auth(
        app.clone(),
        &uri,
        json!({ "description": "An offer", "genre": ["crime"] }),
        &admin,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "The Godfather");
    assert_eq!(json["year"], 1972);
    assert_eq!(json["description"], "An offer");
    assert_eq!(json["genre"], json!([{ "name": "Crime", "slug": "crime" }]));
    assert_eq!(json["category"]["slug"], "film");

    let empty_genres = patch_json_auth(app.clone(), &uri, json!({ "genre": [] }), &admin).await;
    assert_eq!(empty_genres.status(), StatusCode::BAD_REQUEST);

    let missing = patch_json_auth(app, "/v1/titles/999999", json!({ "name": "X" }), &admin).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_null_clears_category_and_description(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (admin, title_id) = common::seed_title(&pool, &app).await;
    let uri = format!("/v1/titles/{title_id}");

    let described =
        patch_json_auth(app.clone(), &uri, json!({ "description": "An offer" }), &admin).await;
    assert_eq!(described.status(), StatusCode::OK);
    assert_eq!(body_json(described).await["category"]["slug"], "film");

    let response = patch_json_auth(
        app.clone(),
        &uri,
        json!({ "category": null, "description": null }),
        &admin,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["category"].is_null());
    assert!(json["description"].is_null());
    assert_eq!(json["name"], "The Godfather");
    assert_eq!(json["genre"], json!([{ "name": "Drama", "slug": "drama" }]));

    let unknown = patch_json_auth(app, &uri, json!({ "category": "book" }), &admin).await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_title(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (admin, title_id) = common::seed_title(&pool, &app).await;
    let uri = format!("/v1/titles/{title_id}");

    let response = delete_auth(app.clone(), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
