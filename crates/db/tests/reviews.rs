//! Integration tests for the review and comment repositories.

use assert_matches::assert_matches;
use sqlx::PgPool;
use yamdb_core::types::DbId;
use yamdb_db::models::comment::NewComment;
use yamdb_db::models::review::NewReview;
use yamdb_db::models::title::NewTitle;
use yamdb_db::models::user::NewUser;
use yamdb_db::repositories::{CommentRepo, ReviewRepo, TitleRepo, UserRepo};

async fn setup(pool: &PgPool) -> (DbId, DbId) {
    let title_id = TitleRepo::create(
        pool,
        &NewTitle {
            name: "Heat".to_string(),
            year: 1995,
            description: None,
            category_id: None,
            genre_ids: Vec::new(),
        },
    )
    .await
    .unwrap();
    let author = UserRepo::create(pool, &NewUser::signup("critic", "critic@test.com"))
        .await
        .unwrap();
    (title_id, author.id)
}

fn new_review(title_id: DbId, author_id: DbId, score: i32) -> NewReview {
    NewReview {
        title_id,
        author_id,
        text: "Tense".to_string(),
        score,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_review_returns_author_username(pool: PgPool) {
    let (title_id, author_id) = setup(&pool).await;

    let review = ReviewRepo::create(&pool, &new_review(title_id, author_id, 8))
        .await
        .unwrap();

    assert_eq!(review.author, "critic");
    assert_eq!(review.score, 8);
    assert!(ReviewRepo::exists_for_author(&pool, title_id, author_id)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_review_violates_unique_constraint(pool: PgPool) {
    let (title_id, author_id) = setup(&pool).await;
    ReviewRepo::create(&pool, &new_review(title_id, author_id, 8))
        .await
        .unwrap();

    let err = ReviewRepo::create(&pool, &new_review(title_id, author_id, 3))
        .await
        .unwrap_err();

    assert_matches!(
        err,
        sqlx::Error::Database(ref db) if db.constraint() == Some("uq_reviews_author_title")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_score_check_constraint(pool: PgPool) {
    let (title_id, author_id) = setup(&pool).await;

    let err = ReviewRepo::create(&pool, &new_review(title_id, author_id, 11))
        .await
        .unwrap_err();

    assert_matches!(
        err,
        sqlx::Error::Database(ref db) if db.constraint() == Some("ck_reviews_score")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_keeps_unset_fields(pool: PgPool) {
    let (title_id, author_id) = setup(&pool).await;
    let review = ReviewRepo::create(&pool, &new_review(title_id, author_id, 8))
        .await
        .unwrap();

    let updated = ReviewRepo::update(&pool, review.id, None, Some(4))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.text, "Tense");
    assert_eq!(updated.score, 4);
    assert_eq!(updated.author, "critic");
    assert!(ReviewRepo::update(&pool, 999_999, Some("x"), None)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_in_title_scopes_by_title(pool: PgPool) {
    let (title_id, author_id) = setup(&pool).await;
    let review = ReviewRepo::create(&pool, &new_review(title_id, author_id, 8))
        .await
        .unwrap();

    assert!(ReviewRepo::find_in_title(&pool, title_id, review.id)
        .await
        .unwrap()
        .is_some());
    assert!(ReviewRepo::find_in_title(&pool, title_id + 1, review.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_comments_lifecycle(pool: PgPool) {
    let (title_id, author_id) = setup(&pool).await;
    let review = ReviewRepo::create(&pool, &new_review(title_id, author_id, 8))
        .await
        .unwrap();

    for text in ["first", "second", "third"] {
        CommentRepo::create(
            &pool,
            &NewComment {
                review_id: review.id,
                author_id,
                text: text.to_string(),
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(CommentRepo::count_for_review(&pool, review.id).await.unwrap(), 3);
    let page = CommentRepo::list_for_review(&pool, review.id, 2, 1)
        .await
        .unwrap();
    let texts: Vec<_> = page.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["second", "third"]);

    let edited = CommentRepo::update(&pool, page[0].id, Some("edited"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.text, "edited");
    assert_eq!(edited.author, "critic");

    assert!(ReviewRepo::delete(&pool, review.id).await.unwrap());
    assert_eq!(CommentRepo::count_for_review(&pool, review.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_user_removes_their_reviews(pool: PgPool) {
    let (title_id, author_id) = setup(&pool).await;
    ReviewRepo::create(&pool, &new_review(title_id, author_id, 8))
        .await
        .unwrap();

    assert!(UserRepo::delete_by_username(&pool, "critic").await.unwrap());

    assert_eq!(ReviewRepo::count_for_title(&pool, title_id).await.unwrap(), 0);
}
