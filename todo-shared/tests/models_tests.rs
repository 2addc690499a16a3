/// Integration tests for the Todo and User models against SQLite

use todo_shared::auth::password::{hash_password, verify_password};
use todo_shared::db::{Database, DatabaseConfig};
use todo_shared::models::{NewUser, Todo, User};

async fn open_db() -> Database {
    Database::open(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database")
}

fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

#[tokio::test]
async fn test_todo_insert_and_find() {
    let db = open_db().await;

    let outcome = Todo::insert(&db, "buy milk").await.unwrap();
    let todo = Todo::find_by_id(&db, outcome.generated_id)
        .await
        .unwrap()
        .expect("inserted todo should be found");

    assert_eq!(todo.id, outcome.generated_id);
    assert_eq!(todo.title, "buy milk");
    assert!(!todo.done);
}

#[tokio::test]
async fn test_todo_list_newest_first() {
    let db = open_db().await;

    Todo::insert(&db, "a").await.unwrap();
    Todo::insert(&db, "b").await.unwrap();

    let titles: Vec<String> = Todo::list(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();

    assert_eq!(titles, vec!["b", "a"]);
}

#[tokio::test]
async fn test_todo_updates_are_independent() {
    let db = open_db().await;
    let id = Todo::insert(&db, "draft").await.unwrap().generated_id;

    Todo::update_done(&db, id, true).await.unwrap();
    let todo = Todo::find_by_id(&db, id).await.unwrap().unwrap();
    assert_eq!(todo.title, "draft");
    assert!(todo.done);

    Todo::update_title(&db, id, "final").await.unwrap();
    let todo = Todo::find_by_id(&db, id).await.unwrap().unwrap();
    assert_eq!(todo.title, "final");
    assert!(todo.done);
}

#[tokio::test]
async fn test_todo_exists_and_delete() {
    let db = open_db().await;
    let id = Todo::insert(&db, "temp").await.unwrap().generated_id;

    assert!(Todo::exists(&db, id).await.unwrap());
    assert!(Todo::delete(&db, id).await.unwrap());
    assert!(!Todo::exists(&db, id).await.unwrap());
    assert!(!Todo::delete(&db, id).await.unwrap());
}

#[tokio::test]
async fn test_user_find_conflicting_matches_either_field() {
    let db = open_db().await;
    let id = User::insert(&db, &new_user("ada", "ada@example.com"))
        .await
        .unwrap()
        .generated_id;

    assert_eq!(
        User::find_conflicting(&db, "ada", "new@example.com").await.unwrap(),
        Some(id)
    );
    assert_eq!(
        User::find_conflicting(&db, "someone", "ada@example.com").await.unwrap(),
        Some(id)
    );
    assert_eq!(
        User::find_conflicting(&db, "grace", "grace@example.com").await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_user_duplicate_email_is_unique_violation() {
    let db = open_db().await;

    User::insert(&db, &new_user("ada", "shared@example.com"))
        .await
        .unwrap();
    let err = User::insert(&db, &new_user("grace", "shared@example.com"))
        .await
        .unwrap_err();

    assert!(err.is_unique_violation());
}

#[tokio::test]
async fn test_user_public_view_and_stored_hash() {
    let db = open_db().await;
    let hash = hash_password("s3cret-pass").unwrap();

    let id = User::insert(
        &db,
        &NewUser {
            username: "linus".to_string(),
            email: "linus@example.com".to_string(),
            password_hash: hash,
        },
    )
    .await
    .unwrap()
    .generated_id;

    let public = User::find_public_by_id(&db, id).await.unwrap().unwrap();
    assert_eq!(public.username, "linus");
    assert_eq!(public.email, "linus@example.com");

    let stored = User::find_by_username(&db, "linus").await.unwrap().unwrap();
    assert_eq!(stored.created_at, public.created_at);
    assert!(verify_password("s3cret-pass", &stored.password_hash).unwrap());
    assert!(!verify_password("wrong", &stored.password_hash).unwrap());
}
