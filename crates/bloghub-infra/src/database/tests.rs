use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Duration;
use sea_orm::{DatabaseBackend, DbConn, DbErr, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use bloghub_core::domain::{Category, NewPost, Post};
use bloghub_core::error::RepoError;
use bloghub_core::ports::{BaseRepository, CategoryRepository, PostRepository};
use bloghub_core::query::PostPredicate;

use crate::database::entity::{category, post, post_category};
use crate::database::error::repo_err;
use crate::database::postgres_repo::{PostgresCategoryRepository, PostgresPostRepository};

fn post_model(id: Uuid, title: &str, slug: &str) -> post::Model {
    let now = chrono::Utc::now();
    post::Model {
        id,
        title: title.to_owned(),
        slug: slug.to_owned(),
        content: "Content".to_owned(),
        excerpt: None,
        published: true,
        author_id: "default-author".to_owned(),
        image_url: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn category_model(name: &str, slug: &str) -> category::Model {
    let now = chrono::Utc::now();
    category::Model {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        slug: slug.to_owned(),
        description: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn link_model(post_id: Uuid, category_id: Uuid, offset_us: i64) -> post_category::Model {
    post_category::Model {
        id: Uuid::new_v4(),
        post_id,
        category_id,
        created_at: (chrono::Utc::now() + Duration::microseconds(offset_us)).into(),
    }
}

fn domain_post(title: &str, slug: &str) -> Post {
    let input = NewPost {
        title: title.into(),
        content: "Content".into(),
        ..Default::default()
    };
    Post::new("default-author".into(), slug.into(), &input)
}

/// Takes the connection back from a dropped repository and renders every
/// statement it recorded.
fn statement_log(db: Arc<DbConn>) -> String {
    let db = Arc::try_unwrap(db)
        .ok()
        .expect("repository should be dropped before reading the log");
    format!("{:?}", db.into_transaction_log())
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, "Test Post", "test-post")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
}

#[tokio::test]
async fn test_find_category_by_slug() {
    let id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![category::Model {
            id,
            name: "Web Development".to_owned(),
            slug: "web-development".to_owned(),
            description: Some("All things web".to_owned()),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    let category: Category = repo.find_by_slug("web-development").await.unwrap().unwrap();
    assert_eq!(category.id, id);
    assert_eq!(category.name, "Web Development");
    assert_eq!(category.description.as_deref(), Some("All things web"));
}

#[tokio::test]
async fn test_unknown_post_slug_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(repo.find_by_slug("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_slug_exists_counts_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![BTreeMap::from([(
            "num_items",
            Value::BigInt(Some(1)),
        )])]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(repo.slug_exists("taken").await.unwrap());
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    let err = BaseRepository::<Category, Uuid>::delete(&repo, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound));
}

#[tokio::test]
async fn test_insert_with_categories_writes_post_and_links() {
    let post = domain_post("Hello", "hello");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post.id, "Hello", "hello")]])
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 2,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let saved = repo
        .insert_with_categories(post.clone(), &[Uuid::new_v4(), Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(saved.id, post.id);
    assert_eq!(saved.slug, "hello");
}

#[tokio::test]
async fn test_find_post_by_slug_attaches_categories_in_link_order() {
    let post_id = Uuid::new_v4();
    let tech = category_model("Tech", "tech");
    let rust = category_model("Rust", "rust");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, "Hello", "hello")]])
        .append_query_results(vec![vec![
            (link_model(post_id, tech.id, 0), tech.clone()),
            (link_model(post_id, rust.id, 1), rust.clone()),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let found = repo.find_by_slug("hello").await.unwrap().unwrap();
    assert_eq!(found.post.id, post_id);
    let slugs: Vec<_> = found.categories.iter().map(|c| c.slug.as_str()).collect();
    assert_eq!(slugs, ["tech", "rust"]);
}

#[tokio::test]
async fn test_page_ids_query_shape() {
    let id = Uuid::new_v4();
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![BTreeMap::from([("id", Value::from(id))])]])
            .into_connection(),
    );

    let repo = PostgresPostRepository::new(db.clone());
    let predicate = PostPredicate {
        published: Some(true),
        search: Some("rust".into()),
        ids: None,
    };

    let ids = repo.page_ids(&predicate, 10, 20).await.unwrap();
    assert_eq!(ids, vec![id]);

    drop(repo);
    let log = statement_log(db);
    assert!(log.contains(r#"SELECT \"posts\".\"id\" FROM \"posts\""#), "{log}");
    assert!(log.contains(r#"\"posts\".\"published\" = $1"#), "{log}");
    assert_eq!(log.matches("ESCAPE").count(), 3, "{log}");
    assert!(
        log.contains(r#"ORDER BY \"posts\".\"created_at\" DESC, \"posts\".\"id\" DESC"#),
        "{log}"
    );
    assert!(log.contains("LIMIT $"), "{log}");
    assert!(log.contains("OFFSET $"), "{log}");
    assert!(log.contains("%rust%"), "{log}");
}

#[tokio::test]
async fn test_rows_for_keeps_page_order() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let tech = category_model("Tech", "tech");

    // The database hands posts back in its own order.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            post_model(second, "Second", "second"),
            post_model(first, "First", "first"),
        ]])
        .append_query_results(vec![vec![(link_model(second, tech.id, 0), tech.clone())]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let rows = repo.rows_for(&[first, second]).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].post.id, first);
    assert!(rows[0].category.is_none());
    assert_eq!(rows[1].post.id, second);
    assert_eq!(rows[1].category.as_ref().map(|c| c.id), Some(tech.id));
}

#[tokio::test]
async fn test_rows_for_empty_page_skips_queries() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let repo = PostgresPostRepository::new(db.clone());

    assert!(repo.rows_for(&[]).await.unwrap().is_empty());

    drop(repo);
    assert_eq!(statement_log(db), "[]");
}

#[tokio::test]
async fn test_insert_with_categories_rolls_back_on_link_failure() {
    let post = domain_post("Hello", "hello");

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post.id, "Hello", "hello")]])
            .append_exec_errors(vec![DbErr::Custom("link insert failed".into())])
            .into_connection(),
    );

    let repo = PostgresPostRepository::new(db.clone());

    let err = repo
        .insert_with_categories(post, &[Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Query(_)));

    drop(repo);
    let log = statement_log(db);
    assert!(log.contains("ROLLBACK"), "{log}");
    assert!(!log.contains("COMMIT"), "{log}");
}

#[tokio::test]
async fn test_update_with_categories_replaces_links_in_one_transaction() {
    let post = domain_post("Hello", "hello");

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post.id, "Hello", "hello")]])
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                },
            ])
            .into_connection(),
    );

    let repo = PostgresPostRepository::new(db.clone());

    let saved = repo
        .update_with_categories(post.clone(), Some(&[Uuid::new_v4(), Uuid::new_v4()]))
        .await
        .unwrap();
    assert_eq!(saved.id, post.id);

    drop(repo);
    let log = statement_log(db);
    assert!(log.contains(r#"DELETE FROM \"post_categories\""#), "{log}");
    assert!(log.contains(r#"INSERT INTO \"post_categories\""#), "{log}");
    assert!(log.contains("COMMIT"), "{log}");
}

#[tokio::test]
async fn test_update_without_category_ids_leaves_links_alone() {
    let post = domain_post("Hello", "hello");

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post.id, "Hello", "hello")]])
            .into_connection(),
    );

    let repo = PostgresPostRepository::new(db.clone());
    repo.update_with_categories(post, None).await.unwrap();

    drop(repo);
    let log = statement_log(db);
    assert!(!log.contains("post_categories"), "{log}");
    assert!(log.contains("COMMIT"), "{log}");
}

#[tokio::test]
async fn test_update_with_categories_rolls_back_on_link_failure() {
    let post = domain_post("Hello", "hello");

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post.id, "Hello", "hello")]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_exec_errors(vec![DbErr::Custom("link insert failed".into())])
            .into_connection(),
    );

    let repo = PostgresPostRepository::new(db.clone());

    let err = repo
        .update_with_categories(post, Some(&[Uuid::new_v4()]))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Query(_)));

    drop(repo);
    let log = statement_log(db);
    assert!(log.contains("ROLLBACK"), "{log}");
    assert!(!log.contains("COMMIT"), "{log}");
}

#[test]
fn test_repo_err_classification() {
    assert!(matches!(repo_err(DbErr::RecordNotUpdated), RepoError::NotFound));
    assert!(matches!(
        repo_err(DbErr::RecordNotFound("post".into())),
        RepoError::NotFound
    ));
    assert!(matches!(
        repo_err(DbErr::Custom("boom".into())),
        RepoError::Query(_)
    ));
}
