// ABOUTME: Integration tests for category storage operations
// ABOUTME: Tests CRUD, name uniqueness, General protection, and scan reassignment on delete

use std::sync::Arc;

use scansheet_categories::{CategoryCreateInput, CategoryStorage, CategoryUpdateInput};
use scansheet_core::GENERAL_CATEGORY_ID;
use scansheet_storage::{connect, connect_in_memory, PoolSettings, StorageError};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn create_test_db() -> SqlitePool {
    connect_in_memory().await.unwrap()
}

fn input(name: &str) -> CategoryCreateInput {
    CategoryCreateInput {
        name: name.to_string(),
        description: None,
    }
}

async fn insert_scan(pool: &SqlitePool, id: &str, code: &str, category_id: &str, date: &str) {
    sqlx::query(
        "INSERT INTO scans (id, code, category_id, scan_date, scanned_at, source)
         VALUES (?, ?, ?, ?, '2024-09-02T08:00:00Z', 'qr')",
    )
    .bind(id)
    .bind(code)
    .bind(category_id)
    .bind(date)
    .execute(pool)
    .await
    .unwrap();
}

#[tokio::test]
async fn test_general_category_is_seeded() {
    let storage = CategoryStorage::new(create_test_db().await);

    let categories = storage.list_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert!(categories[0].is_general());
    assert_eq!(categories[0].name, "General");
    assert_eq!(categories[0].scan_count, 0);
}

#[tokio::test]
async fn test_create_category() {
    let storage = CategoryStorage::new(create_test_db().await);

    let category = storage
        .create_category(CategoryCreateInput {
            name: " Chemistry 101 ".to_string(),
            description: Some("Mon/Wed lab".to_string()),
        })
        .await
        .unwrap();

    assert!(category.id.starts_with("cat-"));
    assert_eq!(category.name, "Chemistry 101");
    assert_eq!(category.description.as_deref(), Some("Mon/Wed lab"));
    assert!(!category.is_general());
}

#[tokio::test]
async fn test_duplicate_name_conflicts_case_insensitively() {
    let storage = CategoryStorage::new(create_test_db().await);
    storage.create_category(input("Choir")).await.unwrap();

    let result = storage.create_category(input("choir")).await;
    assert!(matches!(result, Err(StorageError::Conflict(_))));

    let result = storage.create_category(input("general")).await;
    assert!(matches!(result, Err(StorageError::Conflict(_))));
}

#[tokio::test]
async fn test_list_categories_general_first_then_by_name() {
    let storage = CategoryStorage::new(create_test_db().await);
    for name in ["zoology", "Art", "biology"] {
        storage.create_category(input(name)).await.unwrap();
    }

    let names: Vec<_> = storage
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();

    assert_eq!(names, vec!["General", "Art", "biology", "zoology"]);
}

#[tokio::test]
async fn test_get_category_by_name() {
    let storage = CategoryStorage::new(create_test_db().await);
    let created = storage.create_category(input("Robotics")).await.unwrap();

    let found = storage.get_category_by_name("ROBOTICS").await.unwrap();
    assert_eq!(found.unwrap().id, created.id);
    assert!(storage.get_category_by_name("Nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_category() {
    let storage = CategoryStorage::new(create_test_db().await);
    let category = storage.create_category(input("Band")).await.unwrap();

    let updated = storage
        .update_category(
            &category.id,
            CategoryUpdateInput {
                name: Some("Marching Band".to_string()),
                description: Some("Fridays".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Marching Band");
    assert_eq!(updated.description.as_deref(), Some("Fridays"));
}

#[tokio::test]
async fn test_general_cannot_be_renamed_but_description_can_change() {
    let storage = CategoryStorage::new(create_test_db().await);

    let result = storage
        .update_category(
            GENERAL_CATEGORY_ID,
            CategoryUpdateInput {
                name: Some("Misc".to_string()),
                description: None,
            },
        )
        .await;
    assert!(matches!(result, Err(StorageError::InvalidInput(_))));

    let updated = storage
        .update_category(
            GENERAL_CATEGORY_ID,
            CategoryUpdateInput {
                name: None,
                description: Some("Catch-all".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Catch-all"));
}

#[tokio::test]
async fn test_rename_to_existing_name_conflicts() {
    let storage = CategoryStorage::new(create_test_db().await);
    storage.create_category(input("Alpha")).await.unwrap();
    let beta = storage.create_category(input("Beta")).await.unwrap();

    let result = storage
        .update_category(
            &beta.id,
            CategoryUpdateInput {
                name: Some("alpha".to_string()),
                description: None,
            },
        )
        .await;
    assert!(matches!(result, Err(StorageError::Conflict(_))));
}

#[tokio::test]
async fn test_delete_category_reassigns_scans_to_general() {
    let pool = create_test_db().await;
    let storage = CategoryStorage::new(pool.clone());
    let category = storage.create_category(input("Physics")).await.unwrap();

    insert_scan(&pool, "scan-1", "AAAAAAAAAA", &category.id, "2024-09-01").await;
    insert_scan(&pool, "scan-2", "BBBBBBBBBB", &category.id, "2024-09-01").await;
    // Same code and day already in General: the Physics copy collides
    insert_scan(&pool, "scan-3", "BBBBBBBBBB", GENERAL_CATEGORY_ID, "2024-09-01").await;

    assert_eq!(
        storage.get_category(&category.id).await.unwrap().scan_count,
        2
    );

    let outcome = storage.delete_category(&category.id).await.unwrap();
    assert_eq!(outcome.reassigned, 1);
    assert_eq!(outcome.dropped, 1);

    assert!(matches!(
        storage.get_category(&category.id).await,
        Err(StorageError::NotFound(_))
    ));

    let general = storage.get_category(GENERAL_CATEGORY_ID).await.unwrap();
    assert_eq!(general.scan_count, 2);

    let remaining: Vec<String> =
        sqlx::query_scalar("SELECT id FROM scans WHERE category_id = ? ORDER BY id")
            .bind(GENERAL_CATEGORY_ID)
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(remaining, vec!["scan-1", "scan-3"]);
}

#[tokio::test]
async fn test_general_cannot_be_deleted() {
    let storage = CategoryStorage::new(create_test_db().await);

    let result = storage.delete_category(GENERAL_CATEGORY_ID).await;
    assert!(matches!(result, Err(StorageError::InvalidInput(_))));
}

#[tokio::test]
async fn test_delete_missing_category() {
    let storage = CategoryStorage::new(create_test_db().await);

    let result = storage.delete_category("cat-missing").await;
    assert!(matches!(result, Err(StorageError::NotFound(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deletes_reassign_once_and_drop_collisions() {
    let temp_dir = TempDir::new().unwrap();
    let pool = connect(&PoolSettings::new(temp_dir.path().join("scansheet.db")))
        .await
        .unwrap();
    let storage = Arc::new(CategoryStorage::new(pool.clone()));

    let mut ids = Vec::new();
    for i in 0..6 {
        let category = storage
            .create_category(input(&format!("Session {}", i)))
            .await
            .unwrap();
        insert_scan(&pool, &format!("scan-{}", i), "ABCDEFGHJK", &category.id, "2024-09-02").await;
        ids.push(category.id);
    }

    let handles: Vec<_> = ids
        .into_iter()
        .map(|id| {
            let storage = Arc::clone(&storage);
            tokio::spawn(async move { storage.delete_category(&id).await })
        })
        .collect();

    let (mut reassigned, mut dropped) = (0, 0);
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        reassigned += outcome.reassigned;
        dropped += outcome.dropped;
    }

    assert_eq!(reassigned, 1);
    assert_eq!(dropped, 5);

    let categories = storage.list_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, GENERAL_CATEGORY_ID);
    assert_eq!(categories[0].scan_count, 1);
}
