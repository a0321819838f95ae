// ABOUTME: Integration tests for entry storage operations
// ABOUTME: Tests CRUD, search pagination, code rotation, cascading delete, and CSV import

use std::sync::Arc;

use scansheet_entries::{EntryCreateInput, EntryStorage, EntryUpdateInput};
use scansheet_storage::{connect, connect_in_memory, PoolSettings, StorageError};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn create_test_db() -> SqlitePool {
    connect_in_memory().await.unwrap()
}

fn input(name: &str) -> EntryCreateInput {
    EntryCreateInput {
        name: name.to_string(),
        notes: None,
    }
}

async fn insert_scan(pool: &SqlitePool, id: &str, code: &str, date: &str) {
    sqlx::query(
        "INSERT INTO scans (id, code, category_id, scan_date, scanned_at, source)
         VALUES (?, ?, 'cat-general', ?, '2024-09-02T08:00:00Z', 'qr')",
    )
    .bind(id)
    .bind(code)
    .bind(date)
    .execute(pool)
    .await
    .unwrap();
}

async fn scan_codes(pool: &SqlitePool) -> Vec<String> {
    sqlx::query_scalar("SELECT code FROM scans ORDER BY id")
        .fetch_all(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_entry() {
    let storage = EntryStorage::new(create_test_db().await);

    let entry = storage
        .create_entry(EntryCreateInput {
            name: "  Ada Lovelace ".to_string(),
            notes: Some("Front row".to_string()),
        })
        .await
        .unwrap();

    assert!(entry.id.starts_with("ent-"));
    assert_eq!(entry.name, "Ada Lovelace");
    assert_eq!(entry.notes.as_deref(), Some("Front row"));
    assert_eq!(entry.code.len(), 10);

    let fetched = storage.get_entry(&entry.id).await.unwrap();
    assert_eq!(fetched.code, entry.code);
}

#[tokio::test]
async fn test_create_entry_rejects_blank_name() {
    let storage = EntryStorage::new(create_test_db().await);

    let result = storage.create_entry(input("   ")).await;
    assert!(matches!(result, Err(StorageError::Validation(_))));
}

#[tokio::test]
async fn test_get_missing_entry_is_not_found() {
    let storage = EntryStorage::new(create_test_db().await);

    let result = storage.get_entry("ent-missing").await;
    assert!(matches!(result, Err(StorageError::NotFound(_))));
}

#[tokio::test]
async fn test_get_entry_by_code() {
    let storage = EntryStorage::new(create_test_db().await);
    let entry = storage.create_entry(input("Alan Turing")).await.unwrap();

    let found = storage.get_entry_by_code(&entry.code).await.unwrap();
    assert_eq!(found.unwrap().id, entry.id);

    let missing = storage.get_entry_by_code("ZZZZZZZZZZ").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_list_entries_sorted_and_paginated() {
    let storage = EntryStorage::new(create_test_db().await);
    for name in ["charlie", "Alice", "bob", "Dave", "eve"] {
        storage.create_entry(input(name)).await.unwrap();
    }

    let all = storage.list_entries(None).await.unwrap();
    let names: Vec<_> = all.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "bob", "charlie", "Dave", "eve"]);

    let (page2, total) = storage
        .list_entries_paginated(None, Some(2), Some(2))
        .await
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(page2.len(), 2);
    assert_eq!(page2[0].name, "charlie");
}

#[tokio::test]
async fn test_search_matches_name_and_code() {
    let storage = EntryStorage::new(create_test_db().await);
    let ada = storage.create_entry(input("Ada Lovelace")).await.unwrap();
    storage.create_entry(input("Grace Hopper")).await.unwrap();

    let (by_name, total) = storage
        .list_entries_paginated(Some("love"), None, None)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(by_name[0].id, ada.id);

    let by_code = storage
        .list_entries(Some(&ada.code.to_lowercase()))
        .await
        .unwrap();
    assert_eq!(by_code.len(), 1);

    // LIKE wildcards are matched literally
    let none = storage.list_entries(Some("%")).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_update_entry() {
    let storage = EntryStorage::new(create_test_db().await);
    let entry = storage
        .create_entry(EntryCreateInput {
            name: "Grace".to_string(),
            notes: Some("note".to_string()),
        })
        .await
        .unwrap();

    let updated = storage
        .update_entry(
            &entry.id,
            EntryUpdateInput {
                name: Some("Grace Hopper".to_string()),
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Grace Hopper");
    assert_eq!(updated.notes.as_deref(), Some("note"));
    assert_eq!(updated.code, entry.code);
    assert!(updated.updated_at >= entry.updated_at);

    let cleared = storage
        .update_entry(
            &entry.id,
            EntryUpdateInput {
                name: None,
                notes: Some(String::new()),
            },
        )
        .await
        .unwrap();
    assert!(cleared.notes.is_none());
}

#[tokio::test]
async fn test_delete_entry_removes_its_scans() {
    let pool = create_test_db().await;
    let storage = EntryStorage::new(pool.clone());
    let keep = storage.create_entry(input("Keep")).await.unwrap();
    let gone = storage.create_entry(input("Gone")).await.unwrap();

    insert_scan(&pool, "scan-1", &gone.code, "2024-09-01").await;
    insert_scan(&pool, "scan-2", &gone.code, "2024-09-02").await;
    insert_scan(&pool, "scan-3", &keep.code, "2024-09-02").await;

    let outcome = storage.delete_entry(&gone.id).await.unwrap();
    assert_eq!(outcome.scans_removed, 2);

    assert!(matches!(
        storage.get_entry(&gone.id).await,
        Err(StorageError::NotFound(_))
    ));
    assert_eq!(scan_codes(&pool).await, vec![keep.code]);
}

#[tokio::test]
async fn test_delete_missing_entry() {
    let storage = EntryStorage::new(create_test_db().await);

    let result = storage.delete_entry("ent-missing").await;
    assert!(matches!(result, Err(StorageError::NotFound(_))));
}

#[tokio::test]
async fn test_regenerate_code_moves_scans() {
    let pool = create_test_db().await;
    let storage = EntryStorage::new(pool.clone());
    let entry = storage.create_entry(input("Rotating")).await.unwrap();
    let other = storage.create_entry(input("Other")).await.unwrap();

    insert_scan(&pool, "scan-1", &entry.code, "2024-09-01").await;
    insert_scan(&pool, "scan-2", &entry.code, "2024-09-02").await;
    insert_scan(&pool, "scan-3", &other.code, "2024-09-02").await;

    let rotated = storage.regenerate_code(&entry.id).await.unwrap();
    assert_ne!(rotated.code, entry.code);
    assert_eq!(rotated.name, entry.name);

    assert_eq!(
        scan_codes(&pool).await,
        vec![rotated.code.clone(), rotated.code.clone(), other.code]
    );
    assert!(storage.get_entry_by_code(&entry.code).await.unwrap().is_none());
}

#[tokio::test]
async fn test_regenerate_code_missing_entry() {
    let storage = EntryStorage::new(create_test_db().await);

    let result = storage.regenerate_code("ent-missing").await;
    assert!(matches!(result, Err(StorageError::NotFound(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rotations_and_deletes_on_file_database() {
    let temp_dir = TempDir::new().unwrap();
    let pool = connect(&PoolSettings::new(temp_dir.path().join("scansheet.db")))
        .await
        .unwrap();
    let storage = Arc::new(EntryStorage::new(pool.clone()));

    let mut entries = Vec::new();
    for i in 0..20 {
        let entry = storage.create_entry(input(&format!("Entry {}", i))).await.unwrap();
        insert_scan(&pool, &format!("scan-{}", i), &entry.code, "2024-09-02").await;
        entries.push(entry);
    }

    let mut handles = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let storage = Arc::clone(&storage);
        let id = entry.id.clone();
        handles.push(tokio::spawn(async move {
            if i % 4 == 0 {
                storage.delete_entry(&id).await.map(|_| ())
            } else {
                storage.regenerate_code(&id).await.map(|_| ())
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let (remaining, total) = storage.list_entries_paginated(None, Some(100), None).await.unwrap();
    assert_eq!(total, 15);
    let mut codes: Vec<String> = remaining.into_iter().map(|e| e.code).collect();
    codes.sort();
    let mut scans = scan_codes(&pool).await;
    scans.sort();
    assert_eq!(scans, codes);
    for entry in &entries {
        assert!(!codes.contains(&entry.code));
    }
}

#[tokio::test]
async fn test_get_entries_by_ids() {
    let storage = EntryStorage::new(create_test_db().await);
    let b = storage.create_entry(input("Bravo")).await.unwrap();
    let a = storage.create_entry(input("Alpha")).await.unwrap();
    storage.create_entry(input("Charlie")).await.unwrap();

    let found = storage
        .get_entries_by_ids(&[b.id.clone(), "ent-missing".to_string(), a.id.clone()])
        .await
        .unwrap();

    let ids: Vec<_> = found.iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids, vec![a.id, b.id]);
    assert!(storage.get_entries_by_ids(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_import_csv() {
    let storage = EntryStorage::new(create_test_db().await);

    let csv = "name,notes\nAda Lovelace,math\n,\nGrace Hopper,\n";
    let summary = storage.import_csv(csv).await.unwrap();

    assert_eq!(summary.created.len(), 2);
    assert_eq!(summary.skipped, 1);
    assert!(summary.errors.is_empty());

    let all = storage.list_entries(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_ne!(all[0].code, all[1].code);
}

#[tokio::test]
async fn test_import_csv_without_name_column() {
    let storage = EntryStorage::new(create_test_db().await);

    let result = storage.import_csv("title\nfoo\n").await;
    assert!(matches!(result, Err(StorageError::InvalidInput(_))));
    assert!(storage.list_entries(None).await.unwrap().is_empty());
}
