// ==========================================
// 包装规格存储集成测试
// ==========================================
// 测试目标: SQLite / 内存两种实现的读写语义一致
// ==========================================

mod test_helpers;

use pack_planner::config::{InMemoryPackSizeProvider, PackSizeProvider};
use pack_planner::repository::PackSizeRepository;
use std::sync::Arc;
use test_helpers::{create_test_db, open_shared_connection};

fn sqlite_provider() -> (tempfile::NamedTempFile, Arc<dyn PackSizeProvider>) {
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let repo = PackSizeRepository::new(&db_path).expect("Failed to create repo");
    (temp_file, Arc::new(repo))
}

async fn check_delete_twice_is_idempotent(provider: Arc<dyn PackSizeProvider>) {
    provider.write(&[1, 2, 3, 4]).await.unwrap();

    provider.delete(3).await.unwrap();
    assert_eq!(provider.read().await.unwrap(), vec![1, 2, 4]);

    provider.delete(3).await.unwrap();
    assert_eq!(provider.read().await.unwrap(), vec![1, 2, 4]);
}

async fn check_merge_is_union(provider: Arc<dyn PackSizeProvider>) {
    provider.write(&[250, 500]).await.unwrap();
    provider.merge(&[500, 750, 100]).await.unwrap();
    assert_eq!(provider.read().await.unwrap(), vec![100, 250, 500, 750]);
}

#[tokio::test]
async fn test_sqlite_delete_twice_is_idempotent() {
    let (_temp_file, provider) = sqlite_provider();
    check_delete_twice_is_idempotent(provider).await;
}

#[tokio::test]
async fn test_in_memory_delete_twice_is_idempotent() {
    check_delete_twice_is_idempotent(Arc::new(InMemoryPackSizeProvider::default())).await;
}

#[tokio::test]
async fn test_sqlite_merge_is_union() {
    let (_temp_file, provider) = sqlite_provider();
    check_merge_is_union(provider).await;
}

#[tokio::test]
async fn test_in_memory_merge_is_union() {
    check_merge_is_union(Arc::new(InMemoryPackSizeProvider::default())).await;
}

#[tokio::test]
async fn test_sqlite_sizes_survive_reopen() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    {
        let repo = PackSizeRepository::new(&db_path).unwrap();
        repo.replace_all(&[23, 31, 53]).unwrap();
    }

    let conn = open_shared_connection(&db_path).unwrap();
    let repo = PackSizeRepository::from_connection(conn).unwrap();
    assert_eq!(repo.list().unwrap(), vec![23, 31, 53]);
}
