// ==========================================
// 订单装箱规划 - 包装规格仓储
// ==========================================
// 职责: 管理 pack_size 表（每行一个规格，主键去重）
// 红线: Repository 不做业务逻辑，规格合法性由 API 层校验
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct PackSizeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PackSizeRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 建表统一由 db::ensure_schema 维护
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        crate::db::ensure_schema(&conn)?;
        Ok(())
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 读取全部规格（升序）
    pub fn list(&self) -> RepositoryResult<Vec<u64>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT size FROM pack_size ORDER BY size ASC")?;
        let sizes = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;

        sizes
            .into_iter()
            .map(|s| {
                u64::try_from(s).map_err(|_| RepositoryError::FieldValueError {
                    field: "size".to_string(),
                    message: format!("非正规格: {}", s),
                })
            })
            .collect()
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM pack_size", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 整体替换（事务内先清空再写入）
    pub fn replace_all(&self, sizes: &[u64]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM pack_size", [])?;
        let inserted = insert_ignore(&tx, sizes)?;
        tx.commit()?;
        Ok(inserted)
    }

    /// 合并写入（与已有规格取并集）
    ///
    /// # 返回
    /// 新增的规格数量（已存在的不计）
    pub fn merge(&self, sizes: &[u64]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let inserted = insert_ignore(&tx, sizes)?;
        tx.commit()?;
        Ok(inserted)
    }

    /// 删除单个规格（幂等）
    ///
    /// # 返回
    /// - true: 删除了一行
    /// - false: 规格本不存在
    pub fn delete(&self, size: u64) -> RepositoryResult<bool> {
        let size = to_sql_size(size)?;
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM pack_size WHERE size = ?1", params![size])?;
        Ok(rows > 0)
    }
}

fn to_sql_size(size: u64) -> RepositoryResult<i64> {
    i64::try_from(size).map_err(|_| RepositoryError::FieldValueError {
        field: "size".to_string(),
        message: format!("规格超出存储范围: {}", size),
    })
}

fn insert_ignore(conn: &Connection, sizes: &[u64]) -> RepositoryResult<usize> {
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO pack_size (size) VALUES (?1)")?;
    let mut inserted = 0;
    for &size in sizes {
        inserted += stmt.execute(params![to_sql_size(size)?])?;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> PackSizeRepository {
        let conn = crate::db::open_in_memory().unwrap();
        PackSizeRepository::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_bare_connection_gets_shared_schema() {
        let conn = Connection::open_in_memory().unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let repo = PackSizeRepository::from_connection(conn.clone()).unwrap();
        repo.merge(&[5]).unwrap();

        let guard = conn.lock().unwrap();
        let tables: i64 = guard
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('pack_size','config_kv','action_log')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
        assert!(guard.execute("INSERT INTO pack_size (size) VALUES (0)", []).is_err());
    }

    #[test]
    fn test_merge_is_set_union() {
        let repo = repo();
        assert_eq!(repo.merge(&[500, 250]).unwrap(), 2);
        assert_eq!(repo.merge(&[250, 1000, 1000]).unwrap(), 1);
        assert_eq!(repo.list().unwrap(), vec![250, 500, 1000]);
    }

    #[test]
    fn test_replace_all_discards_previous() {
        let repo = repo();
        repo.merge(&[1, 2, 3]).unwrap();
        repo.replace_all(&[7]).unwrap();
        assert_eq!(repo.list().unwrap(), vec![7]);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_delete_reports_whether_removed() {
        let repo = repo();
        repo.merge(&[10]).unwrap();
        assert!(repo.delete(10).unwrap());
        assert!(!repo.delete(10).unwrap());
    }

    #[test]
    fn test_oversized_value_rejected() {
        let repo = repo();
        assert!(matches!(
            repo.merge(&[u64::MAX]),
            Err(RepositoryError::FieldValueError { .. })
        ));
        assert!(repo.list().unwrap().is_empty());
    }
}
