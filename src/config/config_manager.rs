// ==========================================
// 订单装箱规划 - 配置管理器
// ==========================================
// 职责: 运行期参数加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// 约定: 解析失败一律回退默认值并告警，不阻断启动
// ==========================================

use crate::db::open_sqlite_connection;
use crate::engine::pack_solver::{
    SolverSettings, DEFAULT_DP_THRESHOLD, DEFAULT_MAX_ORDER, MAX_DP_THRESHOLD, MAX_PACK_SIZE,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// 默认包装规格（逗号分隔，与 config_kv 存储格式一致）
pub const DEFAULT_PACK_SIZES: &str = "250,500,1000,2000,5000";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：对传入连接再次应用统一 PRAGMA 与建表（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
            crate::db::ensure_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入缺失的默认配置（已有值不覆盖）
    ///
    /// # 返回
    /// 新写入的配置项数量
    pub fn seed_defaults(&self) -> RepositoryResult<usize> {
        let defaults = [
            (config_keys::MAX_ORDER, DEFAULT_MAX_ORDER.to_string()),
            (config_keys::DP_THRESHOLD, DEFAULT_DP_THRESHOLD.to_string()),
            (config_keys::DEFAULT_PACK_SIZES, DEFAULT_PACK_SIZES.to_string()),
        ];

        let conn = self.get_conn()?;
        let mut count = 0;
        for (key, value) in defaults.iter() {
            count += conn.execute(
                "INSERT OR IGNORE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
                params![key, value],
            )?;
        }
        Ok(count)
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    // ===== 求解参数 =====

    /// 获取订单量上限（必须为正）
    pub fn get_max_order(&self) -> RepositoryResult<u64> {
        let value = self.get_config_or_default(config_keys::MAX_ORDER, &DEFAULT_MAX_ORDER.to_string())?;
        match value.trim().parse::<u64>() {
            Ok(v) if v > 0 => Ok(v),
            _ => {
                tracing::warn!(
                    config_key = config_keys::MAX_ORDER,
                    raw_value = %value,
                    "订单量上限配置无效，使用默认值"
                );
                Ok(DEFAULT_MAX_ORDER)
            }
        }
    }

    /// 获取 DP 阈值（0 表示全部走启发式，不得超过 MAX_DP_THRESHOLD）
    pub fn get_dp_threshold(&self) -> RepositoryResult<u64> {
        let value =
            self.get_config_or_default(config_keys::DP_THRESHOLD, &DEFAULT_DP_THRESHOLD.to_string())?;
        match value.trim().parse::<u64>() {
            Ok(v) if v <= MAX_DP_THRESHOLD => Ok(v),
            _ => {
                tracing::warn!(
                    config_key = config_keys::DP_THRESHOLD,
                    raw_value = %value,
                    max = MAX_DP_THRESHOLD,
                    "DP 阈值配置无效，使用默认值"
                );
                Ok(DEFAULT_DP_THRESHOLD)
            }
        }
    }

    /// 获取默认包装规格（升序、去重）
    pub fn get_default_pack_sizes(&self) -> RepositoryResult<Vec<u64>> {
        let value = self.get_config_or_default(config_keys::DEFAULT_PACK_SIZES, DEFAULT_PACK_SIZES)?;
        match parse_pack_size_list(&value) {
            Some(sizes) => Ok(sizes),
            None => {
                tracing::warn!(
                    config_key = config_keys::DEFAULT_PACK_SIZES,
                    raw_value = %value,
                    "默认规格配置无效，使用内置默认值"
                );
                Ok(parse_pack_size_list(DEFAULT_PACK_SIZES).unwrap_or_default())
            }
        }
    }

    /// 加载求解参数
    pub fn load_solver_settings(&self) -> RepositoryResult<SolverSettings> {
        Ok(SolverSettings {
            max_order: self.get_max_order()?,
            dp_threshold: self.get_dp_threshold()?,
        })
    }
}

/// 解析逗号分隔的规格列表
///
/// 任一项非正整数或超出上限、或列表为空时返回 None
pub fn parse_pack_size_list(raw: &str) -> Option<Vec<u64>> {
    let mut sizes = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().ok().filter(|&v| v > 0 && v <= MAX_PACK_SIZE))
        .collect::<Option<Vec<u64>>>()?;

    if sizes.is_empty() {
        return None;
    }
    sizes.sort_unstable();
    sizes.dedup();
    Some(sizes)
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 求解
    pub const MAX_ORDER: &str = "max_order";
    pub const DP_THRESHOLD: &str = "dp_threshold";

    // 规格
    pub const DEFAULT_PACK_SIZES: &str = "default_pack_sizes";
}
