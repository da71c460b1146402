// ==========================================
// 订单装箱规划 - 应用状态
// ==========================================
// 职责: 组装 仓储 → 引擎 → API，持有应用级共享资源
// 启动约定: 规格存储为空时写入默认规格（来自 config_kv）
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::PackApi;
use crate::config::config_manager::{parse_pack_size_list, ConfigManager, DEFAULT_PACK_SIZES};
use crate::config::pack_size_provider::{InMemoryPackSizeProvider, PackSizeProvider};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::engine::pack_solver::{PackSolver, SolverSettings};
use crate::repository::{ActionLogRepository, PackSizeRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "PACK_PLANNER_DB_PATH";

/// 监听地址环境变量
pub const BIND_ENV: &str = "PACK_PLANNER_BIND";

/// 默认监听地址
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// 跨域来源环境变量（逗号分隔）
pub const CORS_ORIGINS_ENV: &str = "PACK_PLANNER_CORS_ORIGINS";

/// 默认跨域来源（前端开发服务器）
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// 应用状态
///
/// 在 HTTP 层以 `Arc<AppState>` 共享
pub struct AppState {
    /// 数据库路径（内存模式为 None）
    pub db_path: Option<String>,

    /// 求解参数（启动时从 config_kv 加载）
    pub settings: SolverSettings,

    /// 允许的跨域来源
    pub cors_origins: Vec<String>,

    /// 装箱API
    pub pack_api: Arc<PackApi>,
}

impl AppState {
    /// 基于 SQLite 初始化
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::db::ensure_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = ConfigManager::from_connection(conn.clone())
            .map_err(|e| format!("无法创建ConfigManager: {}", e))?;
        let seeded = config_manager
            .seed_defaults()
            .map_err(|e| format!("默认配置写入失败: {}", e))?;
        if seeded > 0 {
            tracing::info!(seeded, "已写入默认配置");
        }
        let settings = config_manager
            .load_solver_settings()
            .map_err(|e| format!("求解参数加载失败: {}", e))?;

        // ==========================================
        // Repository
        // ==========================================
        let pack_size_repo = Arc::new(
            PackSizeRepository::from_connection(conn.clone())
                .map_err(|e| format!("无法创建PackSizeRepository: {}", e))?,
        );
        let action_log_repo = Arc::new(ActionLogRepository::new(conn));

        seed_pack_sizes_if_empty(&pack_size_repo, &config_manager, &action_log_repo)?;

        // ==========================================
        // Engine + API
        // ==========================================
        let solver = Arc::new(PackSolver::new(settings));
        let pack_api = PackApi::new(pack_size_repo, solver).with_action_log(action_log_repo);

        tracing::info!(
            max_order = settings.max_order,
            dp_threshold = settings.dp_threshold,
            "AppState初始化完成"
        );

        Ok(Self {
            db_path: Some(db_path),
            settings,
            cors_origins: get_cors_origins(),
            pack_api: Arc::new(pack_api),
        })
    }

    /// 内存模式（测试 / 嵌入）
    pub fn in_memory(initial: &[u64], settings: SolverSettings) -> Self {
        let provider: Arc<dyn PackSizeProvider> = Arc::new(InMemoryPackSizeProvider::new(initial));
        let solver = Arc::new(PackSolver::new(settings));

        Self {
            db_path: None,
            settings,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            pack_api: Arc::new(PackApi::new(provider, solver)),
        }
    }

    /// 内存模式 + 内置默认规格
    pub fn in_memory_with_defaults() -> Self {
        let defaults = parse_pack_size_list(DEFAULT_PACK_SIZES).unwrap_or_default();
        Self::in_memory(&defaults, SolverSettings::default())
    }
}

/// 规格存储为空时写入默认规格
fn seed_pack_sizes_if_empty(
    repo: &PackSizeRepository,
    config_manager: &ConfigManager,
    action_log_repo: &ActionLogRepository,
) -> Result<(), String> {
    let count = repo.count().map_err(|e| format!("读取包装规格失败: {}", e))?;
    if count > 0 {
        tracing::debug!(count, "已存在包装规格，跳过默认写入");
        return Ok(());
    }

    let defaults = config_manager
        .get_default_pack_sizes()
        .map_err(|e| format!("读取默认规格失败: {}", e))?;
    repo.replace_all(&defaults)
        .map_err(|e| format!("写入默认规格失败: {}", e))?;
    tracing::info!(sizes = ?defaults, "已写入默认包装规格");

    let log = ActionLog::now(
        ActionType::SeedPackSizes,
        "system",
        Some(serde_json::json!({ "pack_sizes": defaults })),
        None,
    );
    if let Err(e) = action_log_repo.insert(&log) {
        tracing::warn!(error = %e, "默认规格操作日志写入失败");
    }
    Ok(())
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 → 用户本地数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./pack_planner.db");
    if let Some(data_dir) = dirs::data_local_dir() {
        path = data_dir.join("pack-planner").join("pack_planner.db");
    }

    path.to_string_lossy().to_string()
}

/// 获取监听地址
pub fn get_bind_addr() -> String {
    std::env::var(BIND_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BIND.to_string())
}

/// 获取允许的跨域来源
///
/// 环境变量未设置或为空时使用 DEFAULT_CORS_ORIGIN
pub fn get_cors_origins() -> Vec<String> {
    std::env::var(CORS_ORIGINS_ENV)
        .ok()
        .map(|v| parse_origin_list(&v))
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| vec![DEFAULT_CORS_ORIGIN.to_string()])
}

fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
