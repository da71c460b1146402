// ==========================================
// 订单装箱规划 - 核心库
// ==========================================
// 目标: 给定订单量与包装规格，求溢出最小、其次包数最少的装箱方案
// 技术栈: Rust + SQLite + axum
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与值对象
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 装箱求解
pub mod engine;

// 配置层 - 运行期参数与规格存取
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装与 HTTP
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{ActionLog, ActionType, PackPlan, PackSizeSet, PacksUsed};

// 引擎
pub use engine::{PackSolver, SolveStrategy, SolverError, SolverSettings};

// 配置
pub use config::{ConfigManager, InMemoryPackSizeProvider, PackSizeProvider};

// API
pub use api::{ApiError, PackApi};

// ==========================================
// 系统常量
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "订单装箱规划服务";
