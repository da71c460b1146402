// ==========================================
// 订单装箱规划 - 配置层
// ==========================================
// 职责: 运行期参数管理 + 规格存取接口
// 存储: config_kv 表 / pack_size 表
// ==========================================

pub mod config_manager;
pub mod pack_size_provider;

// 重导出核心配置管理器
pub use config_manager::{config_keys, parse_pack_size_list, ConfigManager, DEFAULT_PACK_SIZES};
pub use pack_size_provider::{InMemoryPackSizeProvider, PackSizeProvider};
