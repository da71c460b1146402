// ==========================================
// 订单装箱规划 - 领域模型层
// ==========================================
// 职责: 定义领域实体与值对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod pack;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use pack::{composition_total, PackPlan, PackSizeSet, PacksUsed};
