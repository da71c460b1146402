// ==========================================
// 订单装箱规划 - 求解引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 计算是确定性的，所有错误都不重试
// ==========================================

use thiserror::Error;

/// 求解引擎错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// 订单量超出上限、包装规格非正等
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 未配置任何包装规格
    #[error("未配置包装规格")]
    NoPackSizesConfigured,

    /// 搜索上界与兜底单包都无法满足订单
    #[error("无可行的装箱组合: order={order}")]
    NoFeasibleCombination { order: u64 },
}

/// Result 类型别名
pub type SolverResult<T> = Result<T, SolverError>;
