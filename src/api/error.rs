// ==========================================
// 订单装箱规划 - API层错误类型
// ==========================================
// 职责: 统一 API 层错误，转换求解 / 仓储错误为用户可读的错误消息
// 约定: 每个变体对应稳定的错误代码（code），传输层据此映射状态码
// ==========================================

use crate::engine::error::SolverError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("未配置包装规格")]
    NoPackSizesConfigured,

    #[error("无可行组合: order={order}")]
    NoFeasibleCombination { order: u64 },

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 稳定错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NoPackSizesConfigured => "NO_PACK_SIZES_CONFIGURED",
            ApiError::NoFeasibleCombination { .. } => "NO_FEASIBLE_COMBINATION",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// 附加信息（可选）
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::NoFeasibleCombination { order } => Some(serde_json::json!({ "order": order })),
            _ => None,
        }
    }
}

// ==========================================
// 从 SolverError 转换
// ==========================================
impl From<SolverError> for ApiError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            SolverError::NoPackSizesConfigured => ApiError::NoPackSizesConfigured,
            SolverError::NoFeasibleCombination { order } => ApiError::NoFeasibleCombination { order },
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将Repository层的技术错误转换为用户友好的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }

            // 数据质量错误
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
