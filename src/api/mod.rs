// ==========================================
// 订单装箱规划 - API 层
// ==========================================
// 职责: 业务接口，组合引擎与存储；不感知传输协议
// ==========================================

pub mod error;
pub mod pack_api;
pub mod validator;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use pack_api::{PackApi, PackSizesPayload, UpdatePackSizesResponse};
