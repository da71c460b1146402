// ==========================================
// 订单装箱规划 - 应用层
// ==========================================
// 职责: 状态组装 + HTTP 传输
// ==========================================

pub mod http;
pub mod state;

// 重导出
pub use http::{build_router, cors_layer, serve, ErrorResponse};
pub use state::{get_bind_addr, get_cors_origins, get_default_db_path, AppState};
