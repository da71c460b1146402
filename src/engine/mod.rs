// ==========================================
// 订单装箱规划 - 引擎层
// ==========================================
// 职责: 装箱求解（纯计算）
// 红线: Engine 不拼 SQL、不做 I/O
// ==========================================

pub mod error;
pub mod exact_solver;
pub mod heuristic_solver;
pub mod pack_solver;

// 重导出核心引擎
pub use error::{SolverError, SolverResult};
pub use exact_solver::ExactSolver;
pub use heuristic_solver::HeuristicSolver;
pub use pack_solver::{
    PackSolver, SolveStrategy, SolverSettings, DEFAULT_DP_THRESHOLD, DEFAULT_MAX_ORDER,
    MAX_DP_THRESHOLD, MAX_PACK_SIZE,
};
