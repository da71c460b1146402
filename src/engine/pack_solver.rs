// ==========================================
// 订单装箱规划 - 求解调度器
// ==========================================
// 职责: 输入校验、特殊情况短路、按阈值选择 DP / 启发式
// 输入: 订单量 + 包装规格（调用方原始切片，只读）
// 输出: PackPlan
// 红线: 纯计算，无 I/O、无共享可变状态
// ==========================================

use crate::domain::pack::{PackPlan, PackSizeSet};
use crate::engine::error::{SolverError, SolverResult};
use crate::engine::exact_solver::ExactSolver;
use crate::engine::heuristic_solver::HeuristicSolver;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// 默认订单量上限
pub const DEFAULT_MAX_ORDER: u64 = 1_000_000_000_000;

/// 默认 DP 阈值（订单量 <= 阈值时使用精确求解）
pub const DEFAULT_DP_THRESHOLD: u64 = 100_000;

/// DP 阈值上限（DP 状态表约 阈值 + 最小规格 项，超出则内存不可控）
pub const MAX_DP_THRESHOLD: u64 = 1_000_000;

/// 单个包装规格的上限（与 SQLite INTEGER 对齐，保证总量计算不溢出）
pub const MAX_PACK_SIZE: u64 = i64::MAX as u64;

// ==========================================
// SolverSettings - 求解参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverSettings {
    pub max_order: u64,    // 订单量上限
    pub dp_threshold: u64, // DP 阈值
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_order: DEFAULT_MAX_ORDER,
            dp_threshold: DEFAULT_DP_THRESHOLD,
        }
    }
}

// ==========================================
// SolveStrategy - 求解路径
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStrategy {
    Zero,          // 订单量为 0
    BelowSmallest, // 小于最小规格，向上取整为一个最小包
    Exact,         // 有界 DP
    Heuristic,     // 贪心 + 修复
}

impl fmt::Display for SolveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStrategy::Zero => write!(f, "ZERO"),
            SolveStrategy::BelowSmallest => write!(f, "BELOW_SMALLEST"),
            SolveStrategy::Exact => write!(f, "EXACT"),
            SolveStrategy::Heuristic => write!(f, "HEURISTIC"),
        }
    }
}

// ==========================================
// PackSolver - 求解调度器
// ==========================================
// 无状态（仅持有只读参数），可在多线程间共享
#[derive(Debug, Clone, Default)]
pub struct PackSolver {
    settings: SolverSettings,
    exact: ExactSolver,
    heuristic: HeuristicSolver,
}

impl PackSolver {
    /// 创建调度器
    ///
    /// dp_threshold 超过 MAX_DP_THRESHOLD 时截断为上限
    pub fn new(mut settings: SolverSettings) -> Self {
        if settings.dp_threshold > MAX_DP_THRESHOLD {
            tracing::warn!(
                dp_threshold = settings.dp_threshold,
                max = MAX_DP_THRESHOLD,
                "DP 阈值超过上限，已截断"
            );
            settings.dp_threshold = MAX_DP_THRESHOLD;
        }

        Self {
            settings,
            exact: ExactSolver::new(),
            heuristic: HeuristicSolver::new(),
        }
    }

    pub fn settings(&self) -> SolverSettings {
        self.settings
    }

    /// 计算装箱方案
    ///
    /// # 参数
    /// - order: 订单量
    /// - pack_sizes: 包装规格（任意顺序、允许重复；不会被修改）
    ///
    /// # 返回
    /// - Ok(PackPlan)
    /// - Err(InvalidInput): 订单量超上限 / 规格非正或过大
    /// - Err(NoPackSizesConfigured): 规格为空
    /// - Err(NoFeasibleCombination): DP 搜索与兜底均失败
    #[instrument(skip(self, pack_sizes), fields(sizes = pack_sizes.len()))]
    pub fn solve(&self, order: u64, pack_sizes: &[u64]) -> SolverResult<PackPlan> {
        let set = self.validate(order, pack_sizes)?;
        let strategy = self.select_strategy(order, &set);
        tracing::debug!(%strategy, order, "选择求解路径");

        match strategy {
            SolveStrategy::Zero => Ok(PackPlan::empty()),
            SolveStrategy::BelowSmallest => {
                let smallest = set.smallest().ok_or(SolverError::NoPackSizesConfigured)?;
                Ok(PackPlan::single(order, smallest))
            }
            SolveStrategy::Exact => self.exact.solve(order, &set),
            SolveStrategy::Heuristic => self.heuristic.solve(order, &set),
        }
    }

    /// 选择求解路径（纯函数）
    pub fn select_strategy(&self, order: u64, pack_sizes: &PackSizeSet) -> SolveStrategy {
        if order == 0 {
            return SolveStrategy::Zero;
        }
        match pack_sizes.smallest() {
            Some(smallest) if order < smallest => SolveStrategy::BelowSmallest,
            _ if order <= self.settings.dp_threshold => SolveStrategy::Exact,
            _ => SolveStrategy::Heuristic,
        }
    }

    /// 输入校验，返回私有的降序规格副本
    fn validate(&self, order: u64, pack_sizes: &[u64]) -> SolverResult<PackSizeSet> {
        if order > self.settings.max_order {
            return Err(SolverError::InvalidInput(format!(
                "订单量 {} 超过上限 {}",
                order, self.settings.max_order
            )));
        }
        if pack_sizes.is_empty() {
            return Err(SolverError::NoPackSizesConfigured);
        }
        if let Some(&too_large) = pack_sizes.iter().find(|&&s| s > MAX_PACK_SIZE) {
            return Err(SolverError::InvalidInput(format!(
                "包装规格 {} 超过上限 {}",
                too_large, MAX_PACK_SIZE
            )));
        }

        PackSizeSet::new(pack_sizes).map_err(|bad| {
            SolverError::InvalidInput(format!("无效的包装规格: {}（必须为正整数）", bad))
        })
    }
}
