// ==========================================
// 订单装箱规划 - 精确求解器（有界动态规划）
// ==========================================
// 职责: 在 [0, order + 最小规格] 内求每个总量的最少包数，
//       取 >= order 的最小可达总量
// 复杂度: 时间 O(max_sum × 规格数)，空间 O(max_sum)
// 限制: 仅用于订单量 <= DP 阈值的场景
// ==========================================

use crate::domain::pack::{PackPlan, PackSizeSet, PacksUsed};
use crate::engine::error::{SolverError, SolverResult};
use tracing::instrument;

/// 某个总量的最优状态
///
/// 回溯指针: 前驱总量 = sum - last_pack
#[derive(Debug, Clone, Copy)]
struct SumState {
    packs: u32,     // 达到该总量的最少包数
    last_pack: u64, // 最后追加的规格（sum = 0 时为 0）
}

// ==========================================
// ExactSolver - 精确求解器
// ==========================================
#[derive(Debug, Clone)]
pub struct ExactSolver {
    // 无状态引擎，所有工作数组均为单次调用局部变量
}

impl ExactSolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 求解
    ///
    /// 前置条件（由调度器保证）：
    /// - pack_sizes 非空
    /// - order >= 最小规格
    ///
    /// # 返回
    /// - Ok(PackPlan): 溢出最小、其次包数最少的方案
    /// - Err(NoFeasibleCombination): 搜索区间内不可达且没有 >= order 的单包
    #[instrument(skip(self, pack_sizes), fields(sizes = pack_sizes.len()))]
    pub fn solve(&self, order: u64, pack_sizes: &PackSizeSet) -> SolverResult<PackPlan> {
        let smallest = pack_sizes
            .smallest()
            .ok_or(SolverError::NoPackSizesConfigured)?;
        let max_sum = order
            .checked_add(smallest)
            .and_then(|s| usize::try_from(s).ok())
            .ok_or_else(|| {
                SolverError::InvalidInput(format!("搜索上界溢出: order={}, smallest={}", order, smallest))
            })?;

        let states = Self::build_states(max_sum, pack_sizes);

        // 从 order 向上扫描，第一个可达总量即溢出最小
        let start = order as usize;
        let best_sum = (start..=max_sum).find(|&s| states[s].is_some());

        match best_sum {
            Some(best_sum) => {
                let packs_used = Self::reconstruct(&states, best_sum);
                tracing::debug!(
                    best_sum,
                    surplus = best_sum - start,
                    packs = states[best_sum].map(|s| s.packs).unwrap_or(0),
                    "精确求解完成"
                );
                Ok(PackPlan::from_composition(order, packs_used))
            }
            None => {
                // 兜底：取 >= order 的最小单包
                tracing::warn!(order, max_sum, "搜索区间内无可达总量，回退为单包");
                pack_sizes
                    .iter_asc()
                    .find(|&size| size >= order)
                    .map(|size| PackPlan::single(order, size))
                    .ok_or(SolverError::NoFeasibleCombination { order })
            }
        }
    }

    /// 按总量递增构建状态表
    ///
    /// 规则: 仅当新包数严格更少时更新；规格按降序尝试。
    /// 展开某个总量时其状态已定型（规格均为正），因此回溯得到的组合
    /// 与"复制前驱组合再加一包"完全一致。
    fn build_states(max_sum: usize, pack_sizes: &PackSizeSet) -> Vec<Option<SumState>> {
        let mut states: Vec<Option<SumState>> = vec![None; max_sum + 1];
        states[0] = Some(SumState {
            packs: 0,
            last_pack: 0,
        });

        for s in 0..=max_sum {
            let Some(current) = states[s] else {
                continue;
            };
            let next_packs = current.packs + 1;

            for size in pack_sizes.iter_desc() {
                let ns = match usize::try_from(size).ok().and_then(|p| s.checked_add(p)) {
                    Some(ns) if ns <= max_sum => ns,
                    _ => continue,
                };

                let improves = match states[ns] {
                    Some(existing) => next_packs < existing.packs,
                    None => true,
                };
                if improves {
                    states[ns] = Some(SumState {
                        packs: next_packs,
                        last_pack: size,
                    });
                }
            }
        }

        states
    }

    /// 沿回溯指针还原组合
    fn reconstruct(states: &[Option<SumState>], target: usize) -> PacksUsed {
        let mut packs_used = PacksUsed::new();
        let mut sum = target;

        while sum > 0 {
            let Some(state) = states[sum] else {
                break;
            };
            *packs_used.entry(state.last_pack).or_insert(0) += 1;
            sum -= state.last_pack as usize;
        }

        packs_used
    }
}

impl Default for ExactSolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(v: &[u64]) -> PackSizeSet {
        PackSizeSet::new(v).unwrap()
    }

    #[test]
    fn test_exact_match() {
        let plan = ExactSolver::new()
            .solve(500, &sizes(&[250, 500, 1000, 2000, 5000]))
            .unwrap();
        assert_eq!(plan.total_items_used, 500);
        assert_eq!(plan.packs_used, PacksUsed::from([(500, 1)]));
    }

    #[test]
    fn test_minimal_surplus_then_fewest_packs() {
        let plan = ExactSolver::new()
            .solve(501, &sizes(&[250, 500, 1000, 2000, 5000]))
            .unwrap();
        assert_eq!(plan.total_items_used, 750);
        assert_eq!(plan.packs_used, PacksUsed::from([(500, 1), (250, 1)]));

        let plan = ExactSolver::new()
            .solve(12001, &sizes(&[250, 500, 1000, 2000, 5000]))
            .unwrap();
        assert_eq!(plan.total_items_used, 12250);
        assert_eq!(
            plan.packs_used,
            PacksUsed::from([(5000, 2), (2000, 1), (250, 1)])
        );
    }

    #[test]
    fn test_non_aligned_sizes_prefer_exact_sum() {
        // 互不整除的规格: 23 + 53 恰好命中 76
        let plan = ExactSolver::new().solve(76, &sizes(&[23, 31, 53])).unwrap();
        assert_eq!(plan.total_items_used, 76);
        assert_eq!(plan.packs_used, PacksUsed::from([(23, 1), (53, 1)]));
    }

    #[test]
    fn test_fewest_packs_among_equal_sums() {
        // 6 = 3+3 = 2+2+2，取两包
        let plan = ExactSolver::new().solve(6, &sizes(&[2, 3])).unwrap();
        assert_eq!(plan.total_items_used, 6);
        assert_eq!(plan.packs_used, PacksUsed::from([(3, 2)]));
    }
}
