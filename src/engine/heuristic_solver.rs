// ==========================================
// 订单装箱规划 - 启发式求解器（贪心 + 修复）
// ==========================================
// 职责: 大订单（> DP 阈值）的快速近似求解
// 步骤:
//   1) 精确命中: 存在规格 == order，直接单包
//   2) 降序贪心填充
//   3) 余量补包: 取 >= 余量的最小规格（不存在则取全局最小）
//   4) 小换大修复: 包数严格减少时，用大规格替换全部更小规格
//   5) 单包收敛: [order, 当前总量] 内存在规格时收敛为单包
// 说明: 非全局最优，不保证与 DP 结果一致
// ==========================================

use crate::domain::pack::{composition_total, PackPlan, PackSizeSet, PacksUsed};
use crate::engine::error::{SolverError, SolverResult};
use tracing::instrument;

// ==========================================
// HeuristicSolver - 启发式求解器
// ==========================================
#[derive(Debug, Clone)]
pub struct HeuristicSolver {
    // 无状态引擎
}

impl HeuristicSolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 求解
    ///
    /// 前置条件（由调度器保证）: pack_sizes 非空
    #[instrument(skip(self, pack_sizes), fields(sizes = pack_sizes.len()))]
    pub fn solve(&self, order: u64, pack_sizes: &PackSizeSet) -> SolverResult<PackPlan> {
        let smallest = pack_sizes
            .smallest()
            .ok_or(SolverError::NoPackSizesConfigured)?;

        // 1. 精确命中
        if pack_sizes.contains(order) {
            return Ok(PackPlan::single(order, order));
        }

        // 2. 降序贪心
        let (mut packs_used, remaining) = Self::greedy_fill(order, pack_sizes);

        // 3. 余量补包
        if remaining > 0 {
            let patch = pack_sizes
                .iter_asc()
                .find(|&size| size >= remaining)
                .unwrap_or(smallest);
            *packs_used.entry(patch).or_insert(0) += 1;
            tracing::debug!(remaining, patch, "余量补包");
        }

        // 4. 小换大修复
        let replaced = Self::replace_small_with_large(&mut packs_used, pack_sizes);
        if replaced > 0 {
            tracing::debug!(replaced, "小换大修复已生效");
        }

        // 5. 单包收敛
        let total_used = composition_total(&packs_used);
        if let Some(single) = Self::single_pack_candidate(order, total_used, pack_sizes) {
            tracing::debug!(single, total_used, "收敛为单包");
            return Ok(PackPlan::single(order, single));
        }

        Ok(PackPlan::from_composition(order, packs_used))
    }

    /// 降序贪心填充
    ///
    /// # 返回
    /// (组合, 未覆盖余量)
    fn greedy_fill(order: u64, pack_sizes: &PackSizeSet) -> (PacksUsed, u64) {
        let mut packs_used = PacksUsed::new();
        let mut remaining = order;

        for size in pack_sizes.iter_desc() {
            if remaining == 0 {
                break;
            }
            let count = remaining / size;
            if count > 0 {
                packs_used.insert(size, count);
                remaining -= size * count;
            }
        }

        (packs_used, remaining)
    }

    /// 小换大修复
    ///
    /// 对每个规格 p（从大到小）：更小规格提供的总量 / p（向下取整）
    /// 若小于更小规格的现有包数，则删除全部更小规格并追加对应数量的 p。
    ///
    /// # 返回
    /// 发生替换的次数
    fn replace_small_with_large(packs_used: &mut PacksUsed, pack_sizes: &PackSizeSet) -> usize {
        let desc = pack_sizes.as_desc_slice();
        let mut replaced = 0;

        for (i, &current) in desc.iter().enumerate() {
            let smaller = &desc[i + 1..];

            let total_from_smaller: u64 = smaller
                .iter()
                .map(|s| s * packs_used.get(s).copied().unwrap_or(0))
                .sum();
            let replace_count = total_from_smaller / current;
            if replace_count == 0 {
                continue;
            }

            let smaller_count: u64 = smaller
                .iter()
                .map(|s| packs_used.get(s).copied().unwrap_or(0))
                .sum();

            if replace_count < smaller_count {
                for s in smaller {
                    packs_used.remove(s);
                }
                *packs_used.entry(current).or_insert(0) += replace_count;
                replaced += 1;
            }
        }

        replaced
    }

    /// 单包收敛候选: [order, total_used] 区间内最大的规格
    fn single_pack_candidate(order: u64, total_used: u64, pack_sizes: &PackSizeSet) -> Option<u64> {
        pack_sizes
            .iter_desc()
            .find(|&size| size >= order && size <= total_used)
    }
}

impl Default for HeuristicSolver {
    fn default() -> Self {
        Self::new()
    }
}
