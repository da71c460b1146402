// ==========================================
// 订单装箱规划 - 包装规格与装箱方案领域模型
// ==========================================
// 职责: PackSizeSet（包装规格集合）、PackPlan（装箱方案）
// 红线: 方案总量不得小于订单量（订单为 0 时总量为 0）
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 包装规格 → 使用数量
///
/// 不存储数量为 0 的条目；序列化时键为十进制字符串（如 {"500": 1}）
pub type PacksUsed = BTreeMap<u64, u64>;

// ==========================================
// PackSizeSet - 包装规格集合
// ==========================================
// 去重、全部 > 0、内部持有一份降序副本
// 调用方的原始集合不会被修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSizeSet {
    sizes_desc: Vec<u64>,
}

impl PackSizeSet {
    /// 由任意顺序的规格列表构造
    ///
    /// # 返回
    /// - Ok(PackSizeSet): 去重后的降序集合（可能为空，由调用方判断）
    /// - Err(0): 存在非正规格，返回该非法值
    pub fn new(sizes: &[u64]) -> Result<Self, u64> {
        if let Some(&bad) = sizes.iter().find(|&&s| s == 0) {
            return Err(bad);
        }

        let mut sizes_desc = sizes.to_vec();
        sizes_desc.sort_unstable_by(|a, b| b.cmp(a));
        sizes_desc.dedup();

        Ok(Self { sizes_desc })
    }

    pub fn is_empty(&self) -> bool {
        self.sizes_desc.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sizes_desc.len()
    }

    /// 最小规格
    pub fn smallest(&self) -> Option<u64> {
        self.sizes_desc.last().copied()
    }

    /// 最大规格
    pub fn largest(&self) -> Option<u64> {
        self.sizes_desc.first().copied()
    }

    pub fn contains(&self, size: u64) -> bool {
        // 降序排列，反向比较
        self.sizes_desc
            .binary_search_by(|s| size.cmp(s))
            .is_ok()
    }

    /// 降序切片
    pub fn as_desc_slice(&self) -> &[u64] {
        &self.sizes_desc
    }

    /// 从大到小迭代
    pub fn iter_desc(&self) -> impl Iterator<Item = u64> + '_ {
        self.sizes_desc.iter().copied()
    }

    /// 从小到大迭代
    pub fn iter_asc(&self) -> impl Iterator<Item = u64> + '_ {
        self.sizes_desc.iter().rev().copied()
    }
}

// ==========================================
// PackPlan - 装箱方案
// ==========================================
// 每次计算新建，返回后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackPlan {
    pub items_ordered: u64,    // 订单量（原样回显）
    pub total_items_used: u64, // 实际发出总量 = Σ 规格×数量
    pub packs_used: PacksUsed, // 规格 → 数量
}

impl PackPlan {
    /// 空方案（订单量为 0）
    pub fn empty() -> Self {
        Self {
            items_ordered: 0,
            total_items_used: 0,
            packs_used: PacksUsed::new(),
        }
    }

    /// 单包方案
    pub fn single(items_ordered: u64, pack_size: u64) -> Self {
        let mut packs_used = PacksUsed::new();
        packs_used.insert(pack_size, 1);
        Self {
            items_ordered,
            total_items_used: pack_size,
            packs_used,
        }
    }

    /// 由组合构造方案，总量按组合重新计算
    ///
    /// 数量为 0 的条目会被丢弃
    pub fn from_composition(items_ordered: u64, mut packs_used: PacksUsed) -> Self {
        packs_used.retain(|_, count| *count > 0);
        let total_items_used = composition_total(&packs_used);
        Self {
            items_ordered,
            total_items_used,
            packs_used,
        }
    }

    /// 包总数
    pub fn pack_count(&self) -> u64 {
        self.packs_used.values().sum()
    }

    /// 溢出量（发出总量 - 订单量）
    pub fn surplus(&self) -> u64 {
        self.total_items_used.saturating_sub(self.items_ordered)
    }
}

/// 组合总量 Σ 规格×数量
pub fn composition_total(packs_used: &PacksUsed) -> u64 {
    packs_used
        .iter()
        .map(|(size, count)| size.saturating_mul(*count))
        .fold(0u64, u64::saturating_add)
}
