// ==========================================
// 订单装箱规划 - 原始输入校验
// ==========================================
// 职责: 将传输层原始输入（查询串 / JSON 数值）转换为求解所需的无符号整数
// 红线: 校验失败一律 InvalidInput，不做静默修正
// ==========================================

use crate::api::error::{ApiError, ApiResult};

/// 解析订单量
///
/// # 参数
/// - raw: `items` 查询参数原文（None 表示缺失）
/// - max_order: 订单量上限
///
/// # 返回
/// - Ok(u64): 合法订单量（0 合法）
/// - Err(InvalidInput): 缺失 / 非整数 / 负数 / 超上限
pub fn parse_items(raw: Option<&str>, max_order: u64) -> ApiResult<u64> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(ApiError::InvalidInput("缺少 items 查询参数".to_string()));
    }

    let value: i128 = raw
        .parse()
        .map_err(|_| ApiError::InvalidInput(format!("items 不是整数: {}", raw)))?;
    if value < 0 {
        return Err(ApiError::InvalidInput(format!("items 不能为负数: {}", value)));
    }
    if value > i128::from(max_order) {
        return Err(ApiError::InvalidInput(format!(
            "订单量 {} 超过上限 {}",
            value, max_order
        )));
    }

    u64::try_from(value).map_err(|_| ApiError::InvalidInput(format!("items 超出范围: {}", value)))
}

/// 校验待写入的包装规格
///
/// # 返回
/// - Ok(Vec<u64>): 转换后的规格（保持原顺序，不去重）
/// - Err(InvalidInput): 列表为空 / 含非正数
pub fn validate_pack_sizes(sizes: &[i64]) -> ApiResult<Vec<u64>> {
    if sizes.is_empty() {
        return Err(ApiError::InvalidInput("pack_sizes 不能为空".to_string()));
    }

    sizes
        .iter()
        .map(|&s| {
            u64::try_from(s)
                .ok()
                .filter(|&v| v > 0)
                .ok_or_else(|| ApiError::InvalidInput(format!("无效的包装规格: {}（必须为正整数）", s)))
        })
        .collect()
}

/// 解析路径中的规格参数
pub fn parse_size_param(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidInput(format!("无效的规格参数: {}", raw)))
}
