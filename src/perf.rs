// ==========================================
// 订单装箱规划 - 性能统计
// ==========================================
// 用法: 在入口函数首行创建 PerfGuard，离开作用域时输出耗时
// 输出: target = "perf"，字段 op / elapsed_ms / slow
// ==========================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// 慢操作阈值（毫秒），0 表示不标记
static SLOW_OP_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 从环境变量加载慢操作阈值
///
/// - `PACK_PLANNER_SLOW_OP_MS=200` 配置阈值（毫秒）
/// - `PACK_PLANNER_PERF_QUIET=1` 关闭标记
pub fn init_from_env() {
    let quiet = std::env::var("PACK_PLANNER_PERF_QUIET")
        .map(|v| is_true(&v))
        .unwrap_or(false);
    if quiet {
        SLOW_OP_THRESHOLD_MS.store(0, Ordering::Relaxed);
        return;
    }

    let slow_ms = std::env::var("PACK_PLANNER_SLOW_OP_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });
    SLOW_OP_THRESHOLD_MS.store(slow_ms, Ordering::Relaxed);
}

pub fn slow_op_threshold_ms() -> u64 {
    SLOW_OP_THRESHOLD_MS.load(Ordering::Relaxed)
}

/// 性能统计 Guard：记录 elapsed_ms，超过阈值时以 warn 级别输出
///
/// 使用方式：
/// ```ignore
/// let _perf = pack_planner::perf::PerfGuard::new("calculate_packs");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        let threshold = slow_op_threshold_ms();

        if threshold > 0 && elapsed_ms >= threshold {
            tracing::warn!(target: "perf", op = self.op, elapsed_ms, slow = true, "done");
        } else {
            tracing::info!(target: "perf", op = self.op, elapsed_ms, slow = false, "done");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_measures_elapsed() {
        let guard = PerfGuard::new("unit");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(guard.elapsed_ms() >= 5);
    }

    #[test]
    fn test_is_true() {
        assert!(is_true(" Yes "));
        assert!(!is_true("0"));
    }
}
