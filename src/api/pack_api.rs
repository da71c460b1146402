// ==========================================
// 订单装箱规划 - 装箱 API
// ==========================================
// 职责: 装箱计算 + 包装规格查询 / 合并写入 / 删除
// 约定: 规格每次计算时从 PackSizeProvider 读取，不在 API 内缓存
// 审计: 规格写入 / 删除记录 ActionLog（失败仅告警，不回滚业务写入）
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator;
use crate::config::pack_size_provider::PackSizeProvider;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::pack::PackPlan;
use crate::engine::pack_solver::{PackSolver, SolverSettings};
use crate::perf::PerfGuard;
use crate::repository::action_log_repo::ActionLogRepository;

/// 操作人（HTTP 接口无鉴权，统一记为 api）
const API_ACTOR: &str = "api";

// ==========================================
// PackSizesPayload - 规格列表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSizesPayload {
    pub pack_sizes: Vec<u64>,
}

// ==========================================
// UpdatePackSizesResponse - 规格写入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePackSizesResponse {
    pub status: String,
    pub pack_sizes: Vec<u64>, // 合并后的完整规格（升序）
}

// ==========================================
// PackApi - 装箱 API
// ==========================================
pub struct PackApi {
    pack_size_provider: Arc<dyn PackSizeProvider>,
    solver: Arc<PackSolver>,
    action_log_repo: Option<Arc<ActionLogRepository>>,
}

impl PackApi {
    /// 创建新的PackApi实例（不记录审计日志）
    pub fn new(pack_size_provider: Arc<dyn PackSizeProvider>, solver: Arc<PackSolver>) -> Self {
        Self {
            pack_size_provider,
            solver,
            action_log_repo: None,
        }
    }

    /// 启用审计日志
    pub fn with_action_log(mut self, action_log_repo: Arc<ActionLogRepository>) -> Self {
        self.action_log_repo = Some(action_log_repo);
        self
    }

    pub fn solver_settings(&self) -> SolverSettings {
        self.solver.settings()
    }

    // ==========================================
    // 装箱计算
    // ==========================================

    /// 计算装箱方案
    ///
    /// # 返回
    /// - Ok(PackPlan)
    /// - Err(InvalidInput): 订单量超上限
    /// - Err(NoPackSizesConfigured): 存储中无规格
    /// - Err(NoFeasibleCombination): 求解失败
    pub async fn calculate_packs(&self, items: u64) -> ApiResult<PackPlan> {
        let _perf = PerfGuard::new("calculate_packs");

        let sizes = self.pack_size_provider.read().await?;
        debug!(items, sizes = ?sizes, "读取包装规格");

        // DP 为 CPU 密集计算，放到阻塞线程池执行
        let solver = Arc::clone(&self.solver);
        let plan = tokio::task::spawn_blocking(move || solver.solve(items, &sizes))
            .await
            .map_err(|e| ApiError::InternalError(format!("装箱计算任务异常: {}", e)))??;
        info!(
            items_ordered = plan.items_ordered,
            total_items_used = plan.total_items_used,
            pack_count = plan.pack_count(),
            "装箱计算完成"
        );
        Ok(plan)
    }

    /// 解析原始 items 参数并计算
    pub async fn calculate_packs_raw(&self, raw_items: Option<&str>) -> ApiResult<PackPlan> {
        let items = validator::parse_items(raw_items, self.solver.settings().max_order)?;
        self.calculate_packs(items).await
    }

    // ==========================================
    // 规格管理
    // ==========================================

    /// 查询当前规格（升序）
    pub async fn get_pack_sizes(&self) -> ApiResult<PackSizesPayload> {
        let pack_sizes = self.pack_size_provider.read().await?;
        Ok(PackSizesPayload { pack_sizes })
    }

    /// 合并写入规格
    ///
    /// # 返回
    /// - Ok: 合并后的完整规格
    /// - Err(InvalidInput): 列表为空 / 含非正数
    pub async fn update_pack_sizes(&self, sizes: Vec<i64>) -> ApiResult<UpdatePackSizesResponse> {
        let _perf = PerfGuard::new("update_pack_sizes");

        let mut validated = validator::validate_pack_sizes(&sizes)?;
        validated.sort_unstable();
        validated.dedup();

        self.pack_size_provider.merge(&validated).await?;
        let pack_sizes = self.pack_size_provider.read().await?;
        info!(submitted = ?validated, stored = ?pack_sizes, "包装规格已合并");

        self.record_action(
            ActionType::UpdatePackSizes,
            serde_json::json!({ "submitted": validated, "stored": pack_sizes }),
            format!("合并写入 {} 个规格", validated.len()),
        );

        Ok(UpdatePackSizesResponse {
            status: "success".to_string(),
            pack_sizes,
        })
    }

    /// 删除单个规格（幂等）
    ///
    /// 非正数的规格不可能存在于存储中，直接视为已删除
    pub async fn delete_pack_size(&self, size: i64) -> ApiResult<()> {
        match u64::try_from(size).ok().filter(|&s| s > 0) {
            Some(size) => {
                self.pack_size_provider.delete(size).await?;
                info!(size, "包装规格已删除");
            }
            None => debug!(size, "非正规格，跳过删除"),
        }

        self.record_action(
            ActionType::DeletePackSize,
            serde_json::json!({ "size": size }),
            format!("删除规格 {}", size),
        );
        Ok(())
    }

    /// 查询最近的规格变更记录
    pub fn list_recent_actions(&self, limit: usize) -> ApiResult<Vec<ActionLog>> {
        match &self.action_log_repo {
            Some(repo) => Ok(repo.list_recent(limit)?),
            None => Ok(Vec::new()),
        }
    }

    fn record_action(&self, action_type: ActionType, payload: serde_json::Value, detail: String) {
        let Some(repo) = &self.action_log_repo else {
            return;
        };

        let log = ActionLog::now(action_type, API_ACTOR, Some(payload), Some(detail));
        if let Err(e) = repo.insert(&log) {
            warn!(error = %e, action_type = %action_type, "操作日志写入失败");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::pack_size_provider::InMemoryPackSizeProvider;
    use crate::domain::pack::PacksUsed;

    fn api(initial: &[u64]) -> PackApi {
        PackApi::new(
            Arc::new(InMemoryPackSizeProvider::new(initial)),
            Arc::new(PackSolver::default()),
        )
    }

    #[tokio::test]
    async fn test_calculate_reads_current_sizes() {
        let api = api(&[250, 500, 1000, 2000, 5000]);
        let plan = api.calculate_packs(501).await.unwrap();
        assert_eq!(plan.packs_used, PacksUsed::from([(500, 1), (250, 1)]));

        api.update_pack_sizes(vec![501]).await.unwrap();
        let plan = api.calculate_packs(501).await.unwrap();
        assert_eq!(plan.packs_used, PacksUsed::from([(501, 1)]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_calculations_on_blocking_pool() {
        let api = Arc::new(api(&[23, 31, 53]));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let api = Arc::clone(&api);
                tokio::spawn(async move { api.calculate_packs(100_000).await })
            })
            .collect();

        let mut plans = Vec::new();
        for handle in handles {
            plans.push(handle.await.unwrap().unwrap());
        }
        assert!(plans.iter().all(|p| p == &plans[0]));
        assert_eq!(plans[0].total_items_used, 100_000);
    }

    #[tokio::test]
    async fn test_calculate_without_sizes() {
        let api = api(&[]);
        assert!(matches!(
            api.calculate_packs(10).await,
            Err(ApiError::NoPackSizesConfigured)
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_and_keeps_store() {
        let api = api(&[250]);
        assert!(api.update_pack_sizes(vec![]).await.is_err());
        assert!(api.update_pack_sizes(vec![100, -1]).await.is_err());
        assert_eq!(api.get_pack_sizes().await.unwrap().pack_sizes, vec![250]);
    }

    #[tokio::test]
    async fn test_delete_non_positive_is_noop() {
        let api = api(&[250]);
        api.delete_pack_size(-3).await.unwrap();
        api.delete_pack_size(0).await.unwrap();
        assert_eq!(api.get_pack_sizes().await.unwrap().pack_sizes, vec![250]);
        assert!(api.list_recent_actions(10).unwrap().is_empty());
    }
}
