// ==========================================
// 订单装箱规划 - HTTP 服务入口
// ==========================================
// 环境变量:
//   PACK_PLANNER_DB_PATH  数据库路径
//   PACK_PLANNER_BIND     监听地址（默认 0.0.0.0:8080）
//   RUST_LOG              日志级别（默认 info）
// ==========================================

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use pack_planner::app::{get_bind_addr, get_default_db_path, AppState};
use pack_planner::{logging, perf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    perf::init_from_env();

    tracing::info!("==================================================");
    tracing::info!("{}", pack_planner::APP_NAME);
    tracing::info!("系统版本: {}", pack_planner::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path)
        .map_err(anyhow::Error::msg)
        .context("无法初始化AppState")?;

    let bind = get_bind_addr();
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("无效的监听地址: {}", bind))?;

    pack_planner::app::serve(Arc::new(state), addr)
        .await
        .context("HTTP 服务异常退出")?;

    Ok(())
}
