// ==========================================
// 订单装箱规划 - HTTP 传输层
// ==========================================
// 职责: 路由、请求解析、ApiError → HTTP 状态码映射
// 路由:
//   GET    /health
//   GET    /v1/calc?items=N
//   GET    /v1/pack-sizes
//   PUT    /v1/pack-sizes          {"pack_sizes": [..]}
//   DELETE /v1/pack-sizes/:size    (204)
// 跨域: 来源白名单 + 凭据，预检缓存 12h
// ==========================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::api::validator;
use crate::api::ApiError;
use crate::app::state::AppState;

pub type SharedState = Arc<AppState>;

// ==========================================
// 请求 / 响应结构
// ==========================================

#[derive(Debug, Deserialize)]
pub struct CalcQuery {
    pub items: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePackSizesRequest {
    pub pack_sizes: Vec<i64>,
}

/// 错误响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

// ==========================================
// 错误映射
// ==========================================

/// ApiError 对应的 HTTP 状态码
pub fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        ApiError::NoPackSizesConfigured => StatusCode::CONFLICT,
        ApiError::NoFeasibleCombination { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ApiError::DatabaseError(_)
        | ApiError::DatabaseConnectionError(_)
        | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub struct HttpError(pub ApiError);

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        HttpError(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            warn!(code = self.0.code(), error = %self.0, "请求处理失败");
        }

        let body = ErrorResponse {
            code: self.0.code().to_string(),
            message: self.0.to_string(),
            details: self.0.details(),
        };
        (status, Json(body)).into_response()
    }
}

type HttpResult<T> = Result<T, HttpError>;

// ==========================================
// 路由
// ==========================================

/// 预检结果缓存时长
const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/health", get(health))
        .route("/v1/calc", get(calc))
        .route("/v1/pack-sizes", get(get_pack_sizes).put(update_pack_sizes))
        .route("/v1/pack-sizes/:size", delete(delete_pack_size))
        .layer(cors)
        .with_state(state)
}

/// 构建跨域策略
///
/// 携带凭据时不允许通配来源，`*` 与非法来源会被跳过
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            if origin == "*" {
                warn!("跨域来源不支持通配符，已忽略");
                return None;
            }
            match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(origin = %origin, error = %e, "跨域来源无效，已忽略");
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "version": crate::VERSION }))
}

async fn calc(State(state): State<SharedState>, Query(q): Query<CalcQuery>) -> HttpResult<Response> {
    let plan = state.pack_api.calculate_packs_raw(q.items.as_deref()).await?;
    Ok(Json(plan).into_response())
}

async fn get_pack_sizes(State(state): State<SharedState>) -> HttpResult<Response> {
    let payload = state.pack_api.get_pack_sizes().await?;
    Ok(Json(payload).into_response())
}

async fn update_pack_sizes(
    State(state): State<SharedState>,
    body: Result<Json<UpdatePackSizesRequest>, JsonRejection>,
) -> HttpResult<Response> {
    let Json(req) = body.map_err(|e| ApiError::InvalidInput(format!("无效的 JSON 请求体: {}", e.body_text())))?;
    let resp = state.pack_api.update_pack_sizes(req.pack_sizes).await?;
    Ok(Json(resp).into_response())
}

async fn delete_pack_size(
    State(state): State<SharedState>,
    Path(raw): Path<String>,
) -> HttpResult<StatusCode> {
    let size = validator::parse_size_param(&raw)?;
    state.pack_api.delete_pack_size(size).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==========================================
// 服务启动
// ==========================================

/// 监听并服务，Ctrl-C / SIGTERM 时优雅退出
pub async fn serve(state: SharedState, addr: SocketAddr) -> std::io::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP 服务已启动");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP 服务已退出");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "ctrl-c 监听失败");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM 监听失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("收到 ctrl-c，开始关闭"),
        _ = terminate => info!("收到 SIGTERM，开始关闭"),
    }
}
