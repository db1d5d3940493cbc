//! API 模块
//!
//! HTTP 边界：路由、请求/响应结构、错误到状态码的映射。
//! 处理函数只做参数转换，业务全部委托给 workflow / orchestrator。

pub(crate) mod chat;
pub(crate) mod health;
pub(crate) mod rewrite;

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::app::AppState;
use crate::error::AppError;

pub use chat::{ChatRequest, ChatResponse};
pub use rewrite::{BatchRequest, BatchResponse, RewriteRequest};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/v1/rewrite-summarize", post(rewrite::rewrite_summarize))
        .route("/v1/rewrite-styles", post(rewrite::rewrite_styles))
        .route("/v1/rewrite-batch", post(rewrite::rewrite_batch))
        .route("/v1/chat", post(chat::chat))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// JSON 请求体提取器，解析失败时同样返回 `{detail}`
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub(crate) struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            warn!("⚠️ 请求被拒绝: {}", self);
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            error!("❌ 请求处理失败: {}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });
        (status, body).into_response()
    }
}
