use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::ApiJson;
use crate::app::AppState;
use crate::error::AppResult;
use crate::infrastructure::ChatMessage;
use crate::workflow::ChatTurn;

/// 对话请求，`history` 中的 role 只能是 user / assistant
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub article_id: String,
    pub user_id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub article_id: String,
    pub answer: String,
    pub model: String,
    pub latency_ms: u64,
}

impl From<ChatRequest> for ChatTurn {
    fn from(request: ChatRequest) -> Self {
        ChatTurn {
            article_id: request.article_id,
            user_id: request.user_id,
            summary: request.summary,
            history: request.history,
            message: request.message,
        }
    }
}

pub(crate) async fn chat(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let turn = ChatTurn::from(request);
    let reply = state.chat_flow().reply(&turn).await?;

    Ok(Json(ChatResponse {
        article_id: turn.article_id,
        answer: reply.answer,
        model: reply.model,
        latency_ms: reply.latency_ms,
    }))
}
