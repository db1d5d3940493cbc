use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ApiJson;
use crate::app::AppState;
use crate::error::AppResult;
use crate::models::{ArticleInput, BatchItemOutcome, ComposedResult, Style};

/// 单篇改写请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRequest {
    #[serde(flatten)]
    pub article: ArticleInput,
    /// 缺省为 NEUTRAL
    #[serde(default)]
    pub style: Style,
}

/// 批量改写请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub items: Vec<ArticleInput>,
    /// 为 true 时每篇文章生成全部三种语气，忽略 `style`
    #[serde(default)]
    pub all_styles: bool,
    #[serde(default)]
    pub style: Style,
}

/// 批量改写结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<BatchItemOutcome>,
}

impl BatchResponse {
    fn from_outcomes(outcomes: Vec<BatchItemOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.ok).count();
        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            outcomes,
        }
    }
}

pub(crate) async fn rewrite_summarize(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RewriteRequest>,
) -> AppResult<Json<ComposedResult>> {
    let result = state
        .rewrite_flow()
        .rewrite_with_extras(&request.article, request.style)
        .await?;
    Ok(Json(result))
}

pub(crate) async fn rewrite_styles(
    State(state): State<AppState>,
    ApiJson(article): ApiJson<ArticleInput>,
) -> AppResult<Json<ComposedResult>> {
    let result = state
        .rewrite_flow()
        .rewrite_styles(&article, &Style::ALL)
        .await?;
    Ok(Json(result))
}

pub(crate) async fn rewrite_batch(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BatchRequest>,
) -> Json<BatchResponse> {
    let BatchRequest {
        items,
        all_styles,
        style,
    } = request;
    info!(
        "📥 收到批量请求: {} 篇, {}",
        items.len(),
        if all_styles {
            "全部语气".to_string()
        } else {
            format!("语气 {style}")
        }
    );

    let flow = state.rewrite_flow();
    let outcomes = state
        .batch()
        .run_batch(items, move |article| {
            let flow = flow.clone();
            async move {
                if all_styles {
                    flow.rewrite_styles(&article, &Style::ALL).await
                } else {
                    flow.rewrite_with_extras(&article, style).await
                }
            }
        })
        .await;

    Json(BatchResponse::from_outcomes(outcomes))
}
