//! 集成测试共用的内存后端

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use article_rewriter::error::CallError;
use article_rewriter::{build_router, AppState, Config, LlmService};
use article_rewriter::{GenerationBackend, GenerationReply, GenerationRequest};

pub const LONG_BODY: &str = "어제 오후 시내 중심가 교차로에서 승용차 두 대가 부딪치는 사고가 발생해 \
     운전자 두 명이 경상을 입었다. 경찰은 신호 위반 여부를 포함해 정확한 사고 원인을 조사하고 있다.";

/// 按调用类型返回固定结果的后端，可让指定文章的调用失败
#[derive(Default)]
pub struct MockBackend {
    /// 用户提示中包含该文本的调用一律失败
    fail_marker: Option<String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockBackend {
    pub fn failing_on(marker: impl Into<String>) -> Self {
        Self {
            fail_marker: Some(marker.into()),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn epi_side(total: f64) -> Value {
    json!({"S": 3, "SUBJ": 2, "K": 1, "F": 1, "C": 2, "V": 3, "X": 0, "EVID": 1, "EPI": total})
}

fn epi() -> Value {
    json!({
        "original": epi_side(64.0),
        "summary": epi_side(16.0),
        "stimulationReduced": "과장된 표현을 제거했습니다."
    })
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationReply, CallError> {
        self.requests.lock().unwrap().push(request.clone());

        let user = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        if let Some(marker) = &self.fail_marker {
            if user.contains(marker.as_str()) {
                return Err(CallError::api("mock-model", "upstream exploded"));
            }
        }

        let (text, input, output) = match request.label {
            "rewrite" => (
                json!({"newTitle": "교차로 추돌 사고로 2명 경상", "summary": "승용차 두 대가 부딪쳤다."})
                    .to_string(),
                120,
                40,
            ),
            "questions" => (
                json!({
                    "questions": ["사고는 언제?", "부상자는?", "원인은?", "신호 위반?"],
                    "quiz": {"question": "부상자는 두 명인가?", "answer": "Y"}
                })
                .to_string(),
                90,
                35,
            ),
            "epi" => (epi().to_string(), 160, 70),
            "styled_rewrite" => (
                json!({"newTitle": "추돌 사고", "summary": "두 명이 다쳤다.", "epi": epi()})
                    .to_string(),
                210,
                95,
            ),
            _ => ("두 명이 경상을 입었습니다.".to_string(), 60, 15),
        };

        Ok(GenerationReply::text(text)
            .with_usage(input, output)
            .with_model("mock-model-2025"))
    }
}

pub fn test_config() -> Config {
    Config {
        openai_api_key: Some("sk-test".to_string()),
        model_name: "configured-model".to_string(),
        chunk_cooldown_ms: 0,
        ..Config::default()
    }
}

pub fn router_with(config: &Config, backend: Arc<MockBackend>) -> Router {
    let llm = Arc::new(LlmService::with_backend(config, backend));
    build_router(AppState::new(config, llm))
}

pub async fn post_json(router: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds");
    send(router, request).await
}

pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}
