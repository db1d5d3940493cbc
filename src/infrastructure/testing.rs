//! 单元测试用的脚本化后端

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::generation::{GenerationBackend, GenerationReply, GenerationRequest};
use crate::config::Config;
use crate::error::CallError;
use crate::models::Style;

type Responder = dyn Fn(&GenerationRequest) -> Result<GenerationReply, CallError> + Send + Sync;

/// 按请求内容返回脚本化结果，并记录所有请求
pub(crate) struct ScriptedBackend {
    responder: Box<Responder>,
    delay: Duration,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub(crate) fn new<F>(responder: F) -> Self
    where
        F: Fn(&GenerationRequest) -> Result<GenerationReply, CallError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 正常返回所有类型调用的后端
    pub(crate) fn happy() -> Self {
        Self::new(happy_reply)
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn labels(&self) -> Vec<&'static str> {
        self.requests.lock().unwrap().iter().map(|r| r.label).collect()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationReply, CallError> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.responder)(&request)
    }
}

pub(crate) fn test_config() -> Config {
    Config {
        openai_api_key: Some("sk-test".to_string()),
        model_name: "mock-model".to_string(),
        ..Config::default()
    }
}

pub(crate) fn epi_side(total: f64) -> Value {
    json!({
        "S": 4, "SUBJ": 3.5, "K": 2, "F": 1,
        "C": 2.5, "V": 3, "X": 0.5, "EVID": 1, "EPI": total
    })
}

pub(crate) fn epi_payload() -> Value {
    json!({
        "original": epi_side(70.0),
        "summary": epi_side(28.0),
        "reductionPct": 60.0,
        "stimulationReduced": "감정적 표현을 줄였습니다."
    })
}

/// 从用户提示中找出语气
pub(crate) fn style_of(request: &GenerationRequest) -> Option<Style> {
    let user = request.messages.last()?;
    Style::ALL
        .into_iter()
        .find(|style| user.content.contains(&format!("Style: {style}.")))
}

/// 各类调用的固定 token 用量
pub(crate) fn usage_for(label: &str) -> (u32, u32) {
    match label {
        "rewrite" => (100, 20),
        "questions" => (80, 30),
        "epi" => (150, 60),
        "styled_rewrite" => (200, 90),
        _ => (50, 10),
    }
}

pub(crate) fn happy_reply(request: &GenerationRequest) -> Result<GenerationReply, CallError> {
    let text = match request.label {
        "rewrite" => json!({"newTitle": " 차분한 제목 ", "summary": "요약문입니다."}).to_string(),
        "questions" => format!(
            "Here you go:\n```json\n{}\n```",
            json!({
                "questions": ["q1", 2, "q2", "q3", "q4", "q5"],
                "quiz": {"question": "사실인가?", "answer": "yes"}
            })
        ),
        "epi" => epi_payload().to_string(),
        "styled_rewrite" => {
            let style = style_of(request).unwrap_or_default();
            json!({
                "newTitle": format!("{style} 제목"),
                "summary": format!("{style} 요약"),
                "epi": epi_payload()
            })
            .to_string()
        }
        _ => "답변입니다.".to_string(),
    };
    let (input, output) = usage_for(request.label);
    Ok(GenerationReply::text(text)
        .with_usage(input, output)
        .with_model("mock-model"))
}
