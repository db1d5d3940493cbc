use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CallError;

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// 一条对话消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// 一次生成请求
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// 调用用途（日志用），如 `rewrite`、`epi`
    pub label: &'static str,
    pub messages: Vec<ChatMessage>,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// 后端响应外壳
///
/// 不同调用类型返回的形状不同，每种形状各自提供取文本的方式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEnvelope {
    /// 直接给出了便捷文本字段
    OutputText(String),
    /// 需要遍历内容树，取第一段非空文本
    ContentTree(Vec<String>),
    /// 未知形状，只能整体渲染成字符串
    Opaque(String),
}

impl ResponseEnvelope {
    pub fn into_text(self) -> String {
        match self {
            ResponseEnvelope::OutputText(text) => text,
            ResponseEnvelope::ContentTree(parts) => parts
                .into_iter()
                .find(|part| !part.trim().is_empty())
                .unwrap_or_default(),
            ResponseEnvelope::Opaque(rendered) => rendered,
        }
    }
}

/// 后端返回的原始结果
///
/// 用量和模型名都可能缺失，由调用层补默认值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReply {
    pub envelope: ResponseEnvelope,
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    pub model: Option<String>,
}

impl GenerationReply {
    /// 只有文本、没有用量信息的响应
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            envelope: ResponseEnvelope::OutputText(text.into()),
            input_tokens: None,
            output_tokens: None,
            model: None,
        }
    }

    pub fn with_usage(mut self, input_tokens: u32, output_tokens: u32) -> Self {
        self.input_tokens = Some(input_tokens);
        self.output_tokens = Some(output_tokens);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// 文本生成后端
///
/// 不做重试；超时、认证等传输细节由实现自行处理。
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationReply, CallError>;
}
