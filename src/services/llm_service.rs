//! LLM 服务 - 业务能力层
//!
//! 只负责"发一次请求、拿回文本和用量"，不关心流程。
//! 需要结构化结果的调用在这里接上提取器。

use std::sync::Arc;

use tokio::time::Instant;
use tracing::debug;

use super::extractor::{self, StructuredPayload};
use crate::config::Config;
use crate::error::{AppResult, CallError};
use crate::infrastructure::{ChatMessage, GenerationBackend, GenerationRequest, OpenAiBackend};
use crate::models::GenerationUsage;

/// 一次生成调用的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub usage: GenerationUsage,
}

/// 解码成结构化数据的生成结果
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredGeneration {
    pub payload: StructuredPayload,
    pub usage: GenerationUsage,
}

/// LLM 服务
///
/// 职责：
/// - 检查凭据，缺失时不发起任何网络请求
/// - 计时、补齐缺失的用量信息
/// - 不做重试
pub struct LlmService {
    backend: Arc<dyn GenerationBackend>,
    model_name: String,
    has_credential: bool,
}

impl LlmService {
    /// 创建使用 OpenAI 兼容后端的服务
    pub fn new(config: &Config) -> Self {
        Self::with_backend(config, Arc::new(OpenAiBackend::new(config)))
    }

    /// 使用自定义后端
    pub fn with_backend(config: &Config, backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            model_name: config.model_name.clone(),
            has_credential: config.has_credential(),
        }
    }

    /// 系统提示 + 用户提示的单轮调用
    pub async fn invoke(
        &self,
        label: &'static str,
        system_prompt: &str,
        user_prompt: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<Generation, CallError> {
        let messages = vec![ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)];
        self.converse(label, messages, max_output_tokens, temperature)
            .await
    }

    /// 单轮调用并提取结构化结果
    pub async fn invoke_structured(
        &self,
        label: &'static str,
        system_prompt: &str,
        user_prompt: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> AppResult<StructuredGeneration> {
        let generation = self
            .invoke(label, system_prompt, user_prompt, max_output_tokens, temperature)
            .await?;
        let payload = extractor::extract(&generation.text)?;
        Ok(StructuredGeneration {
            payload,
            usage: generation.usage,
        })
    }

    /// 多轮对话形式的调用，消息按原顺序发送
    pub async fn converse(
        &self,
        label: &'static str,
        messages: Vec<ChatMessage>,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<Generation, CallError> {
        if !self.has_credential {
            return Err(CallError::MissingCredential);
        }

        let request = GenerationRequest {
            label,
            messages,
            max_output_tokens,
            temperature,
        };

        let started = Instant::now();
        let reply = self.backend.generate(request).await?;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let usage = GenerationUsage {
            input_tokens: reply.input_tokens.unwrap_or(0),
            output_tokens: reply.output_tokens.unwrap_or(0),
            latency_ms,
            model_id: reply.model.unwrap_or_else(|| self.model_name.clone()),
        };

        debug!(
            "[{}] 模型: {}, tokens: {}/{}, 耗时: {}ms",
            label, usage.model_id, usage.input_tokens, usage.output_tokens, usage.latency_ms
        );

        Ok(Generation {
            text: reply.envelope.into_text(),
            usage,
        })
    }
}
