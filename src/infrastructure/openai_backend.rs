//! OpenAI 兼容后端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use super::generation::{
    ChatMessage, GenerationBackend, GenerationReply, GenerationRequest, ResponseEnvelope, Role,
};
use crate::config::Config;
use crate::error::CallError;

/// 基于 chat completions 的生成后端
pub struct OpenAiBackend {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl OpenAiBackend {
    /// 创建新的后端
    pub fn new(config: &Config) -> Self {
        let mut openai_config =
            OpenAIConfig::new().with_api_key(config.openai_api_key.clone().unwrap_or_default());
        if let Some(base) = &config.openai_api_base {
            openai_config = openai_config.with_api_base(base);
        }

        Self {
            client: Client::with_config(openai_config),
            model_name: config.model_name.clone(),
        }
    }

    fn build_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage, CallError> {
        let built = match message.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(message.content.as_str())
                .build()
                .map(ChatCompletionRequestMessage::System),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(message.content.as_str())
                .build()
                .map(ChatCompletionRequestMessage::User),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(message.content.as_str())
                .build()
                .map(ChatCompletionRequestMessage::Assistant),
        };
        built.map_err(|e| CallError::RequestBuild(e.to_string()))
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationReply, CallError> {
        debug!(
            "调用 LLM API [{}]，模型: {}，消息数: {}",
            request.label,
            self.model_name,
            request.messages.len()
        );

        let messages = request
            .messages
            .iter()
            .map(Self::build_message)
            .collect::<Result<Vec<_>, _>>()?;

        let api_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(request.temperature)
            .max_completion_tokens(request.max_output_tokens)
            .build()
            .map_err(|e| CallError::RequestBuild(e.to_string()))?;

        let response = self.client.chat().create(api_request).await.map_err(|e| {
            warn!("LLM API 调用失败 [{}]: {}", request.label, e);
            CallError::api(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功 [{}]", request.label);

        Ok(reply_from(&response))
    }
}

/// 用量和模型名缺失时保持为 None，由调用层补默认值
fn reply_from(response: &CreateChatCompletionResponse) -> GenerationReply {
    let (input_tokens, output_tokens) = match &response.usage {
        Some(usage) => (Some(usage.prompt_tokens), Some(usage.completion_tokens)),
        None => (None, None),
    };

    GenerationReply {
        envelope: envelope_from(response),
        input_tokens,
        output_tokens,
        model: Some(response.model.clone()).filter(|m| !m.is_empty()),
    }
}

/// 便捷字段（第一个 choice 的内容）→ 遍历所有 choice → 整体渲染
fn envelope_from(response: &CreateChatCompletionResponse) -> ResponseEnvelope {
    let contents: Vec<String> = response
        .choices
        .iter()
        .map(|choice| choice.message.content.clone().unwrap_or_default())
        .collect();

    match contents.first() {
        Some(first) if !first.trim().is_empty() => ResponseEnvelope::OutputText(first.clone()),
        _ if contents.iter().any(|c| !c.trim().is_empty()) => {
            ResponseEnvelope::ContentTree(contents)
        }
        _ => ResponseEnvelope::Opaque(format!("{:?}", response)),
    }
}
