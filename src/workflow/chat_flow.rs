//! 文章对话流程
//!
//! 把"文章摘要 + 历史对话 + 新问题"组装成一次多轮调用。
//! 服务端不保存对话状态，历史由调用方每次完整传入。

use std::sync::Arc;

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::infrastructure::{ChatMessage, Role};
use crate::services::{prompts, LlmService};
use crate::utils::truncate_chars;
use crate::workflow::article_ctx::ArticleCtx;

const CHAT_LABEL: &str = "chat";
const CHAT_MAX_OUTPUT_TOKENS: u32 = 600;
const CHAT_TEMPERATURE: f32 = 0.7;

/// 一轮对话的输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub article_id: String,
    pub user_id: String,
    pub summary: String,
    /// 之前的对话，只允许 user / assistant
    pub history: Vec<ChatMessage>,
    pub message: String,
}

/// 一轮对话的回答
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: String,
    pub model: String,
    pub latency_ms: u64,
}

pub struct ChatFlow {
    llm: Arc<LlmService>,
}

impl ChatFlow {
    pub fn new(llm: Arc<LlmService>) -> Self {
        Self { llm }
    }

    /// 回答读者关于某篇文章的问题
    pub async fn reply(&self, turn: &ChatTurn) -> AppResult<ChatReply> {
        let messages = build_messages(turn)?;
        let ctx = ArticleCtx::new(&turn.article_id);
        info!(
            "{} 💬 用户 {} 提问 (历史 {} 条): {}",
            ctx,
            turn.user_id,
            turn.history.len(),
            truncate_chars(turn.message.trim(), 40)
        );

        let generation = self
            .llm
            .converse(CHAT_LABEL, messages, CHAT_MAX_OUTPUT_TOKENS, CHAT_TEMPERATURE)
            .await?;

        Ok(ChatReply {
            answer: generation.text.trim().to_string(),
            model: generation.usage.model_id,
            latency_ms: generation.usage.latency_ms,
        })
    }
}

/// 开场系统消息 → 历史（原顺序） → 新问题
fn build_messages(turn: &ChatTurn) -> AppResult<Vec<ChatMessage>> {
    if turn.article_id.trim().is_empty() {
        return Err(AppError::invalid_request("articleId 不能为空"));
    }
    if turn.message.trim().is_empty() {
        return Err(AppError::invalid_request("message 不能为空"));
    }
    if turn.history.iter().any(|m| m.role == Role::System) {
        return Err(AppError::invalid_request(
            "history 只能包含 user 或 assistant 消息",
        ));
    }

    let mut messages = Vec::with_capacity(turn.history.len() + 2);
    messages.push(ChatMessage::system(prompts::chat_preamble(
        &turn.article_id,
        &turn.summary,
    )));
    messages.extend(turn.history.iter().cloned());
    messages.push(ChatMessage::user(turn.message.trim()));
    Ok(messages)
}
