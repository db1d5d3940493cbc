//! 基础设施层（Infrastructure）
//!
//! 持有唯一的网络依赖：文本生成后端。只暴露"发送消息、拿回文本和用量"的能力，
//! 不关心提示词内容，也不解析结构化结果。

pub mod generation;
pub mod openai_backend;

pub use generation::{
    ChatMessage, GenerationBackend, GenerationReply, GenerationRequest, ResponseEnvelope, Role,
};
pub use openai_backend::OpenAiBackend;

#[cfg(test)]
pub(crate) mod testing;
