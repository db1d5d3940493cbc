//! # Article Rewriter
//!
//! 把耸动的新闻文章改写成平实的标题和摘要，并生成推荐问题、是非测验以及
//! 原文/改写文本的 EPI（刺激性指数）对比的 HTTP 服务
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 唯一的网络依赖，只暴露生成能力
//! - `GenerationBackend` - 文本生成后端接口
//! - `OpenAiBackend` - 基于 async-openai 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单次调用
//! - `LlmService` - 单次生成调用（凭据检查、计时、用量）
//! - `extractor` - 从 LLM 输出中提取 JSON
//! - `prompts` - 提示词构建
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一篇文章"的完整处理流程
//! - `ArticleCtx` - 上下文封装（article_id + 批量序号）
//! - `RewriteFlow` - 多次调用的组合（改写 → 问题/测验 → EPI，或多语气并发）
//! - `ChatFlow` - 无状态的单次对话
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量文章处理器，控制并发、分批和失败隔离
//! - `orchestrator/pacer` - 批间冷却
//!
//! HTTP 边界在 `api/`，组件组装在 `app`。
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{build_router, App, AppState};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{GenerationBackend, GenerationReply, GenerationRequest};
pub use models::{ArticleInput, BatchItemOutcome, ComposedResult, Style};
pub use orchestrator::{BatchProcessor, BatchSettings, ChunkPacer};
pub use services::LlmService;
pub use workflow::{ArticleCtx, ChatFlow, RewriteFlow};
