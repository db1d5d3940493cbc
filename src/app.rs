use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::api;
use crate::config::Config;
use crate::orchestrator::{BatchProcessor, BatchSettings};
use crate::services::LlmService;
use crate::workflow::{ChatFlow, RewriteFlow};

/// 所有请求共享的只读组件
#[derive(Clone)]
pub struct AppState {
    rewrite_flow: Arc<RewriteFlow>,
    chat_flow: Arc<ChatFlow>,
    batch: Arc<BatchProcessor>,
}

impl AppState {
    /// 使用给定的 LLM 服务组装各组件
    pub fn new(config: &Config, llm: Arc<LlmService>) -> Self {
        Self {
            rewrite_flow: Arc::new(RewriteFlow::new(config, llm.clone())),
            chat_flow: Arc::new(ChatFlow::new(llm)),
            batch: Arc::new(BatchProcessor::new(BatchSettings::from_config(config))),
        }
    }

    /// 生产环境：OpenAI 兼容后端
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, Arc::new(LlmService::new(config)))
    }

    pub(crate) fn rewrite_flow(&self) -> Arc<RewriteFlow> {
        Arc::clone(&self.rewrite_flow)
    }

    pub(crate) fn chat_flow(&self) -> Arc<ChatFlow> {
        Arc::clone(&self.chat_flow)
    }

    pub(crate) fn batch(&self) -> Arc<BatchProcessor> {
        Arc::clone(&self.batch)
    }
}

pub fn build_router(state: AppState) -> Router {
    api::router(state)
}

/// 应用主结构
pub struct App {
    config: Config,
    router: Router,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let state = AppState::from_config(&config);
        let router = build_router(state);
        Ok(Self { config, router })
    }

    /// 监听端口并处理请求，直到进程退出
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("无法监听地址 {}", self.config.bind_addr))?;

        info!("🌐 HTTP 服务已启动: {}", self.config.bind_addr);

        axum::serve(listener, self.router)
            .await
            .context("HTTP 服务异常退出")?;

        Ok(())
    }
}
