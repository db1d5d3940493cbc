//! 批量文章处理器 - 编排层
//!
//! ## 职责
//!
//! 给定一批文章，对每篇文章调用同一个处理函数，并保证：
//!
//! 1. **并发上限**：同一时刻最多 `concurrency` 篇在处理（Semaphore）
//! 2. **分批处理**：按 `chunk_size` 分批，一批全部结束后才开始下一批
//! 3. **批间冷却**：每批之后由 [`ChunkPacer`] 冷却
//! 4. **失败隔离**：单篇失败只变成一条失败结果，不影响其他文章
//! 5. **顺序保持**：结果顺序与输入顺序一致
//!
//! 信号量和冷却都只属于一次批量调用，并发的批量请求之间互不影响。

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use super::pacer::ChunkPacer;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ArticleInput, BatchItemOutcome};
use crate::utils::logging::{log_batch_complete, log_batch_start, print_final_stats};
use crate::workflow::ArticleCtx;

/// 批量调度参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettings {
    pub concurrency: usize,
    pub chunk_size: usize,
    pub pacer: ChunkPacer,
}

impl BatchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            concurrency: config.batch_concurrency.max(1),
            chunk_size: config.batch_chunk_size.max(1),
            pacer: ChunkPacer::from_config(config),
        }
    }
}

/// 单篇文章的处理状态：本地已得出结果，或仍在后台执行
enum Pending<T> {
    Ready(BatchItemOutcome<T>),
    Running {
        ctx: ArticleCtx,
        handle: JoinHandle<AppResult<T>>,
    },
}

/// 批量处理器
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    settings: BatchSettings,
}

impl BatchProcessor {
    pub fn new(settings: BatchSettings) -> Self {
        Self { settings }
    }

    /// 处理一批文章，每篇文章返回一条结果，顺序与输入一致
    ///
    /// `worker` 处理单篇文章；它返回的错误会被转换成失败结果。
    pub async fn run_batch<T, F, Fut>(
        &self,
        items: Vec<ArticleInput>,
        worker: F,
    ) -> Vec<BatchItemOutcome<T>>
    where
        T: Send + 'static,
        F: Fn(ArticleInput) -> Fut,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let total = items.len();
        let chunk_size = self.settings.chunk_size;
        let total_chunks = total.div_ceil(chunk_size);
        let semaphore = Arc::new(Semaphore::new(self.settings.concurrency));

        let mut outcomes = Vec::with_capacity(total);

        for (chunk_idx, chunk) in items.chunks(chunk_size).enumerate() {
            let chunk_start = chunk_idx * chunk_size;
            let chunk_num = chunk_idx + 1;
            log_batch_start(
                chunk_num,
                total_chunks,
                chunk_start + 1,
                chunk_start + chunk.len(),
                total,
            );

            let mut pending = Vec::with_capacity(chunk.len());
            for (idx, article) in chunk.iter().enumerate() {
                let ctx = ArticleCtx::new(&article.article_id).at(chunk_start + idx + 1);
                pending.push(self.admit(ctx, article.clone(), &semaphore, &worker).await);
            }

            let mut chunk_success = 0;
            for item in pending {
                let outcome = settle(item).await;
                if outcome.ok {
                    chunk_success += 1;
                }
                outcomes.push(outcome);
            }
            log_batch_complete(chunk_num, chunk_success, chunk.len());

            self.settings.pacer.pause(chunk_num == total_chunks).await;
        }

        let succeeded = outcomes.iter().filter(|o| o.ok).count();
        print_final_stats(succeeded, total - succeeded, total);

        outcomes
    }

    /// 本地检查通过后，取得许可并在后台启动处理
    async fn admit<T, F, Fut>(
        &self,
        ctx: ArticleCtx,
        article: ArticleInput,
        semaphore: &Arc<Semaphore>,
        worker: &F,
    ) -> Pending<T>
    where
        T: Send + 'static,
        F: Fn(ArticleInput) -> Fut,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        // 本文过短：本地拒绝，不占用许可，也不发起调用
        if let Err(e) = article.ensure_body_length() {
            warn!("{} ⚠️ 跳过: {}", ctx, e);
            return Pending::Ready(BatchItemOutcome::failure(&article.article_id, e));
        }

        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                let err = AppError::TaskFailed(e.to_string());
                error!("{} ❌ {}", ctx, err);
                return Pending::Ready(BatchItemOutcome::failure(&article.article_id, err));
            }
        };

        let task = worker(article);
        let handle = tokio::spawn(async move {
            let _permit = permit;
            task.await
        });

        Pending::Running { ctx, handle }
    }
}

/// 等待单篇文章结束，把错误转换成失败结果
async fn settle<T>(item: Pending<T>) -> BatchItemOutcome<T> {
    let (ctx, handle) = match item {
        Pending::Ready(outcome) => return outcome,
        Pending::Running { ctx, handle } => (ctx, handle),
    };

    match handle.await {
        Ok(Ok(result)) => BatchItemOutcome::success(&ctx.article_id, result),
        Ok(Err(e)) => {
            error!("{} ❌ 处理失败: {}", ctx, e);
            BatchItemOutcome::failure(&ctx.article_id, e)
        }
        Err(e) => {
            let err = AppError::TaskFailed(e.to_string());
            error!("{} ❌ {}", ctx, err);
            BatchItemOutcome::failure(&ctx.article_id, err)
        }
    }
}
