//! 批间节流
//!
//! 每批处理完后固定冷却一段时间，避免超过上游每分钟的吞吐上限。
//! 冷却规则独立成类型，调度器只负责在批与批之间调用 `pause`。

use std::time::Duration;

use tracing::debug;

use crate::config::Config;

/// 固定间隔的批间冷却
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPacer {
    cooldown: Duration,
    /// 最后一批之后是否也冷却
    trailing: bool,
}

impl ChunkPacer {
    pub fn new(cooldown: Duration, trailing: bool) -> Self {
        Self { cooldown, trailing }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.chunk_cooldown(), config.trailing_cooldown)
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// 该批之后是否需要冷却
    ///
    /// 与批次成败无关：整批失败也照样冷却。
    pub fn should_pause(&self, is_last: bool) -> bool {
        !self.cooldown.is_zero() && (!is_last || self.trailing)
    }

    /// 在一批结束后调用
    pub async fn pause(&self, is_last: bool) {
        if self.should_pause(is_last) {
            debug!("⏳ 批间冷却 {}ms", self.cooldown.as_millis());
            tokio::time::sleep(self.cooldown).await;
        }
    }
}
