/// 日志工具模块
///
/// 提供日志初始化以及批量处理各阶段的输出辅助函数
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化全局日志订阅者
///
/// `RUST_LOG` 优先；否则 `verbose` 为 true 时使用 debug，反之 info。
/// 重复调用是安全的，已有全局订阅者时只记一条 debug 日志。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
    {
        debug!("日志订阅者已存在，沿用现有配置: {}", e);
    }
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 文章改写服务启动");
    info!("🤖 模型: {}", config.model_name);
    info!(
        "📊 批量并发数: {}, 每批 {} 篇, 批间冷却 {}ms",
        config.batch_concurrency, config.batch_chunk_size, config.chunk_cooldown_ms
    );
    if !config.has_credential() {
        info!("⚠️ 未配置 OPENAI_API_KEY，所有生成请求都会失败");
    }
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `start`: 起始文章编号
/// - `end`: 结束文章编号
/// - `total`: 文章总数
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!(
        "📦 开始处理第 {}/{} 批 (文章 {}-{} / 共 {} 篇)",
        batch_num, total_batches, start, end, total
    );
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
}

/// 打印批量处理最终统计
pub fn print_final_stats(success: usize, failed: usize, total: usize) {
    info!(
        "📊 批量处理完成 ({}): ✅ 成功 {}/{}, ❌ 失败 {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        success,
        total,
        failed
    );
}

/// 按字符截断文本，结果最多 `max_chars` 个字符
///
/// 用于日志预览和错误片段，按字符而不是字节计数，不会切断多字节字符。
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
