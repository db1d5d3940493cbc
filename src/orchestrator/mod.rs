//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理的调度，不关心单篇文章要发几次调用。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文章处理器
//! - 控制并发数量（Semaphore）
//! - 分批处理，批与批之间冷却
//! - 单篇失败转换为失败结果，不中断整批
//! - 输出批量统计信息
//!
//! ### `pacer` - 批间冷却
//! - 固定间隔，最后一批之后是否冷却可配置
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<ArticleInput>)
//!     ↓
//! workflow::RewriteFlow (处理单篇文章)
//!     ↓
//! services (能力层：llm / extractor / prompts)
//!     ↓
//! infrastructure (基础设施：GenerationBackend)
//! ```

pub mod batch_processor;
pub mod pacer;

// 重新导出主要类型
pub use batch_processor::{BatchProcessor, BatchSettings};
pub use pacer::ChunkPacer;
