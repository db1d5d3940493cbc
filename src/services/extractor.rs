//! 结构化结果提取
//!
//! LLM 经常把 JSON 包在说明文字或 ``` 代码块里。
//! 做法分两步：先定位候选片段（第一个 `{` 到最后一个 `}`），再解析；
//! 两种失败都带有长度受限的片段，便于排查。

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::ExtractionError;
use crate::utils::truncate_chars;

/// 从 LLM 输出中解码出的键值对，调用方用完即弃
pub type StructuredPayload = Map<String, Value>;

/// 找不到 JSON 时附带的原文片段长度
pub const NO_JSON_SNIPPET_CHARS: usize = 180;
/// JSON 解析失败时附带的候选片段长度
pub const MALFORMED_SNIPPET_CHARS: usize = 400;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("valid regex"));

/// 从原始输出中提取 JSON 对象
pub fn extract(raw: &str) -> Result<StructuredPayload, ExtractionError> {
    let segment = fenced_segment(raw).unwrap_or(raw);

    let span = match (segment.find('{'), segment.rfind('}')) {
        (Some(start), Some(end)) if end > start => &segment[start..=end],
        _ => {
            return Err(ExtractionError::NoJsonFound {
                snippet: truncate_chars(raw, NO_JSON_SNIPPET_CHARS),
            })
        }
    };

    serde_json::from_str::<StructuredPayload>(span).map_err(|e| ExtractionError::MalformedJson {
        detail: e.to_string(),
        snippet: truncate_chars(span, MALFORMED_SNIPPET_CHARS),
    })
}

/// 第一个同时包含 `{` 和 `}` 的代码块内容
fn fenced_segment(raw: &str) -> Option<&str> {
    if !raw.contains("```") {
        return None;
    }
    FENCED_BLOCK
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|body| body.contains('{') && body.contains('}'))
}
