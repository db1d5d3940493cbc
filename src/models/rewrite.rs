use std::fmt;

use serde::{Deserialize, Serialize};

use super::epi::EpiScore;
use super::quiz::Quiz;
use super::usage::TokensUsed;

/// 改写语气
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Style {
    Concise,
    Friendly,
    #[default]
    Neutral,
}

impl Style {
    /// 全部语气，顺序固定
    pub const ALL: [Style; 3] = [Style::Concise, Style::Friendly, Style::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Concise => "CONCISE",
            Style::Friendly => "FRIENDLY",
            Style::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 某一种语气的改写结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteVariant {
    pub style: Style,
    pub new_title: String,
    pub summary: String,
    pub model: String,
    pub latency_ms: u64,
    pub epi: EpiScore,
}

/// 一篇文章的组合结果
///
/// 问题和测验每篇文章只生成一次，所有语气共用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedResult {
    pub article_id: String,
    pub variants: Vec<RewriteVariant>,
    pub questions: Vec<String>,
    pub quiz: Quiz,
    pub tokens_used: TokensUsed,
    pub model: String,
    pub latency_ms: u64,
}

/// 批量处理中单篇文章的结果
///
/// `ok` 为 true 时只有 `result`，为 false 时只有 `error`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemOutcome<T = ComposedResult> {
    pub article_id: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> BatchItemOutcome<T> {
    pub fn success(article_id: impl Into<String>, result: T) -> Self {
        Self {
            article_id: article_id.into(),
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(article_id: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            article_id: article_id.into(),
            ok: false,
            result: None,
            error: Some(error.to_string()),
        }
    }
}
