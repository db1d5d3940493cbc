//! EPI（刺激性指数）评分
//!
//! LLM 对原文和改写后的文本分别按 8 个固定组件打分，
//! 解码时组件必须齐全，缺失即报错，不做补零。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// 固定的组件集合
pub const EPI_COMPONENTS: [&str; 8] = ["S", "SUBJ", "K", "F", "C", "V", "X", "EVID"];

/// 综合分数所在的键
const TOTAL_KEY: &str = "EPI";

/// 组件名 → 分值
pub type EpiComponents = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpiScore {
    pub original_score: i64,
    pub summary_score: i64,
    pub reduction_pct: f64,
    pub components_original: EpiComponents,
    pub components_summary: EpiComponents,
    pub narrative: String,
}

impl EpiScore {
    /// 解码 `{original:{..}, summary:{..}, reductionPct, stimulationReduced}`
    ///
    /// 分值原样保留，不做范围裁剪。
    pub fn from_payload(payload: &Map<String, Value>) -> AppResult<Self> {
        let (original_score, components_original) = decode_side(payload, "original")?;
        let (summary_score, components_summary) = decode_side(payload, "summary")?;

        let reduction_pct = match payload.get("reductionPct") {
            None | Some(Value::Null) => derive_reduction(original_score, summary_score),
            Some(value) => value.as_f64().ok_or_else(|| AppError::InvalidEpiComponent {
                side: "payload",
                component: "reductionPct".to_string(),
                value: value.to_string(),
            })?,
        };

        let narrative = match payload.get("stimulationReduced") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.trim().to_string(),
            Some(other) => other.to_string(),
        };

        Ok(Self {
            original_score,
            summary_score,
            reduction_pct,
            components_original,
            components_summary,
            narrative,
        })
    }
}

fn decode_side(payload: &Map<String, Value>, side: &'static str) -> AppResult<(i64, EpiComponents)> {
    let scores = payload
        .get(side)
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::missing_field(side))?;

    let mut components = EpiComponents::new();
    for name in EPI_COMPONENTS {
        components.insert(name.to_string(), numeric(scores, side, name)?);
    }
    let total = numeric(scores, side, TOTAL_KEY)?.round() as i64;

    Ok((total, components))
}

fn numeric(scores: &Map<String, Value>, side: &'static str, name: &str) -> AppResult<f64> {
    let value = scores.get(name).ok_or_else(|| AppError::MissingEpiComponent {
        side,
        component: name.to_string(),
    })?;
    value.as_f64().ok_or_else(|| AppError::InvalidEpiComponent {
        side,
        component: name.to_string(),
        value: value.to_string(),
    })
}

fn derive_reduction(original: i64, summary: i64) -> f64 {
    if original <= 0 {
        return 0.0;
    }
    (original - summary) as f64 / original as f64 * 100.0
}
