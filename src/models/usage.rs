use serde::{Deserialize, Serialize};

/// 单次生成调用的用量
///
/// 创建后不再修改，组合结果中按调用求和。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub latency_ms: u64,
    pub model_id: String,
}

/// 输入/输出 token 合计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensUsed {
    pub input: u64,
    pub output: u64,
}

/// 多次调用的 token 与耗时合计
///
/// 耗时是各调用耗时之和，不是最大值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageTotals {
    pub tokens: TokensUsed,
    pub latency_ms: u64,
}

impl UsageTotals {
    pub fn record(&mut self, usage: &GenerationUsage) {
        self.tokens.input += u64::from(usage.input_tokens);
        self.tokens.output += u64::from(usage.output_tokens);
        self.latency_ms += usage.latency_ms;
    }
}

impl<'a> FromIterator<&'a GenerationUsage> for UsageTotals {
    fn from_iter<I: IntoIterator<Item = &'a GenerationUsage>>(iter: I) -> Self {
        let mut totals = UsageTotals::default();
        for usage in iter {
            totals.record(usage);
        }
        totals
    }
}
