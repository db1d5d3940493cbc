//! 文章改写流程 - 流程层
//!
//! 核心职责：定义"一篇文章"需要的多次 LLM 调用，并把结果合并成一个组合结果
//!
//! 两种流程：
//! 1. 单一语气：改写 → 问题+测验 → EPI 评分（EPI 依赖改写结果，按顺序执行）
//! 2. 多语气：每种语气一次"改写+EPI"调用并发执行，同时并发一次共用的问题+测验调用
//!
//! token 与耗时都是所有调用之和。任何一步失败整篇文章失败，不返回部分结果。

use std::sync::Arc;

use futures::future::try_join_all;
use serde_json::Value;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{
    ArticleInput, ComposedResult, EpiScore, GenerationUsage, Quiz, RewriteVariant, Style,
    UsageTotals,
};
use crate::services::prompts::{self, QUESTION_COUNT};
use crate::services::{LlmService, StructuredPayload};
use crate::workflow::article_ctx::ArticleCtx;

/// 单次调用参数
struct CallParams {
    label: &'static str,
    max_output_tokens: u32,
    temperature: f32,
}

const REWRITE: CallParams = CallParams {
    label: "rewrite",
    max_output_tokens: 400,
    temperature: 0.6,
};

const QUESTIONS: CallParams = CallParams {
    label: "questions",
    max_output_tokens: 400,
    temperature: 0.6,
};

const EPI: CallParams = CallParams {
    label: "epi",
    max_output_tokens: 600,
    temperature: 0.2,
};

const STYLED_REWRITE: CallParams = CallParams {
    label: "styled_rewrite",
    max_output_tokens: 900,
    temperature: 0.6,
};

/// 新标题 + 摘要
#[derive(Debug, Clone, PartialEq, Eq)]
struct Rewrite {
    new_title: String,
    summary: String,
}

/// 每篇文章共用的问题和测验
#[derive(Debug, Clone, PartialEq, Eq)]
struct Extras {
    questions: Vec<String>,
    quiz: Quiz,
}

/// 文章改写流程
///
/// - 编排一篇文章的所有 LLM 调用
/// - 合并用量
/// - 不持有任何请求级状态，可在多个请求间共享
pub struct RewriteFlow {
    llm: Arc<LlmService>,
    max_body_chars: usize,
}

impl RewriteFlow {
    /// 创建新的改写流程
    pub fn new(config: &Config, llm: Arc<LlmService>) -> Self {
        Self {
            llm,
            max_body_chars: config.max_body_chars,
        }
    }

    /// 单一语气：改写 + 问题/测验 + EPI
    pub async fn rewrite_with_extras(
        &self,
        article: &ArticleInput,
        style: Style,
    ) -> AppResult<ComposedResult> {
        article.validate()?;
        let ctx = ArticleCtx::new(&article.article_id);
        info!("{} ✍️ 开始改写 (语气: {})", ctx, style);

        let (rewrite, rewrite_usage) = self.rewrite_title_summary(article, style).await?;
        let (extras, extras_usage) = self.suggest_extras(article).await?;
        let (epi, epi_usage) = self.score_epi(article, &rewrite).await?;

        let totals: UsageTotals = [&rewrite_usage, &extras_usage, &epi_usage]
            .into_iter()
            .collect();

        let variant = RewriteVariant {
            style,
            new_title: rewrite.new_title,
            summary: rewrite.summary,
            model: rewrite_usage.model_id.clone(),
            latency_ms: rewrite_usage.latency_ms + epi_usage.latency_ms,
            epi,
        };

        info!(
            "{} ✓ 改写完成, tokens: {}/{}, 耗时: {}ms",
            ctx, totals.tokens.input, totals.tokens.output, totals.latency_ms
        );

        Ok(ComposedResult {
            article_id: article.article_id.clone(),
            variants: vec![variant],
            questions: extras.questions,
            quiz: extras.quiz,
            tokens_used: totals.tokens,
            model: rewrite_usage.model_id,
            latency_ms: totals.latency_ms,
        })
    }

    /// 多语气：每种语气一次改写+EPI 调用，另加一次共用的问题/测验调用，全部并发
    pub async fn rewrite_styles(
        &self,
        article: &ArticleInput,
        styles: &[Style],
    ) -> AppResult<ComposedResult> {
        article.validate()?;
        if styles.is_empty() {
            return Err(AppError::invalid_request("至少需要一种语气"));
        }
        let ctx = ArticleCtx::new(&article.article_id);
        info!("{} ✍️ 开始多语气改写 ({} 种)", ctx, styles.len());

        let variants = try_join_all(
            styles
                .iter()
                .map(|&style| self.styled_variant(article, style)),
        );
        let extras = self.suggest_extras(article);
        let (variants, (extras, extras_usage)) = tokio::try_join!(variants, extras)?;

        let mut totals: UsageTotals = variants.iter().map(|(_, usage)| usage).collect();
        totals.record(&extras_usage);

        let model = variants
            .first()
            .map(|(variant, _)| variant.model.clone())
            .unwrap_or_else(|| extras_usage.model_id.clone());

        info!(
            "{} ✓ 多语气改写完成, tokens: {}/{}, 耗时: {}ms",
            ctx, totals.tokens.input, totals.tokens.output, totals.latency_ms
        );

        Ok(ComposedResult {
            article_id: article.article_id.clone(),
            variants: variants.into_iter().map(|(variant, _)| variant).collect(),
            questions: extras.questions,
            quiz: extras.quiz,
            tokens_used: totals.tokens,
            model,
            latency_ms: totals.latency_ms,
        })
    }

    async fn call(
        &self,
        params: &CallParams,
        (system, user): (String, String),
    ) -> AppResult<(StructuredPayload, GenerationUsage)> {
        let generation = self
            .llm
            .invoke_structured(
                params.label,
                &system,
                &user,
                params.max_output_tokens,
                params.temperature,
            )
            .await?;
        Ok((generation.payload, generation.usage))
    }

    async fn rewrite_title_summary(
        &self,
        article: &ArticleInput,
        style: Style,
    ) -> AppResult<(Rewrite, GenerationUsage)> {
        let prompt = prompts::rewrite(&article.title, article.body_text(), style, self.max_body_chars);
        let (payload, usage) = self.call(&REWRITE, prompt).await?;
        Ok((decode_rewrite(&payload)?, usage))
    }

    async fn suggest_extras(&self, article: &ArticleInput) -> AppResult<(Extras, GenerationUsage)> {
        let prompt = prompts::questions_and_quiz(&article.title, article.body_text(), self.max_body_chars);
        let (payload, usage) = self.call(&QUESTIONS, prompt).await?;
        Ok((decode_extras(&payload)?, usage))
    }

    async fn score_epi(
        &self,
        article: &ArticleInput,
        rewrite: &Rewrite,
    ) -> AppResult<(EpiScore, GenerationUsage)> {
        let prompt = prompts::epi_scoring(
            &article.title,
            article.body_text(),
            &rewrite.new_title,
            &rewrite.summary,
            self.max_body_chars,
        );
        let (payload, usage) = self.call(&EPI, prompt).await?;
        Ok((EpiScore::from_payload(&payload)?, usage))
    }

    async fn styled_variant(
        &self,
        article: &ArticleInput,
        style: Style,
    ) -> AppResult<(RewriteVariant, GenerationUsage)> {
        let prompt =
            prompts::styled_rewrite(&article.title, article.body_text(), style, self.max_body_chars);
        let (payload, usage) = self.call(&STYLED_REWRITE, prompt).await?;

        let rewrite = decode_rewrite(&payload)?;
        let epi_payload = payload
            .get("epi")
            .and_then(Value::as_object)
            .ok_or_else(|| AppError::missing_field("epi"))?;
        let epi = EpiScore::from_payload(epi_payload)?;

        let variant = RewriteVariant {
            style,
            new_title: rewrite.new_title,
            summary: rewrite.summary,
            model: usage.model_id.clone(),
            latency_ms: usage.latency_ms,
            epi,
        };
        Ok((variant, usage))
    }
}

fn required_text(payload: &StructuredPayload, field: &str) -> AppResult<String> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::missing_field(field))
}

fn decode_rewrite(payload: &StructuredPayload) -> AppResult<Rewrite> {
    Ok(Rewrite {
        new_title: required_text(payload, "newTitle")?,
        summary: required_text(payload, "summary")?,
    })
}

/// 只保留字符串类型的问题，最多 4 个，不足不补
fn decode_extras(payload: &StructuredPayload) -> AppResult<Extras> {
    let questions = payload
        .get("questions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .take(QUESTION_COUNT)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let quiz = payload
        .get("quiz")
        .ok_or_else(|| AppError::missing_field("quiz"))
        .and_then(Quiz::from_value)?;

    Ok(Extras { questions, quiz })
}
