//! 提示词构建
//!
//! 每个函数返回 `(system, user)`，要求 LLM 只输出一个 JSON 对象。
//! 本文在写入提示词前按字符数截断。

use crate::models::{Style, EPI_COMPONENTS};
use crate::utils::truncate_chars;

/// 每篇文章生成的推荐问题数量
pub const QUESTION_COUNT: usize = 4;

const EDITOR_ROLE: &str = "You are a careful news editor. You rewrite sensational news into calm, \
     factual language without adding information that is not in the article. \
     Always answer with a single JSON object and nothing else.";

fn style_instruction(style: Style) -> &'static str {
    match style {
        Style::Concise => "Write tersely: short sentences, no filler, at most 3 sentences.",
        Style::Friendly => "Write in a warm, approachable tone for a general reader.",
        Style::Neutral => "Write in a neutral, matter-of-fact newsroom tone.",
    }
}

fn epi_schema() -> String {
    let keys = EPI_COMPONENTS
        .iter()
        .map(|k| format!("\"{k}\": number"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{keys}, \"EPI\": number}}")
}

fn article_block(title: &str, body: &str, max_body_chars: usize) -> String {
    format!(
        "Title: {}\n\nBody:\n{}",
        title.trim(),
        truncate_chars(body.trim(), max_body_chars)
    )
}

/// 新标题 + 摘要
pub fn rewrite(title: &str, body: &str, style: Style, max_body_chars: usize) -> (String, String) {
    let user = format!(
        "{}\n\nRewrite the headline without sensational wording and summarize the article in 3-5 sentences.\n{}\n\
         Respond as JSON: {{\"newTitle\": string, \"summary\": string}}",
        article_block(title, body, max_body_chars),
        style_instruction(style),
    );
    (EDITOR_ROLE.to_string(), user)
}

/// 推荐问题 + 是非题
pub fn questions_and_quiz(title: &str, body: &str, max_body_chars: usize) -> (String, String) {
    let user = format!(
        "{}\n\nSuggest {n} short follow-up questions a reader might ask about this article, \
         and one yes/no comprehension quiz answerable from the article.\n\
         Respond as JSON: {{\"questions\": [string, ... {n} items], \
         \"quiz\": {{\"question\": string, \"answer\": \"YES\" | \"NO\"}}}}",
        article_block(title, body, max_body_chars),
        n = QUESTION_COUNT,
    );
    (EDITOR_ROLE.to_string(), user)
}

/// 原文与改写文本的 EPI 评分
pub fn epi_scoring(
    title: &str,
    body: &str,
    new_title: &str,
    summary: &str,
    max_body_chars: usize,
) -> (String, String) {
    let schema = epi_schema();
    let user = format!(
        "ORIGINAL\n{}\n\nREWRITTEN\nTitle: {}\nSummary: {}\n\n\
         Score the stimulation (sensationalism) of ORIGINAL and REWRITTEN on the components \
         S, SUBJ, K, F, C, V, X, EVID and the composite EPI (0-100).\n\
         Respond as JSON: {{\"original\": {schema}, \"summary\": {schema}, \
         \"reductionPct\": number, \"stimulationReduced\": string}}",
        article_block(title, body, max_body_chars),
        new_title,
        summary,
    );
    (EDITOR_ROLE.to_string(), user)
}

/// 单一语气的改写 + EPI 评分（一次调用）
pub fn styled_rewrite(
    title: &str,
    body: &str,
    style: Style,
    max_body_chars: usize,
) -> (String, String) {
    let schema = epi_schema();
    let user = format!(
        "{}\n\nStyle: {style}. {}\n\
         1) Rewrite the headline without sensational wording and summarize the article in 3-5 sentences.\n\
         2) Score the stimulation of the original article and of your rewrite on the components \
         S, SUBJ, K, F, C, V, X, EVID and the composite EPI (0-100).\n\
         Respond as JSON: {{\"newTitle\": string, \"summary\": string, \
         \"epi\": {{\"original\": {schema}, \"summary\": {schema}, \
         \"reductionPct\": number, \"stimulationReduced\": string}}}}",
        article_block(title, body, max_body_chars),
        style_instruction(style),
    );
    (EDITOR_ROLE.to_string(), user)
}

/// 对话的固定开场：角色 + 文章 ID + 文章摘要
pub fn chat_preamble(article_id: &str, summary: &str) -> String {
    format!(
        "You are a helpful assistant answering a reader's questions about one news article. \
         Answer only from the article summary below; say so when the summary does not cover it. \
         Answer in the reader's language.\n\nArticle ID: {article_id}\nArticle summary:\n{}",
        summary.trim()
    )
}
