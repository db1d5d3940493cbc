//! 文章处理上下文
//!
//! 封装"我正在处理哪篇文章（批量中的第几篇）"这一信息，只用于日志前缀

use std::fmt::Display;

/// 文章处理上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCtx {
    /// 文章ID
    pub article_id: String,

    /// 批量中的序号（从1开始），单篇请求为 None
    pub item_index: Option<usize>,
}

impl ArticleCtx {
    /// 单篇请求的上下文
    pub fn new(article_id: impl Into<String>) -> Self {
        Self {
            article_id: article_id.into(),
            item_index: None,
        }
    }

    /// 批量中第 `index` 篇
    pub fn at(mut self, index: usize) -> Self {
        self.item_index = Some(index);
        self
    }
}

impl Display for ArticleCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.item_index {
            Some(index) => write!(f, "[文章 #{} ID#{}]", index, self.article_id),
            None => write!(f, "[文章 ID#{}]", self.article_id),
        }
    }
}
