use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, MIN_BODY_CHARS};

/// 待改写的新闻文章
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    pub article_id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl ArticleInput {
    pub fn new(
        article_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            article_id: article_id.into(),
            title: title.into(),
            body: body.into(),
        }
    }

    /// 去除首尾空白后的本文，长度检查和 prompt 都用它
    pub fn body_text(&self) -> &str {
        self.body.trim()
    }

    /// 去除首尾空白后的本文字符数
    pub fn body_chars(&self) -> usize {
        self.body_text().chars().count()
    }

    /// 本文是否满足最短长度
    pub fn has_min_body(&self) -> bool {
        self.body_chars() >= MIN_BODY_CHARS
    }

    /// 只检查本文长度
    pub fn ensure_body_length(&self) -> AppResult<()> {
        if self.has_min_body() {
            Ok(())
        } else {
            Err(AppError::BodyTooShort {
                actual: self.body_chars(),
            })
        }
    }

    /// 检查所有字段：articleId / title 非空，本文满足最短长度
    pub fn validate(&self) -> AppResult<()> {
        if self.article_id.trim().is_empty() {
            return Err(AppError::invalid_request("articleId 不能为空"));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::invalid_request("title 不能为空"));
        }
        self.ensure_body_length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_with_body(body: &str) -> ArticleInput {
        ArticleInput::new("a-1", "제목", body)
    }

    #[test]
    fn body_of_49_trimmed_chars_is_too_short() {
        let body = format!("   {}   ", "x".repeat(49));
        let err = article_with_body(&body).validate().unwrap_err();
        assert!(matches!(err, AppError::BodyTooShort { actual: 49 }));
    }

    #[test]
    fn body_of_50_chars_is_accepted() {
        assert!(article_with_body(&"가".repeat(50)).validate().is_ok());
    }

    #[test]
    fn empty_title_is_invalid_request() {
        let article = ArticleInput::new("a-1", "  ", "x".repeat(80));
        assert!(matches!(
            article.validate(),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn padded_body_is_measured_as_it_is_sent() {
        let article: ArticleInput = serde_json::from_value(serde_json::json!({
            "articleId": "n-1",
            "title": "t",
            "body": format!("\n\t  {}  \n", "가".repeat(50))
        }))
        .unwrap();

        assert_eq!(article.body_text(), "가".repeat(50));
        assert_eq!(article.body_chars(), article.body_text().chars().count());
        assert!(article.validate().is_ok());
    }

    #[test]
    fn deserializes_camel_case_fields() {
        let article: ArticleInput = serde_json::from_str(
            r#"{"articleId": "n-42", "title": "t", "body": "b"}"#,
        )
        .unwrap();
        assert_eq!(article.article_id, "n-42");
    }
}
