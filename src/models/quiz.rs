use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// 是非题答案
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuizAnswer {
    Yes,
    No,
}

impl FromStr for QuizAnswer {
    type Err = AppError;

    /// 去除空白并转大写后：YES/Y → Yes，NO/N → No，其余一律报错，不做默认
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_uppercase().as_str() {
            "YES" | "Y" => Ok(QuizAnswer::Yes),
            "NO" | "N" => Ok(QuizAnswer::No),
            _ => Err(AppError::InvalidQuizAnswer {
                value: raw.to_string(),
            }),
        }
    }
}

/// 是非题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub question: String,
    pub answer: QuizAnswer,
}

impl Quiz {
    /// 从 LLM 输出的 `quiz` 对象解码
    pub fn from_value(value: &Value) -> AppResult<Self> {
        let question = value
            .get("question")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::missing_field("quiz.question"))?;

        let answer = match value.get("answer") {
            Some(Value::String(raw)) => raw.parse()?,
            Some(other) => {
                return Err(AppError::InvalidQuizAnswer {
                    value: other.to_string(),
                })
            }
            None => return Err(AppError::missing_field("quiz.answer")),
        };

        Ok(Self {
            question: question.to_string(),
            answer,
        })
    }
}
