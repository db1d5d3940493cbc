use thiserror::Error;

/// 本文最短长度（去除首尾空白后的字符数）
pub const MIN_BODY_CHARS: usize = 50;

/// 应用程序错误类型
///
/// 单篇文章路径上的任何错误都会中止该文章的处理；
/// 批量路径上则由调度器转换为单条失败结果。
#[derive(Debug, Error)]
pub enum AppError {
    /// 本文过短，本地直接拒绝，不会发起任何 LLM 调用
    #[error("本文过短（最少 {} 字）", MIN_BODY_CHARS)]
    BodyTooShort { actual: usize },

    /// 请求字段不合法
    #[error("请求无效: {0}")]
    InvalidRequest(String),

    /// LLM 调用错误
    #[error(transparent)]
    Call(#[from] CallError),

    /// 结构化结果提取失败
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// 测验答案不是 YES/NO
    #[error("测验答案无效: {value:?}（只接受 YES/Y/NO/N）")]
    InvalidQuizAnswer { value: String },

    /// EPI 评分缺少必需的组件
    #[error("EPI 评分缺少组件 {component}（{side}）")]
    MissingEpiComponent {
        side: &'static str,
        component: String,
    },

    /// EPI 组件的值不是数值
    #[error("EPI 组件 {component}（{side}）不是数值: {value}")]
    InvalidEpiComponent {
        side: &'static str,
        component: String,
        value: String,
    },

    /// LLM 输出缺少必需字段
    #[error("LLM 输出缺少字段: {field}")]
    MissingField { field: String },

    /// 后台任务执行失败（panic 或被取消）
    #[error("任务执行失败: {0}")]
    TaskFailed(String),
}

/// 结构化结果提取错误
///
/// 两种失败都只携带有长度上限的片段，不会带上完整的原始输出。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// 输出中找不到 `{ ... }`
    #[error("LLM 输出中未找到 JSON（片段: {snippet}）")]
    NoJsonFound { snippet: String },

    /// 找到了候选片段但解析失败
    #[error("LLM 输出的 JSON 格式错误: {detail}（片段: {snippet}）")]
    MalformedJson { detail: String, snippet: String },
}

/// LLM 调用错误
#[derive(Debug, Error)]
pub enum CallError {
    /// 未配置 API 密钥，在发起网络请求前直接失败
    #[error("未配置 OPENAI_API_KEY，请检查配置文件或环境变量")]
    MissingCredential,

    /// 构建请求失败
    #[error("构建 LLM 请求失败: {0}")]
    RequestBuild(String),

    /// API 调用失败
    #[error("LLM API 调用失败 (模型: {model}): {message}")]
    Api { model: String, message: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// 配置值不合法
    #[error("配置项 {name} 无效: {reason}")]
    InvalidValue { name: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建缺少字段错误
    pub fn missing_field(field: impl Into<String>) -> Self {
        AppError::MissingField {
            field: field.into(),
        }
    }

    /// 创建请求无效错误
    pub fn invalid_request(message: impl Into<String>) -> Self {
        AppError::InvalidRequest(message.into())
    }

    /// 是否属于调用方输入错误（而不是上游或内部错误）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::BodyTooShort { .. } | AppError::InvalidRequest(_)
        )
    }
}

impl CallError {
    /// 创建 LLM API 调用错误
    pub fn api(model: impl Into<String>, source: impl std::fmt::Display) -> Self {
        CallError::Api {
            model: model.into(),
            message: source.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
