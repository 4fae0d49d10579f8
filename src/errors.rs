//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_essayhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum EssayHubError {
            $($variant(String),)*
        }

        impl EssayHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EssayHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EssayHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EssayHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EssayHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EssayHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_essayhub_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    Serialization("E006", "Serialization Error"),
    DateParse("E007", "Date Parse Error"),
    Authentication("E008", "Authentication Error"),
    Authorization("E009", "Authorization Error"),
    EssayNotFound("E010", "Essay Not Found"),
    ReviewNotFound("E011", "Review Not Found"),
    ForbiddenAccess("E012", "Forbidden Access"),
    CannotReviewOwnEssay("E013", "Cannot Review Own Essay"),
    CannotLikeOwnEssay("E014", "Cannot Like Own Essay"),
    ReviewAlreadySubmitted("E015", "Review Already Submitted"),
    EssayContentLocked("E016", "Essay Content Locked"),
    AnalysisBackend("E017", "Analysis Backend Error"),
    AnalysisFailed("E018", "Analysis Failed"),
}

impl EssayHubError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for EssayHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EssayHubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for EssayHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        EssayHubError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for EssayHubError {
    fn from(err: std::io::Error) -> Self {
        EssayHubError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EssayHubError {
    fn from(err: serde_json::Error) -> Self {
        EssayHubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for EssayHubError {
    fn from(err: chrono::ParseError) -> Self {
        EssayHubError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for EssayHubError {
    fn from(err: reqwest::Error) -> Self {
        EssayHubError::AnalysisBackend(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EssayHubError>;
