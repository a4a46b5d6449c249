//! 问卷服务错误类型
//!
//! 仓储层和聚合服务统一返回 `SurveyError`，由外部 HTTP 层根据 `kind()` 渲染状态码。

use thiserror::Error;

/// 错误分类
///
/// 对应 HTTP 层的 400 / 404 / 500 三类响应
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Internal,
}

/// 问卷服务错误类型
#[derive(Debug, Error)]
pub enum SurveyError {
    // === 资源不存在 ===
    #[error("问卷不存在: {0}")]
    QuestionnaireNotFound(i32),

    #[error("问题不存在: {0}")]
    QuestionNotFound(i32),

    #[error("回答记录不存在: response_id={0}")]
    RespondentNotFound(i32),

    #[error("结果为空: {0}")]
    NotFound(String),

    // === 参数错误 ===
    #[error("无效的参数: {field} - {message}")]
    InvalidArgument { field: String, message: String },

    // === 约束错误 ===
    #[error("记录已存在: {0}")]
    Conflict(String),

    #[error("外键约束失败: {0}")]
    Referential(String),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(sqlx::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 问卷服务 Result 类型别名
pub type Result<T> = std::result::Result<T, SurveyError>;

impl From<sqlx::Error> for SurveyError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::Conflict(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return Self::Referential(db_err.message().to_string());
            }
        }
        Self::Database(err)
    }
}

/// 输入校验失败统一归为参数错误
impl From<validator::ValidationErrors> for SurveyError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::invalid_argument("input", errors.to_string())
    }
}

impl SurveyError {
    pub fn invalid_argument(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// 错误分类
    ///
    /// 唯一约束冲突和外键失败同样归为内部错误，调用方不做特殊处理
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::BadRequest,
            Self::QuestionnaireNotFound(_)
            | Self::QuestionNotFound(_)
            | Self::RespondentNotFound(_)
            | Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) | Self::Referential(_) | Self::Database(_) | Self::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::QuestionnaireNotFound(_) => "QUESTIONNAIRE_NOT_FOUND",
            Self::QuestionNotFound(_) => "QUESTION_NOT_FOUND",
            Self::RespondentNotFound(_) => "RESPONDENT_NOT_FOUND",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::Conflict(_) => "CONFLICT",
            Self::Referential(_) => "REFERENTIAL_VIOLATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        assert_eq!(
            SurveyError::invalid_argument("page", "must be positive").kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            SurveyError::QuestionnaireNotFound(1).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SurveyError::NotFound("targeted questionnaires".to_string()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SurveyError::Conflict("duplicate title".to_string()).kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            SurveyError::Referential("respondents".to_string()).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_status_code() {
        assert_eq!(SurveyError::invalid_argument("sort", "bad").status_code(), 400);
        assert_eq!(SurveyError::QuestionNotFound(3).status_code(), 404);
        assert_eq!(
            SurveyError::Database(sqlx::Error::PoolTimedOut).status_code(),
            500
        );
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: SurveyError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, SurveyError::Database(_)));
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::{ValidationError, ValidationErrors};

        let mut errors = ValidationErrors::new();
        let mut field_error = ValidationError::new("length");
        field_error.message = Some("标题长度必须在1-50个字符之间".into());
        errors.add("title", field_error);

        let err: SurveyError = errors.into();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_error_display() {
        let err = SurveyError::invalid_argument("search", "unclosed group");
        assert!(err.to_string().contains("search"));
        assert!(err.to_string().contains("unclosed group"));

        let err = SurveyError::RespondentNotFound(42);
        assert!(err.to_string().contains("42"));
    }
}
