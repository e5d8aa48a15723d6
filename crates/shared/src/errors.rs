use crate::auth::AuthError;
use thiserror::Error;

/// アプリケーション全体で使用されるエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    // 認証エラー
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // 入力エラー（ストアへは到達しない）
    #[error("Validation failed: {0}")]
    Validation(String),

    // ストアエラー（リトライしない）
    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// エラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// クライアントエラー（4xx相当）
    Client,
    /// サーバーエラー（5xx相当）
    Server,
}

impl AppError {
    /// レスポンスの `extensions.code` に載せるエラーコード
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Store(_) => "STORE_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Unauthorized(_) | AppError::Validation(_) => ErrorCategory::Client,
            AppError::Store(_) | AppError::Configuration(_) => ErrorCategory::Server,
        }
    }

    /// 呼び出し元に返すメッセージ
    /// サーバー側の詳細は含めない
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized(_) => "Unauthorized".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Store(_) => "Store operation failed".to_string(),
            AppError::Configuration(_) => "Service misconfigured".to_string(),
        }
    }
}

impl From<domain::DomainError> for AppError {
    fn from(e: domain::DomainError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Unauthorized(e.to_string())
    }
}
