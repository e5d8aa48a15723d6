use crate::errors::AppError;
use std::env;

/// ToDo ドキュメントの保存先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    /// 開発用のプロセス内ストア（再起動で消える）
    Memory,
}

impl StoreBackend {
    pub fn from_string(value: &str) -> Result<Self, AppError> {
        match value.to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(StoreBackend::DynamoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::Configuration(format!(
                "unknown STORE_BACKEND: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub dynamodb_table: String,
    pub dynamodb_endpoint: Option<String>,
    pub aws_region: String,
    pub environment: String,
    pub store_backend: StoreBackend,
    pub jwt_secret: String,
    pub cors_allowed_origin: String,
    pub graphiql_enabled: bool,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を組み立てる
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let jwt_secret = lookup("JWT_SECRET_KEY")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Configuration("JWT_SECRET_KEY is not set".to_string()))?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string());

        let store_backend = match lookup("STORE_BACKEND") {
            Some(value) => StoreBackend::from_string(&value)?,
            None => StoreBackend::DynamoDb,
        };

        let graphiql_enabled = match lookup("GRAPHIQL_ENABLED") {
            Some(value) => parse_bool("GRAPHIQL_ENABLED", &value)?,
            None => environment != "prod",
        };

        let port = match lookup("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| AppError::Configuration(format!("invalid PORT: {value}")))?,
            None => 3000,
        };

        Ok(Config {
            dynamodb_table: lookup("DYNAMODB_TABLE").unwrap_or_else(|| "todo-app".to_string()),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|s| !s.is_empty()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "ap-northeast-1".to_string()),
            environment,
            store_backend,
            jwt_secret,
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN").unwrap_or_else(|| "*".to_string()),
            graphiql_enabled,
            port,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AppError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(AppError::Configuration(format!("invalid {key}: {value}"))),
    }
}
