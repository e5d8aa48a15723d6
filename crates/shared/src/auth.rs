use chrono::{Duration, Utc};
use domain::UserId;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BEARER_PREFIX: &str = "Bearer ";
const ACCESS_TOKEN_TYPE: &str = "access";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// `access` / `refresh`。無いトークンはアクセストークン扱い
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// 資格情報の検証失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing bearer credential")]
    MissingCredential,

    #[error("malformed authorization header")]
    MalformedHeader,

    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("access token required, got {0}")]
    WrongTokenType(String),
}

/// HS256 で署名された JWT を検証する
#[derive(Clone)]
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Authorization ヘッダーの値からユーザーIDを取り出す
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<UserId, AuthError> {
        let header = authorization.ok_or(AuthError::MissingCredential)?;
        let token = extract_bearer(header)?;
        let claims = self.validate_token(token)?;

        UserId::from_string(claims.sub).map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let claims = data.claims;
        match claims.token_type.as_deref() {
            None | Some(ACCESS_TOKEN_TYPE) => Ok(claims),
            Some(other) => Err(AuthError::WrongTokenType(other.to_string())),
        }
    }
}

/// `Bearer <token>` から token 部分を取り出す
pub fn extract_bearer(header: &str) -> Result<&str, AuthError> {
    let token = header
        .trim()
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

/// ローカル開発・テスト用のアクセストークンを発行
pub fn issue_token(secret: &str, sub: &str, ttl: Duration) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: sub.to_string(),
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
        jti: Some(uuid::Uuid::new_v4().to_string()),
        token_type: Some(ACCESS_TOKEN_TYPE.to_string()),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::InvalidToken(e.to_string()))
}
