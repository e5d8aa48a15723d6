use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use domain::UserId;
use shared::AuthError;
use tracing::{debug, warn};

/// リクエスト単位で一度だけ解決した呼び出し元
#[derive(Debug, Clone)]
pub enum RequestIdentity {
    User(UserId),
    Rejected(AuthError),
}

/// Authorization ヘッダーを検証し、結果をリクエスト拡張に積む
///
/// ここでは拒否しない。ToDo フィールドのガードが `Rejected` を弾く。
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match request.headers().get(AUTHORIZATION) {
        None => RequestIdentity::Rejected(AuthError::MissingCredential),
        Some(value) => match value.to_str() {
            Ok(raw) => match state.validator.authenticate(Some(raw)) {
                Ok(user_id) => RequestIdentity::User(user_id),
                Err(e) => RequestIdentity::Rejected(e),
            },
            Err(_) => RequestIdentity::Rejected(AuthError::MalformedHeader),
        },
    };

    match &identity {
        RequestIdentity::User(user_id) => debug!(user_id = %user_id, "認証成功"),
        RequestIdentity::Rejected(AuthError::MissingCredential) => {
            debug!("資格情報なしのリクエスト")
        }
        RequestIdentity::Rejected(e) => warn!(error = %e, "JWT トークン検証失敗"),
    }

    request.extensions_mut().insert(identity);
    next.run(request).await
}
