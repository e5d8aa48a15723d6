use async_graphql::ErrorExtensions;
use shared::{AppError, ErrorCategory};
use tracing::{error, warn};

const CODE: &str = "code";

/// `AppError` を GraphQL エラーへ変換
///
/// `extensions.code` にエラーコードを載せる。サーバー側の詳細はログにのみ残す。
pub fn graphql_error(err: AppError) -> async_graphql::Error {
    log_error(&err);

    let code = err.code().to_string();
    async_graphql::Error::new(err.user_message()).extend_with(|_, e| e.set(CODE, code))
}

/// リゾルバ到達前に弾かれたエラー（構文・型・必須引数の欠落）に入力エラーのコードを付ける
///
/// リゾルバ由来のエラーは既にコードを持つので触らない。
pub fn tag_request_errors(mut response: async_graphql::Response) -> async_graphql::Response {
    for server_error in &mut response.errors {
        let extensions = server_error.extensions.get_or_insert_with(Default::default);
        if extensions.get(CODE).is_none() {
            let err = AppError::Validation(server_error.message.clone());
            log_error(&err);
            extensions.set(CODE, err.code().to_string());
        }
    }
    response
}

fn log_error(err: &AppError) {
    match err.category() {
        ErrorCategory::Server => error!(code = err.code(), error = %err, "リクエスト処理に失敗"),
        ErrorCategory::Client => warn!(code = err.code(), error = %err, "リクエストを拒否"),
    }
}
