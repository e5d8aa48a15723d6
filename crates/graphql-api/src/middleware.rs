use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{info, Instrument};

/// リクエストごとに request_id 付きのスパンを張る
pub async fn trace_request(request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        info!("Incoming request");
        let response = next.run(request).await;
        info!(status = response.status().as_u16(), "Request completed");
        response
    }
    .instrument(span)
    .await
}

/// プリフライトには 204 を返し、全レスポンスに CORS ヘッダーを付ける
pub async fn cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    add_cors_headers(response.headers_mut(), &state.settings.cors_allowed_origin);
    response
}

fn add_cors_headers(headers: &mut HeaderMap, allowed_origin: &str) {
    if let Ok(origin) = HeaderValue::from_str(allowed_origin) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type,Authorization"),
    );
}
