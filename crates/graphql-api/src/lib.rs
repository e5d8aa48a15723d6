//! GraphQL API（axum）
//!
//! `/graphql` に単一のスキーマを公開する。ToDo の読み書きはすべて
//! Bearer トークンから解決したユーザーにスコープされる。

pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod schema;

use async_graphql::http::GraphiQLSource;
use axum::{
    extract::State,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use identity::RequestIdentity;
use infrastructure::TodoStore;
use schema::{build_schema, TodoSchema};
use serde::Serialize;
use shared::{Config, JwtValidator};
use std::sync::Arc;

const GRAPHQL_PATH: &str = "/graphql";

/// HTTP 層の設定
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub cors_allowed_origin: String,
    pub graphiql_enabled: bool,
}

impl From<&Config> for ApiSettings {
    fn from(config: &Config) -> Self {
        Self {
            cors_allowed_origin: config.cors_allowed_origin.clone(),
            graphiql_enabled: config.graphiql_enabled,
        }
    }
}

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    schema: TodoSchema,
    validator: Arc<JwtValidator>,
    settings: Arc<ApiSettings>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, validator: JwtValidator, settings: ApiSettings) -> Self {
        Self {
            schema: build_schema(store),
            validator: Arc::new(validator),
            settings: Arc::new(settings),
        }
    }

    pub fn from_config(store: Arc<dyn TodoStore>, config: &Config) -> Self {
        Self::new(
            store,
            JwtValidator::new(&config.jwt_secret),
            ApiSettings::from(config),
        )
    }
}

/// ルータを構築して返します。
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(GRAPHQL_PATH, get(graphiql).post(graphql_handler))
        .layer(from_fn_with_state(state.clone(), identity::resolve_identity))
        .layer(from_fn_with_state(state.clone(), middleware::cors))
        .layer(from_fn(middleware::trace_request))
        .with_state(state)
}

async fn graphql_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let response = state.schema.execute(request.data(identity)).await;
    Json(error::tag_request_errors(response))
}

/// 開発用の GraphiQL
async fn graphiql(State(state): State<AppState>) -> Response {
    if !state.settings.graphiql_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish()).into_response()
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthBody { status: "ok" }))
}
