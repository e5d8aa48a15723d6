//! graphql-api バイナリのエントリポイント

use graphql_api::{app, AppState};
use infrastructure::{DynamoDbClient, DynamoTodoRepository, InMemoryTodoStore, TodoStore};
use shared::{init_tracing, Config, StoreBackend};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env は任意
    dotenvy::dotenv().ok();

    init_tracing().map_err(|e| anyhow::anyhow!("トレーシング初期化に失敗: {e}"))?;

    let config = Config::from_env()?;

    // ストアはプロセス起動時に一度だけ構築する
    let store: Arc<dyn TodoStore> = match config.store_backend {
        StoreBackend::DynamoDb => {
            let db = DynamoDbClient::new(&config).await;
            info!(table = %config.dynamodb_table, "DynamoDB ストアを使用");
            Arc::new(DynamoTodoRepository::new(db))
        }
        StoreBackend::Memory => {
            warn!("インメモリストアを使用（再起動でデータは消えます）");
            Arc::new(InMemoryTodoStore::new())
        }
    };

    let state = AppState::from_config(store, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = %config.environment, graphiql = config.graphiql_enabled, "server starting");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
