use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use domain::{NewTodo, Todo, TodoId, UserId};
use graphql_api::{app, ApiSettings, AppState};
use infrastructure::{InMemoryTodoStore, StoreError, TodoStore};
use serde_json::{json, Value};
use shared::{issue_token, JwtValidator};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

const SECRET: &str = "integration-secret";

const LIST_TODOS: &str = "{ listTodos { id title description time image } }";
const ADD_TODO: &str = r#"mutation Add($input: TodoInputData!) {
    addTodo(inputData: $input) { todo { id title description time image } }
}"#;
const REMOVE_TODO: &str = r#"mutation Remove($id: ID!) {
    removeTodo(todoId: $id) { statusMessage }
}"#;

fn test_app(store: Arc<dyn TodoStore>) -> Router {
    let state = AppState::new(
        store,
        JwtValidator::new(SECRET),
        ApiSettings {
            cors_allowed_origin: "*".to_string(),
            graphiql_enabled: false,
        },
    );
    app(state)
}

fn bearer(user: &str) -> String {
    let token = issue_token(SECRET, user, chrono::Duration::minutes(5)).unwrap();
    format!("Bearer {token}")
}

async fn post_graphql(
    app: &Router,
    authorization: Option<&str>,
    query: &str,
    variables: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header("content-type", "application/json");
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    let payload = json!({ "query": query, "variables": variables });
    let request = builder.body(Body::from(payload.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn milk() -> Value {
    json!({
        "input": {
            "title": "Buy milk",
            "description": "2%",
            "time": "2024-01-01T10:00"
        }
    })
}

fn error_code(response: &Value) -> &str {
    response["errors"][0]["extensions"]["code"]
        .as_str()
        .unwrap_or_default()
}

#[tokio::test]
async fn add_then_list_round_trip() {
    let app = test_app(Arc::new(InMemoryTodoStore::new()));
    let alice = bearer("alice");

    let (status, added) = post_graphql(&app, Some(alice.as_str()), ADD_TODO, milk()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(added.get("errors").is_none(), "{added}");
    let todo = &added["data"]["addTodo"]["todo"];
    let id = todo["id"].as_str().unwrap();
    assert!(!id.is_empty());

    let (_, listed) = post_graphql(&app, Some(alice.as_str()), LIST_TODOS, json!({})).await;
    assert_eq!(
        listed["data"]["listTodos"],
        json!([{
            "id": id,
            "title": "Buy milk",
            "description": "2%",
            "time": "2024-01-01T10:00",
            "image": null
        }])
    );
}

#[tokio::test]
async fn todos_are_isolated_between_users() {
    let app = test_app(Arc::new(InMemoryTodoStore::new()));
    let alice = bearer("alice");
    let bob = bearer("bob");

    post_graphql(&app, Some(alice.as_str()), ADD_TODO, milk()).await;

    let (_, for_bob) = post_graphql(&app, Some(bob.as_str()), LIST_TODOS, json!({})).await;
    assert_eq!(for_bob["data"]["listTodos"], json!([]));

    let (_, for_alice) = post_graphql(&app, Some(alice.as_str()), LIST_TODOS, json!({})).await;
    assert_eq!(for_alice["data"]["listTodos"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn remove_twice_gives_same_shaped_success() {
    let store = Arc::new(InMemoryTodoStore::new());
    let app = test_app(store.clone());
    let alice = bearer("alice");

    let (_, added) = post_graphql(&app, Some(alice.as_str()), ADD_TODO, milk()).await;
    let id = added["data"]["addTodo"]["todo"]["id"].as_str().unwrap().to_string();

    let (_, first) = post_graphql(&app, Some(alice.as_str()), REMOVE_TODO, json!({ "id": id.as_str() })).await;
    let (_, second) = post_graphql(&app, Some(alice.as_str()), REMOVE_TODO, json!({ "id": id.as_str() })).await;

    assert!(first.get("errors").is_none());
    assert!(second.get("errors").is_none());
    assert_eq!(
        first["data"]["removeTodo"]["statusMessage"],
        format!("Todo {id} successfully deleted.")
    );
    assert_eq!(
        second["data"]["removeTodo"]["statusMessage"],
        format!("Todo {id} not found or unauthorized.")
    );
    assert_eq!(store.document_count().unwrap(), 0);
}

#[tokio::test]
async fn remove_of_foreign_todo_matches_missing_todo() {
    let store = Arc::new(InMemoryTodoStore::new());
    let app = test_app(store.clone());
    let alice = bearer("alice");
    let mallory = bearer("mallory");

    let (_, added) = post_graphql(&app, Some(alice.as_str()), ADD_TODO, milk()).await;
    let owned_by_alice = added["data"]["addTodo"]["todo"]["id"].as_str().unwrap().to_string();
    let never_existed = TodoId::new().to_string();

    let (_, foreign) =
        post_graphql(&app, Some(mallory.as_str()), REMOVE_TODO, json!({ "id": owned_by_alice.as_str() })).await;
    let (_, missing) =
        post_graphql(&app, Some(mallory.as_str()), REMOVE_TODO, json!({ "id": never_existed.as_str() })).await;

    let foreign_message = foreign["data"]["removeTodo"]["statusMessage"].as_str().unwrap();
    let missing_message = missing["data"]["removeTodo"]["statusMessage"].as_str().unwrap();
    assert_eq!(
        foreign_message.replace(&owned_by_alice, "<id>"),
        missing_message.replace(&never_existed, "<id>")
    );
    assert_eq!(store.document_count().unwrap(), 1);
}

#[tokio::test]
async fn add_without_title_is_rejected_and_creates_nothing() {
    let store = Arc::new(InMemoryTodoStore::new());
    let app = test_app(store.clone());
    let alice = bearer("alice");

    let (_, response) = post_graphql(
        &app,
        Some(alice.as_str()),
        ADD_TODO,
        json!({ "input": { "description": "2%", "time": "2024-01-01T10:00" } }),
    )
    .await;

    assert_eq!(error_code(&response), "VALIDATION_ERROR");
    assert!(response["data"].is_null());
    assert_eq!(store.document_count().unwrap(), 0);

    let (_, listed) = post_graphql(&app, Some(alice.as_str()), LIST_TODOS, json!({})).await;
    assert_eq!(listed["data"]["listTodos"], json!([]));
}

#[tokio::test]
async fn add_with_empty_title_is_validation_error() {
    let store = Arc::new(InMemoryTodoStore::new());
    let app = test_app(store.clone());
    let alice = bearer("alice");

    let (_, response) = post_graphql(
        &app,
        Some(alice.as_str()),
        ADD_TODO,
        json!({ "input": { "title": "", "description": "2%", "time": "2024-01-01T10:00" } }),
    )
    .await;

    assert_eq!(error_code(&response), "VALIDATION_ERROR");
    assert_eq!(store.document_count().unwrap(), 0);
}

#[tokio::test]
async fn remove_echoes_id_as_sent() {
    let app = test_app(Arc::new(InMemoryTodoStore::new()));
    let alice = bearer("alice");

    let (_, added) = post_graphql(&app, Some(alice.as_str()), ADD_TODO, milk()).await;
    let id = added["data"]["addTodo"]["todo"]["id"].as_str().unwrap().to_lowercase();

    let (_, removed) =
        post_graphql(&app, Some(alice.as_str()), REMOVE_TODO, json!({ "id": id.as_str() })).await;

    assert_eq!(
        removed["data"]["removeTodo"]["statusMessage"],
        format!("Todo {id} successfully deleted.")
    );
}

#[tokio::test]
async fn remove_with_malformed_id_is_validation_error() {
    let app = test_app(Arc::new(InMemoryTodoStore::new()));
    let alice = bearer("alice");

    let (_, response) =
        post_graphql(&app, Some(alice.as_str()), REMOVE_TODO, json!({ "id": "not-an-id" })).await;

    assert_eq!(error_code(&response), "VALIDATION_ERROR");
    assert!(response["data"].is_null());
}

#[tokio::test]
async fn unauthenticated_list_returns_no_data() {
    let app = test_app(Arc::new(InMemoryTodoStore::new()));

    let (status, missing) = post_graphql(&app, None, LIST_TODOS, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(error_code(&missing), "UNAUTHORIZED");
    assert!(missing["data"].is_null());

    let (_, garbage) = post_graphql(&app, Some("Bearer nope"), LIST_TODOS, json!({})).await;
    assert_eq!(error_code(&garbage), "UNAUTHORIZED");
    assert!(garbage["data"].is_null());
}

#[tokio::test]
async fn token_signed_with_other_secret_is_unauthorized() {
    let store = Arc::new(InMemoryTodoStore::new());
    let app = test_app(store.clone());
    let forged = issue_token("other-secret", "alice", chrono::Duration::minutes(5)).unwrap();

    let (_, response) =
        post_graphql(&app, Some(format!("Bearer {forged}").as_str()), ADD_TODO, milk()).await;

    assert_eq!(error_code(&response), "UNAUTHORIZED");
    assert_eq!(store.document_count().unwrap(), 0);
}

/// 常に失敗するストア
struct UnavailableStore;

#[async_trait]
impl TodoStore for UnavailableStore {
    async fn insert(&self, _user_id: &UserId, _new_todo: NewTodo) -> Result<TodoId, StoreError> {
        Err(StoreError::Sdk("ServiceUnavailable".to_string()))
    }

    async fn find(&self, _user_id: &UserId, _todo_id: &TodoId) -> Result<Option<Todo>, StoreError> {
        Err(StoreError::Sdk("ServiceUnavailable".to_string()))
    }

    async fn list(&self, _user_id: &UserId) -> Result<Vec<Todo>, StoreError> {
        Err(StoreError::Sdk("ServiceUnavailable".to_string()))
    }

    async fn delete(&self, _user_id: &UserId, _todo_id: &TodoId) -> Result<bool, StoreError> {
        Err(StoreError::Sdk("ServiceUnavailable".to_string()))
    }
}

#[tokio::test]
async fn store_failure_is_generic_store_error() {
    let app = test_app(Arc::new(UnavailableStore));
    let alice = bearer("alice");

    let (_, listed) = post_graphql(&app, Some(alice.as_str()), LIST_TODOS, json!({})).await;
    assert_eq!(error_code(&listed), "STORE_ERROR");
    assert_eq!(listed["errors"][0]["message"], "Store operation failed");

    let (_, added) = post_graphql(&app, Some(alice.as_str()), ADD_TODO, milk()).await;
    assert_eq!(error_code(&added), "STORE_ERROR");

    // 不正な ID はストアより先に弾かれる
    let (_, removed) =
        post_graphql(&app, Some(alice.as_str()), REMOVE_TODO, json!({ "id": "bad" })).await;
    assert_eq!(error_code(&removed), "VALIDATION_ERROR");
}
