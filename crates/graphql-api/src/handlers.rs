use domain::{NewTodo, RemoveOutcome, Todo, TodoId, UserId};
use infrastructure::{StoreError, TodoStore};
use shared::AppError;
use tracing::info;

pub async fn list_todos(store: &dyn TodoStore, user_id: &UserId) -> Result<Vec<Todo>, AppError> {
    let todos = store.list(user_id).await?;
    info!(user_id = %user_id, count = todos.len(), "ToDo 一覧を返却");
    Ok(todos)
}

/// 挿入後、採番された ID で読み直して返す
pub async fn add_todo(
    store: &dyn TodoStore,
    user_id: &UserId,
    new_todo: NewTodo,
) -> Result<Todo, AppError> {
    let todo_id = store.insert(user_id, new_todo).await?;

    let created = store
        .find(user_id, &todo_id)
        .await?
        .ok_or_else(|| StoreError::MissingAfterInsert(todo_id.to_string()))?;

    info!(user_id = %user_id, todo_id = %todo_id, "ToDo を作成");
    Ok(created)
}

/// 不正な ID はストアに触れる前に弾く。
/// 未存在と他人の ToDo は同じメッセージで返す。メッセージの ID は入力のまま。
pub async fn remove_todo(
    store: &dyn TodoStore,
    user_id: &UserId,
    raw_todo_id: &str,
) -> Result<String, AppError> {
    let todo_id = TodoId::parse(raw_todo_id)?;
    let deleted = store.delete(user_id, &todo_id).await?;

    info!(user_id = %user_id, todo_id = %todo_id, deleted, "ToDo 削除要求を処理");
    Ok(RemoveOutcome::from_deleted(deleted).status_message(raw_todo_id))
}
