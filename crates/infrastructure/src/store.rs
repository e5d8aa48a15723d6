use async_trait::async_trait;
use domain::{NewTodo, Todo, TodoId, UserId};
use shared::AppError;
use thiserror::Error;

/// ストア層のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("DynamoDB error: {0}")]
    Sdk(String),

    #[error("corrupt item: {0}")]
    CorruptItem(String),

    #[error("todo {0} missing after insert")]
    MissingAfterInsert(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e.to_string())
    }
}

/// ToDo ドキュメントのコレクション
///
/// すべての操作は所有者の `UserId` でスコープされる。
/// 1 操作は 1 ドキュメントに対して原子的で、複数ドキュメントにまたがる保証はない。
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// 新しいドキュメントを追加し、採番した ID を返す
    async fn insert(&self, user_id: &UserId, new_todo: NewTodo) -> Result<TodoId, StoreError>;

    async fn find(&self, user_id: &UserId, todo_id: &TodoId) -> Result<Option<Todo>, StoreError>;

    /// 所有者の全ドキュメント（ストア本来の順序）
    async fn list(&self, user_id: &UserId) -> Result<Vec<Todo>, StoreError>;

    /// `todo_id` と `user_id` の両方が一致した場合のみ削除し、削除したかを返す
    async fn delete(&self, user_id: &UserId, todo_id: &TodoId) -> Result<bool, StoreError>;
}
