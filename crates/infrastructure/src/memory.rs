use crate::store::{StoreError, TodoStore};
use async_trait::async_trait;
use domain::{NewTodo, Todo, TodoId, UserId};
use std::sync::{Mutex, MutexGuard};

/// プロセス内の ToDo コレクション（開発/テスト用）
///
/// 挿入順を保持する。
#[derive(Default)]
pub struct InMemoryTodoStore {
    todos: Mutex<Vec<Todo>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全ユーザー合計のドキュメント数
    pub fn document_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Todo>>, StoreError> {
        self.todos.lock().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn insert(&self, user_id: &UserId, new_todo: NewTodo) -> Result<TodoId, StoreError> {
        let todo_id = TodoId::new();
        let todo = new_todo.into_todo(todo_id.clone(), user_id.clone());
        self.lock()?.push(todo);
        Ok(todo_id)
    }

    async fn find(&self, user_id: &UserId, todo_id: &TodoId) -> Result<Option<Todo>, StoreError> {
        Ok(self
            .lock()?
            .iter()
            .find(|todo| &todo.id == todo_id && &todo.user_id == user_id)
            .cloned())
    }

    async fn list(&self, user_id: &UserId) -> Result<Vec<Todo>, StoreError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|todo| &todo.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, user_id: &UserId, todo_id: &TodoId) -> Result<bool, StoreError> {
        let mut todos = self.lock()?;
        let before = todos.len();
        todos.retain(|todo| !(&todo.id == todo_id && &todo.user_id == user_id));
        Ok(todos.len() < before)
    }
}
