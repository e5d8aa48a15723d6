use crate::models::{item_to_todo, items_to_todos, todo_to_item, DynamoDbKeys, TODO_SK_PREFIX};
use crate::store::{StoreError, TodoStore};
use crate::DynamoDbClient;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use domain::{NewTodo, Todo, TodoId, UserId};
use tracing::{debug, info};

/// DynamoDB 上の ToDo コレクション
///
/// パーティションキーに所有者を含めるため、所有者以外のドキュメントには
/// キーの時点で到達できない。
#[derive(Clone)]
pub struct DynamoTodoRepository {
    db: DynamoDbClient,
}

impl DynamoTodoRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoStore for DynamoTodoRepository {
    async fn insert(&self, user_id: &UserId, new_todo: NewTodo) -> Result<TodoId, StoreError> {
        let todo_id = TodoId::new();
        let todo = new_todo.into_todo(todo_id.clone(), user_id.clone());

        self.db
            .client()
            .put_item()
            .table_name(self.db.table_name())
            .set_item(Some(todo_to_item(&todo)))
            .condition_expression("attribute_not_exists(PK) AND attribute_not_exists(SK)")
            .send()
            .await
            .map_err(|e| self.db.convert_error(e))?;

        info!(user_id = %user_id, todo_id = %todo_id, "ToDo を保存しました");
        Ok(todo_id)
    }

    async fn find(&self, user_id: &UserId, todo_id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let keys = DynamoDbKeys::for_todo(user_id, todo_id);

        let output = self
            .db
            .client()
            .get_item()
            .table_name(self.db.table_name())
            .key("PK", AttributeValue::S(keys.pk))
            .key("SK", AttributeValue::S(keys.sk))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| self.db.convert_error(e))?;

        output.item().map(item_to_todo).transpose()
    }

    async fn list(&self, user_id: &UserId) -> Result<Vec<Todo>, StoreError> {
        let pk = DynamoDbKeys::user_partition(user_id);
        let mut todos = Vec::new();
        let mut start_key = None;

        // 1MB 単位のページをすべて読み切る
        loop {
            let output = self
                .db
                .client()
                .query()
                .table_name(self.db.table_name())
                .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
                .expression_attribute_values(":pk", AttributeValue::S(pk.clone()))
                .expression_attribute_values(
                    ":sk_prefix",
                    AttributeValue::S(TODO_SK_PREFIX.to_string()),
                )
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| self.db.convert_error(e))?;

            todos.extend(items_to_todos(output.items())?);

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!(user_id = %user_id, count = todos.len(), "ToDo 一覧取得完了");
        Ok(todos)
    }

    async fn delete(&self, user_id: &UserId, todo_id: &TodoId) -> Result<bool, StoreError> {
        let keys = DynamoDbKeys::for_todo(user_id, todo_id);

        let output = self
            .db
            .client()
            .delete_item()
            .table_name(self.db.table_name())
            .key("PK", AttributeValue::S(keys.pk))
            .key("SK", AttributeValue::S(keys.sk))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| self.db.convert_error(e))?;

        Ok(output.attributes().is_some_and(|attrs| !attrs.is_empty()))
    }
}
