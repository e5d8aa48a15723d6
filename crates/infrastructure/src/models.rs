use crate::store::StoreError;
use aws_sdk_dynamodb::types::AttributeValue;
use domain::{Todo, TodoId, UserId};
use std::collections::HashMap;

pub const ENTITY_TYPE_TODO: &str = "Todo";
pub const TODO_SK_PREFIX: &str = "TODO#";

/// DynamoDB のキー構造
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbKeys {
    pub pk: String, // パーティションキー
    pub sk: String, // ソートキー
}

impl DynamoDbKeys {
    /// ユーザーのパーティションキー
    pub fn user_partition(user_id: &UserId) -> String {
        format!("USER#{}", user_id.as_str())
    }

    pub fn for_todo(user_id: &UserId, todo_id: &TodoId) -> Self {
        Self {
            pk: Self::user_partition(user_id),
            sk: format!("{}{}", TODO_SK_PREFIX, todo_id.as_str()),
        }
    }
}

/// ToDo を DynamoDB アイテムへ変換
/// `image` が無い場合は属性ごと省略する
pub fn todo_to_item(todo: &Todo) -> HashMap<String, AttributeValue> {
    let keys = DynamoDbKeys::for_todo(&todo.user_id, &todo.id);

    let mut item = HashMap::new();
    item.insert("PK".to_string(), AttributeValue::S(keys.pk));
    item.insert("SK".to_string(), AttributeValue::S(keys.sk));
    item.insert(
        "EntityType".to_string(),
        AttributeValue::S(ENTITY_TYPE_TODO.to_string()),
    );
    item.insert("Id".to_string(), AttributeValue::S(todo.id.as_str().to_string()));
    item.insert(
        "UserId".to_string(),
        AttributeValue::S(todo.user_id.as_str().to_string()),
    );
    item.insert("Title".to_string(), AttributeValue::S(todo.title.clone()));
    item.insert(
        "Description".to_string(),
        AttributeValue::S(todo.description.clone()),
    );
    item.insert("Time".to_string(), AttributeValue::S(todo.time.clone()));
    if let Some(image) = &todo.image {
        item.insert("Image".to_string(), AttributeValue::S(image.clone()));
    }
    item
}

/// DynamoDB アイテムから ToDo を復元
pub fn item_to_todo(item: &HashMap<String, AttributeValue>) -> Result<Todo, StoreError> {
    let id = TodoId::parse(&required_s(item, "Id")?)
        .map_err(|e| StoreError::CorruptItem(e.to_string()))?;
    let user_id = UserId::from_string(required_s(item, "UserId")?)
        .map_err(|e| StoreError::CorruptItem(e.to_string()))?;

    Ok(Todo {
        id,
        user_id,
        title: required_s(item, "Title")?,
        description: required_s(item, "Description")?,
        time: required_s(item, "Time")?,
        image: optional_s(item, "Image"),
    })
}

/// クエリ 1 ページ分のアイテムを復元する。1 件でも壊れていればエラー
pub fn items_to_todos(items: &[HashMap<String, AttributeValue>]) -> Result<Vec<Todo>, StoreError> {
    items.iter().map(item_to_todo).collect()
}

fn required_s(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String, StoreError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| StoreError::CorruptItem(format!("missing string attribute {name}")))
}

fn optional_s(item: &HashMap<String, AttributeValue>, name: &str) -> Option<String> {
    match item.get(name) {
        Some(AttributeValue::S(s)) => Some(s.clone()),
        _ => None,
    }
}
