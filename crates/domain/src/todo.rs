use crate::errors::DomainError;
use crate::user::UserId;
use serde::{Deserialize, Serialize};

/// ToDo の識別子（ULID 形式）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// ストアが採番する新しい ID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// 外部入力をパースする。ULID として解釈できないものは拒否
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        ulid::Ulid::from_string(id)
            .map(|ulid| Self(ulid.to_string()))
            .map_err(|_| DomainError::InvalidTodoId(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 保存済みの ToDo ドキュメント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub time: String,
    pub image: Option<String>,
}

/// 作成リクエストの入力値
///
/// `time` は書式を検証しない。`image` は任意。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub time: String,
    pub image: Option<String>,
}

impl NewTodo {
    pub fn new(
        title: String,
        description: String,
        time: String,
        image: Option<String>,
    ) -> Result<Self, DomainError> {
        require_non_empty("title", &title)?;
        require_non_empty("description", &description)?;
        require_non_empty("time", &time)?;

        Ok(Self {
            title,
            description,
            time,
            image,
        })
    }

    /// 所有者と採番済み ID を付与してドキュメントにする
    pub fn into_todo(self, id: TodoId, user_id: UserId) -> Todo {
        Todo {
            id,
            user_id,
            title: self.title,
            description: self.description,
            time: self.time,
            image: self.image,
        }
    }
}

/// 空文字列のみ拒否し、中身は解釈しない
fn require_non_empty(field: &str, value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// 削除の結果
///
/// 存在しない ID と他ユーザーの ID は区別しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Deleted,
    NotFoundOrUnauthorized,
}

impl RemoveOutcome {
    pub fn from_deleted(deleted: bool) -> Self {
        if deleted {
            RemoveOutcome::Deleted
        } else {
            RemoveOutcome::NotFoundOrUnauthorized
        }
    }

    /// メッセージには呼び出し元が送った ID をそのまま載せる
    pub fn status_message(&self, requested_id: &str) -> String {
        match self {
            RemoveOutcome::Deleted => format!("Todo {requested_id} successfully deleted."),
            RemoveOutcome::NotFoundOrUnauthorized => {
                format!("Todo {requested_id} not found or unauthorized.")
            }
        }
    }
}
