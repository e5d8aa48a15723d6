//! GraphQL スキーマ
//!
//! 出力型はドメインの `Todo` を包み、公開するフィールドを明示的に列挙する。
//! `user_id` はスキーマに現れない。

use crate::error::graphql_error;
use crate::handlers;
use crate::identity::RequestIdentity;
use async_graphql::{
    Context, EmptySubscription, Guard, InputObject, Object, Result, Schema, SimpleObject, ID,
};
use domain::{NewTodo, Todo, UserId};
use infrastructure::TodoStore;
use shared::{AppError, AuthError};
use std::sync::Arc;

pub type TodoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// ストアはスキーマデータとして注入する
pub fn build_schema(store: Arc<dyn TodoStore>) -> TodoSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .finish()
}

/// 認証済みの呼び出し元を要求するガード
pub struct AuthGuard;

impl Guard for AuthGuard {
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        current_user(ctx).map(|_| ())
    }
}

fn current_user<'a>(ctx: &Context<'a>) -> Result<&'a UserId> {
    match ctx.data_opt::<RequestIdentity>() {
        Some(RequestIdentity::User(user_id)) => Ok(user_id),
        Some(RequestIdentity::Rejected(e)) => Err(graphql_error(e.clone().into())),
        None => Err(graphql_error(AuthError::MissingCredential.into())),
    }
}

fn store<'a>(ctx: &Context<'a>) -> Result<&'a Arc<dyn TodoStore>> {
    ctx.data::<Arc<dyn TodoStore>>()
}

pub struct TodoItem(Todo);

#[Object]
impl TodoItem {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    async fn time(&self) -> &str {
        &self.0.time
    }

    async fn image(&self) -> Option<&str> {
        self.0.image.as_deref()
    }
}

#[derive(InputObject)]
pub struct TodoInputData {
    pub title: String,
    pub description: String,
    pub time: String,
    pub image: Option<String>,
}

impl TryFrom<TodoInputData> for NewTodo {
    type Error = AppError;

    fn try_from(input: TodoInputData) -> std::result::Result<Self, Self::Error> {
        NewTodo::new(input.title, input.description, input.time, input.image).map_err(Into::into)
    }
}

#[derive(SimpleObject)]
pub struct AddTodoPayload {
    pub todo: TodoItem,
}

#[derive(SimpleObject)]
pub struct RemoveTodoPayload {
    pub status_message: String,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Retrieve all To-Dos
    #[graphql(guard = "AuthGuard")]
    async fn list_todos(&self, ctx: &Context<'_>) -> Result<Vec<TodoItem>> {
        let user_id = current_user(ctx)?;
        let todos = handlers::list_todos(store(ctx)?.as_ref(), user_id)
            .await
            .map_err(graphql_error)?;

        Ok(todos.into_iter().map(TodoItem).collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a To-Do owned by the caller
    #[graphql(guard = "AuthGuard")]
    async fn add_todo(
        &self,
        ctx: &Context<'_>,
        input_data: TodoInputData,
    ) -> Result<AddTodoPayload> {
        let user_id = current_user(ctx)?;
        let new_todo = NewTodo::try_from(input_data).map_err(graphql_error)?;
        let todo = handlers::add_todo(store(ctx)?.as_ref(), user_id, new_todo)
            .await
            .map_err(graphql_error)?;

        Ok(AddTodoPayload {
            todo: TodoItem(todo),
        })
    }

    /// Delete a To-Do owned by the caller
    #[graphql(guard = "AuthGuard")]
    async fn remove_todo(&self, ctx: &Context<'_>, todo_id: ID) -> Result<RemoveTodoPayload> {
        let user_id = current_user(ctx)?;
        let status_message = handlers::remove_todo(store(ctx)?.as_ref(), user_id, &todo_id)
            .await
            .map_err(graphql_error)?;

        Ok(RemoveTodoPayload { status_message })
    }
}
