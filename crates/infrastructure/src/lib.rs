pub mod dynamodb;
pub mod memory;
pub mod models;
pub mod store;
pub mod todo_repository;

pub use dynamodb::*;
pub use memory::*;
pub use models::*;
pub use store::*;
pub use todo_repository::*;
