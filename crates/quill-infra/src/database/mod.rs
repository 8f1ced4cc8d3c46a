//! SeaORM persistence for posts, categories, tags, translations and media.

mod category_repo;
mod connections;
pub mod entity;
mod loaders;
mod post_query;
mod post_repo;
mod postgres_base;
mod scopes;
mod writes;

pub use category_repo::PostgresCategoryRepository;
pub use connections::{DatabaseConfig, connect};
pub use post_repo::PostgresPostRepository;
pub use postgres_base::PostgresBaseRepository;
