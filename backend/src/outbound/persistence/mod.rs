//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Thin adapters only: repositories translate between Diesel row models and
//! validated domain types, and every database error is mapped to the
//! owning port's error type. Row structs and schema definitions stay
//! internal to this module.

mod diesel_article_repository;
mod diesel_error;
mod diesel_page_view_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_article_repository::DieselArticleRepository;
pub use diesel_page_view_repository::DieselPageViewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
