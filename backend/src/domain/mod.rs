//! Domain entities, services, and ports.
//!
//! Everything here is transport and storage agnostic: entities validate
//! their own invariants, services implement the use-case driving ports in
//! `ports`, and adapters plug in behind the driven ports.

pub mod analytics;
pub mod article;
mod article_service;
mod account_service;
pub mod auth;
pub mod device;
pub mod error;
mod identity;
pub mod page_view;
mod page_view_service;
pub mod ports;
#[cfg(test)]
pub(crate) mod test_support;
pub mod user;
mod user_service;

pub use self::account_service::AccountService;
pub use self::article_service::ArticleService;
pub use self::error::{Error, ErrorCode};
pub use self::identity::IdentityResolver;
pub use self::page_view_service::PageViewService;
pub use self::user_service::UserService;
