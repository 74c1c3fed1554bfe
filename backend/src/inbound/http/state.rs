//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they depend on
//! domain ports only and stay testable without I/O.

use std::sync::Arc;

use crate::domain::IdentityResolver;
use crate::domain::ports::{
    ArticleCommand, ArticlesQuery, AuthService, PageViewCommand, PageViewQuery, UserCommand,
    UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthService>,
    pub users_query: Arc<dyn UsersQuery>,
    pub user_command: Arc<dyn UserCommand>,
    pub articles_query: Arc<dyn ArticlesQuery>,
    pub article_command: Arc<dyn ArticleCommand>,
    pub page_view_command: Arc<dyn PageViewCommand>,
    pub page_view_query: Arc<dyn PageViewQuery>,
    pub identity: Arc<IdentityResolver>,
}
