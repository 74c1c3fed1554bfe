//! Domain ports and supporting types for the hexagonal boundary.

mod article_repository;
mod articles;
mod page_view_repository;
mod page_views;
mod password_hasher;
mod revocation_set;
mod token_issuer;
mod user_repository;
mod users;

pub use article_repository::{
    ArticleChangesRecord, ArticleListQuery, ArticleRepository, ArticleRepositoryError,
    NewArticleRecord,
};
pub use articles::{
    ArticleChanges, ArticleCommand, ArticleDraft, ArticleListRequest, ArticleSummary,
    ArticleView, ArticlesQuery, AuthorDisplay,
};
pub use page_view_repository::{
    NewPageViewRecord, PageViewRepository, PageViewRepositoryError, ViewFilter,
};
pub use page_views::{ClientInfo, PageViewCommand, PageViewQuery, ViewCount, ViewWindow};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use revocation_set::{RevocationSet, RevocationSetError};
pub use token_issuer::{TokenIssuer, TokenIssuerError};
pub use user_repository::{
    NewUserRecord, UserProfileChanges, UserRepository, UserRepositoryError,
};
pub use users::{
    AuthService, AuthenticatedAccount, ProfileChanges, Registration, UserCommand, UsersQuery,
};
