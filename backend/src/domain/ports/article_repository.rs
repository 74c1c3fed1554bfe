//! Driven port for article persistence.
//!
//! Listing takes the status predicate computed by
//! [`crate::domain::article::ListSelection::resolve`]; the adapter only
//! translates it into SQL and never re-derives visibility rules.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::article::{Article, ArticleStatus, Content, StatusPredicate, Title};
use crate::domain::user::UserId;

/// Persistence failures surfaced by [`ArticleRepository`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArticleRepositoryError {
    /// The store could not be reached or a connection could not be checked out.
    #[error("article store unavailable: {message}")]
    Connection { message: String },

    /// A query failed after a connection was established.
    #[error("article store query failed: {message}")]
    Query { message: String },

    /// The write collided with the per-author title index.
    #[error("an article with this title already exists for this author")]
    DuplicateTitle,
}

impl ArticleRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Validated fields for a new article row.
#[derive(Debug, Clone)]
pub struct NewArticleRecord {
    pub id: Uuid,
    pub title: Title,
    pub content: Content,
    pub status: ArticleStatus,
    pub author: UserId,
}

/// Replacement fields applied by an article update.
///
/// Title and content are always replaced (the update payload requires both);
/// `status` is only replaced when supplied.
#[derive(Debug, Clone)]
pub struct ArticleChangesRecord {
    pub title: Title,
    pub content: Content,
    pub status: Option<ArticleStatus>,
}

/// Listing window over the filtered, creation-descending article set.
#[derive(Debug, Clone)]
pub struct ArticleListQuery {
    pub predicate: StatusPredicate,
    pub author: Option<UserId>,
    pub offset: i64,
    pub limit: i64,
}

/// Driven port owning article rows.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert a new article and return the stored row.
    async fn insert(&self, record: NewArticleRecord) -> Result<Article, ArticleRepositoryError>;

    /// Fetch by id including soft-deleted rows (mutation target lookups).
    async fn find_any_by_id(&self, id: Uuid) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Fetch by id excluding soft-deleted rows (read paths).
    async fn find_visible_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Whether a non-deleted article with this title already exists for the
    /// author, ignoring `exclude` (the row being updated).
    async fn title_exists_for_author(
        &self,
        author: &UserId,
        title: &Title,
        exclude: Option<Uuid>,
    ) -> Result<bool, ArticleRepositoryError>;

    /// Count non-deleted rows matching the predicate and author filter.
    async fn count(
        &self,
        predicate: &StatusPredicate,
        author: Option<&UserId>,
    ) -> Result<u64, ArticleRepositoryError>;

    /// Load one page of non-deleted rows, newest first.
    async fn list(&self, query: ArticleListQuery) -> Result<Vec<Article>, ArticleRepositoryError>;

    /// Apply changes; `None` when the article does not exist.
    async fn update(
        &self,
        id: Uuid,
        changes: ArticleChangesRecord,
    ) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Soft-delete: set the flag, stamp `deleted_at`, force status to
    /// `deleted`. Returns `false` when the article does not exist.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, ArticleRepositoryError>;
}
