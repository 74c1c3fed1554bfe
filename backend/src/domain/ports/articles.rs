//! Driving ports for article use-cases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::article::{Article, ArticleStatus, Content, Title};
use crate::domain::error::Error;
use crate::domain::user::{User, UserId};

/// Validated payload for creating an article.
#[derive(Debug, Clone)]
pub struct ArticleDraft {
    pub title: Title,
    pub content: Content,
    /// Defaults to draft when the request carries no status.
    pub status: ArticleStatus,
}

/// Validated payload for updating an article.
#[derive(Debug, Clone)]
pub struct ArticleChanges {
    pub title: Title,
    pub content: Content,
    pub status: Option<ArticleStatus>,
}

/// Validated listing request.
#[derive(Debug, Clone)]
pub struct ArticleListRequest {
    /// `None` when the caller supplied no status filter; otherwise a
    /// non-empty set drawn from {draft, published}.
    pub statuses: Option<Vec<ArticleStatus>>,
    pub author: Option<UserId>,
    pub page: PageRequest,
}

/// Author display fields joined into list rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDisplay {
    pub name: String,
    pub username: String,
}

/// One article row as shaped for list responses: content reduced to its
/// preview and the author resolved to display fields.
#[derive(Debug, Clone)]
pub struct ArticleSummary {
    pub id: Uuid,
    pub title: String,
    pub preview: String,
    pub status: ArticleStatus,
    pub author: Option<AuthorDisplay>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A full article plus its author's resolved display name.
#[derive(Debug, Clone)]
pub struct ArticleView {
    pub article: Article,
    pub author_name: Option<String>,
}

/// Domain use-case port for reading articles.
#[async_trait]
pub trait ArticlesQuery: Send + Sync {
    /// List articles visible to `caller` under the request's filters.
    async fn list_articles(
        &self,
        caller: Option<&UserId>,
        request: ArticleListRequest,
    ) -> Result<Page<ArticleSummary>, Error>;

    /// One article by id, subject to the draft-visibility rule. Content is
    /// returned in full (no preview truncation).
    async fn get_article(&self, caller: Option<&UserId>, id: Uuid)
    -> Result<ArticleView, Error>;
}

/// Domain use-case port for article mutation.
#[async_trait]
pub trait ArticleCommand: Send + Sync {
    /// Create an article owned by `caller`.
    async fn create_article(
        &self,
        caller: &User,
        draft: ArticleDraft,
    ) -> Result<ArticleView, Error>;

    /// Update an article owned by `caller`.
    async fn update_article(
        &self,
        caller: &User,
        id: Uuid,
        changes: ArticleChanges,
    ) -> Result<ArticleView, Error>;

    /// Soft-delete an article owned by `caller`.
    async fn delete_article(&self, caller: &UserId, id: Uuid) -> Result<(), Error>;
}
