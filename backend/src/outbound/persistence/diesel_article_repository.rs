//! PostgreSQL-backed `ArticleRepository` implementation using Diesel ORM.
//!
//! The listing predicate computed by the domain is translated into a boxed
//! Diesel expression; author display fields are resolved separately by the
//! service through the user repository, keeping every query single-table.

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::article::{
    Article, ArticleParts, ArticleStatus, Content, StatusPredicate, Title,
};
use crate::domain::ports::{
    ArticleChangesRecord, ArticleListQuery, ArticleRepository, ArticleRepositoryError,
    NewArticleRecord,
};
use crate::domain::user::UserId;

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::{ArticleChangeset, ArticleRow, NewArticleRow};
use super::pool::{DbPool, PoolError};
use super::schema::articles;

/// Diesel-backed implementation of the article repository port.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ArticleRepositoryError {
    map_pool_error(error, ArticleRepositoryError::connection)
}

fn map_db(error: diesel::result::Error) -> ArticleRepositoryError {
    map_diesel_error(
        error,
        ArticleRepositoryError::query,
        ArticleRepositoryError::connection,
        || ArticleRepositoryError::DuplicateTitle,
    )
}

/// Convert a database row into a validated domain article.
fn row_to_article(row: ArticleRow) -> Result<Article, ArticleRepositoryError> {
    let ArticleRow {
        id,
        title,
        content,
        status,
        author_id,
        tags,
        created_at,
        updated_at,
        deleted,
        deleted_at,
    } = row;

    let title = Title::new(title)
        .map_err(|err| ArticleRepositoryError::query(format!("corrupt article row: {err}")))?;
    let content = Content::new(content)
        .map_err(|err| ArticleRepositoryError::query(format!("corrupt article row: {err}")))?;
    let status = status
        .parse::<ArticleStatus>()
        .map_err(|err| ArticleRepositoryError::query(format!("corrupt article row: {err}")))?;

    Ok(Article::from_parts(ArticleParts {
        id,
        title,
        content,
        status,
        author: UserId::from_uuid(author_id),
        tags,
        created_at,
        updated_at,
        deleted,
        deleted_at,
    }))
}

type BoxedPredicate =
    Box<dyn BoxableExpression<articles::table, Pg, SqlType = diesel::sql_types::Bool>>;

fn status_identifiers(statuses: &[ArticleStatus]) -> Vec<&'static str> {
    statuses.iter().map(|status| status.as_str()).collect()
}

/// Translate the domain predicate into SQL over non-deleted rows.
fn list_predicate(predicate: &StatusPredicate, author: Option<&UserId>) -> BoxedPredicate {
    let mut condition: BoxedPredicate = Box::new(articles::deleted.eq(false));
    if let Some(author_id) = author {
        condition = Box::new(condition.and(articles::author_id.eq(*author_id.as_uuid())));
    }
    match predicate {
        StatusPredicate::AnyOf(statuses) => Box::new(
            condition.and(articles::status.eq_any(status_identifiers(statuses))),
        ),
        StatusPredicate::OwnDraftsOr { author: owner, statuses } => {
            let own_drafts = articles::status
                .eq(ArticleStatus::Draft.as_str())
                .and(articles::author_id.eq(*owner.as_uuid()));
            if statuses.is_empty() {
                Box::new(condition.and(own_drafts))
            } else {
                Box::new(condition.and(
                    own_drafts.or(articles::status.eq_any(status_identifiers(statuses))),
                ))
            }
        }
    }
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn insert(&self, record: NewArticleRecord) -> Result<Article, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewArticleRow {
            id: record.id,
            title: record.title.as_ref(),
            content: record.content.as_ref(),
            status: record.status.as_str(),
            author_id: *record.author.as_uuid(),
        };

        let row = diesel::insert_into(articles::table)
            .values(&new_row)
            .returning(ArticleRow::as_returning())
            .get_result::<ArticleRow>(&mut conn)
            .await
            .map_err(map_db)?;

        row_to_article(row)
    }

    async fn find_any_by_id(&self, id: Uuid) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = articles::table
            .find(id)
            .select(ArticleRow::as_select())
            .first::<ArticleRow>(&mut conn)
            .await
            .optional()
            .map_err(map_db)?;

        row.map(row_to_article).transpose()
    }

    async fn find_visible_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = articles::table
            .filter(articles::id.eq(id))
            .filter(articles::deleted.eq(false))
            .select(ArticleRow::as_select())
            .first::<ArticleRow>(&mut conn)
            .await
            .optional()
            .map_err(map_db)?;

        row.map(row_to_article).transpose()
    }

    async fn title_exists_for_author(
        &self,
        author: &UserId,
        title: &Title,
        exclude: Option<Uuid>,
    ) -> Result<bool, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let mut query = articles::table
            .filter(articles::deleted.eq(false))
            .filter(articles::author_id.eq(author.as_uuid()))
            .filter(articles::title.eq(title.as_ref()))
            .into_boxed();
        if let Some(excluded) = exclude {
            query = query.filter(articles::id.ne(excluded));
        }

        let total: i64 = query
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_db)?;
        Ok(total > 0)
    }

    async fn count(
        &self,
        predicate: &StatusPredicate,
        author: Option<&UserId>,
    ) -> Result<u64, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let total: i64 = articles::table
            .filter(list_predicate(predicate, author))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_db)?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn list(
        &self,
        query: ArticleListQuery,
    ) -> Result<Vec<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<ArticleRow> = articles::table
            .filter(list_predicate(&query.predicate, query.author.as_ref()))
            .order(articles::created_at.desc())
            .offset(query.offset)
            .limit(query.limit)
            .select(ArticleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_db)?;

        rows.into_iter().map(row_to_article).collect()
    }

    async fn update(
        &self,
        id: Uuid,
        changes: ArticleChangesRecord,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let changeset = ArticleChangeset {
            title: changes.title.as_ref(),
            content: changes.content.as_ref(),
            status: changes.status.map(ArticleStatus::as_str),
            updated_at: Utc::now(),
        };

        let row = diesel::update(articles::table.find(id))
            .set(&changeset)
            .returning(ArticleRow::as_returning())
            .get_result::<ArticleRow>(&mut conn)
            .await
            .optional()
            .map_err(map_db)?;

        row.map(row_to_article).transpose()
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let now = Utc::now();

        let affected = diesel::update(articles::table.find(id))
            .set((
                articles::deleted.eq(true),
                articles::status.eq(ArticleStatus::Deleted.as_str()),
                articles::deleted_at.eq(Some(now)),
                articles::updated_at.eq(now),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_db)?;

        Ok(affected > 0)
    }
}
