//! PostgreSQL-backed `PageViewRepository` implementation using Diesel ORM.
//!
//! Analytics loads match in two single-table queries: the filtered view
//! rows, then the article tuples they reference. The reduction itself
//! (counts, buckets, dedup) lives in the domain.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::analytics::{ArticleRef, RecordedView};
use crate::domain::article::ArticleStatus;
use crate::domain::page_view::{DeviceInfo, DeviceType, PageView};
use crate::domain::ports::{
    NewPageViewRecord, PageViewRepository, PageViewRepositoryError, ViewFilter,
};

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::{NewPageViewRow, PageViewRow};
use super::pool::{DbPool, PoolError};
use super::schema::{articles, page_views};

/// Diesel-backed implementation of the page-view repository port.
#[derive(Clone)]
pub struct DieselPageViewRepository {
    pool: DbPool,
}

impl DieselPageViewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> PageViewRepositoryError {
    map_pool_error(error, PageViewRepositoryError::connection)
}

fn map_db(error: diesel::result::Error) -> PageViewRepositoryError {
    map_diesel_error(
        error,
        PageViewRepositoryError::query,
        PageViewRepositoryError::connection,
        || PageViewRepositoryError::query("unexpected unique violation"),
    )
}

fn row_to_page_view(row: PageViewRow) -> PageView {
    let PageViewRow {
        id,
        article_id,
        viewed_at,
        ip_address,
        user_agent,
        device_type,
        device_os,
        device_browser,
    } = row;

    // Unknown identifiers degrade instead of failing the read.
    let device_type = device_type.parse::<DeviceType>().unwrap_or_default();
    PageView::new(
        id,
        article_id,
        viewed_at,
        ip_address,
        user_agent,
        DeviceInfo {
            device_type,
            os: device_os,
            browser: device_browser,
        },
    )
}

#[async_trait]
impl PageViewRepository for DieselPageViewRepository {
    async fn insert(
        &self,
        record: NewPageViewRecord,
    ) -> Result<PageView, PageViewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewPageViewRow {
            id: record.id,
            article_id: record.article_id,
            ip_address: record.ip_address.as_str(),
            user_agent: record.user_agent.as_deref(),
            device_type: record.device.device_type.as_str(),
            device_os: record.device.os.as_deref(),
            device_browser: record.device.browser.as_deref(),
        };

        let row = diesel::insert_into(page_views::table)
            .values(&new_row)
            .returning(PageViewRow::as_returning())
            .get_result::<PageViewRow>(&mut conn)
            .await
            .map_err(map_db)?;

        Ok(row_to_page_view(row))
    }

    async fn load_views(
        &self,
        filter: &ViewFilter,
    ) -> Result<Vec<RecordedView>, PageViewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let mut query = page_views::table.into_boxed();
        if let Some(article_id) = filter.article {
            query = query.filter(page_views::article_id.eq(article_id));
        }
        if let Some(start_at) = filter.start_at {
            query = query.filter(page_views::viewed_at.ge(start_at));
        }
        if let Some(end_at) = filter.end_at {
            query = query.filter(page_views::viewed_at.le(end_at));
        }

        let rows: Vec<PageViewRow> = query
            .order(page_views::viewed_at.asc())
            .select(PageViewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_db)?;

        let mut article_ids: Vec<Uuid> = rows.iter().map(|row| row.article_id).collect();
        article_ids.sort_unstable();
        article_ids.dedup();

        let tuples: Vec<(Uuid, String, String)> = articles::table
            .filter(articles::id.eq_any(article_ids))
            .select((articles::id, articles::title, articles::status))
            .load(&mut conn)
            .await
            .map_err(map_db)?;

        let references: HashMap<Uuid, ArticleRef> = tuples
            .into_iter()
            .map(|(id, title, status)| {
                let status = status.parse::<ArticleStatus>().map_err(|err| {
                    PageViewRepositoryError::query(format!("corrupt article row: {err}"))
                })?;
                Ok((id, ArticleRef { id, title, status }))
            })
            .collect::<Result<_, PageViewRepositoryError>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                references.get(&row.article_id).map(|reference| RecordedView {
                    article: reference.clone(),
                    viewed_at: row.viewed_at,
                })
            })
            .collect())
    }
}
