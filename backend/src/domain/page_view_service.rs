//! Page-view domain service: recording and analytics.
//!
//! Implements the [`PageViewCommand`] and [`PageViewQuery`] driving ports.
//! Recording gates on the article being published and non-deleted at
//! insertion time; later status changes never invalidate stored views.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::analytics::{
    bucket_views, distinct_articles, ArticleRef, ViewBucket, ViewInterval,
};
use crate::domain::article::ArticleStatus;
use crate::domain::device::parse_device_info;
use crate::domain::error::Error;
use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, ClientInfo, NewPageViewRecord, PageViewCommand,
    PageViewQuery, PageViewRepository, PageViewRepositoryError, ViewCount, ViewFilter,
    ViewWindow,
};

fn map_article_repository_error(error: ArticleRepositoryError) -> Error {
    match error {
        ArticleRepositoryError::Connection { message } => Error::service_unavailable(message),
        ArticleRepositoryError::Query { message } => Error::internal(message),
        ArticleRepositoryError::DuplicateTitle => Error::internal(error.to_string()),
    }
}

fn map_page_view_repository_error(error: PageViewRepositoryError) -> Error {
    match error {
        PageViewRepositoryError::Connection { message } => Error::service_unavailable(message),
        PageViewRepositoryError::Query { message } => Error::internal(message),
    }
}

const fn window_to_filter(window: ViewWindow) -> ViewFilter {
    ViewFilter {
        article: window.article,
        start_at: window.start_at,
        end_at: window.end_at,
    }
}

/// Page-view service implementing the analytics driving ports.
#[derive(Clone)]
pub struct PageViewService {
    views: Arc<dyn PageViewRepository>,
    articles: Arc<dyn ArticleRepository>,
}

impl PageViewService {
    /// Create the service over the view and article repositories.
    pub fn new(views: Arc<dyn PageViewRepository>, articles: Arc<dyn ArticleRepository>) -> Self {
        Self { views, articles }
    }
}

#[async_trait]
impl PageViewCommand for PageViewService {
    async fn record_view(
        &self,
        article_id: Uuid,
        client: ClientInfo,
    ) -> Result<ArticleRef, Error> {
        let article = self
            .articles
            .find_visible_by_id(article_id)
            .await
            .map_err(map_article_repository_error)?
            .filter(|article| article.status() == ArticleStatus::Published)
            .ok_or_else(|| Error::not_found("Article not found"))?;

        let device = parse_device_info(client.user_agent.as_deref().unwrap_or(""));
        self.views
            .insert(NewPageViewRecord {
                id: Uuid::new_v4(),
                article_id,
                ip_address: client.ip_address,
                user_agent: client.user_agent,
                device,
            })
            .await
            .map_err(map_page_view_repository_error)?;

        Ok(ArticleRef {
            id: article.id(),
            title: article.title().as_ref().to_owned(),
            status: article.status(),
        })
    }
}

#[async_trait]
impl PageViewQuery for PageViewService {
    async fn count_views(&self, window: ViewWindow) -> Result<ViewCount, Error> {
        let views = self
            .views
            .load_views(&window_to_filter(window))
            .await
            .map_err(map_page_view_repository_error)?;

        Ok(ViewCount {
            count: views.len() as u64,
            articles: distinct_articles(&views),
        })
    }

    async fn aggregate_views(
        &self,
        interval: ViewInterval,
        window: ViewWindow,
    ) -> Result<Vec<ViewBucket>, Error> {
        let views = self
            .views
            .load_views(&window_to_filter(window))
            .await
            .map_err(map_page_view_repository_error)?;

        Ok(bucket_views(&views, interval))
    }
}
