//! Driving ports for page-view recording and analytics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::analytics::{ArticleRef, ViewBucket, ViewInterval};
use crate::domain::error::Error;

/// Request metadata captured with a recorded view.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    /// Derived client address, or "unknown" when nothing was available.
    pub ip_address: String,
    /// Raw user-agent header value, when present.
    pub user_agent: Option<String>,
}

/// Analytics window: optional article plus an inclusive date range.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewWindow {
    pub article: Option<Uuid>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

/// Total views plus the distinct articles they reference.
#[derive(Debug, Clone)]
pub struct ViewCount {
    pub count: u64,
    pub articles: Vec<ArticleRef>,
}

/// Domain use-case port for recording views.
#[async_trait]
pub trait PageViewCommand: Send + Sync {
    /// Record exactly one view of a published, non-deleted article.
    ///
    /// Returns the viewed article's tuple; fails with not-found when the
    /// article is absent, soft-deleted, or not published at insertion time.
    async fn record_view(&self, article_id: Uuid, client: ClientInfo)
    -> Result<ArticleRef, Error>;
}

/// Domain use-case port for view analytics.
#[async_trait]
pub trait PageViewQuery: Send + Sync {
    /// Count views matching the window, with the distinct article tuples.
    async fn count_views(&self, window: ViewWindow) -> Result<ViewCount, Error>;

    /// Bucket views matching the window by calendar interval, ascending.
    async fn aggregate_views(
        &self,
        interval: ViewInterval,
        window: ViewWindow,
    ) -> Result<Vec<ViewBucket>, Error>;
}
