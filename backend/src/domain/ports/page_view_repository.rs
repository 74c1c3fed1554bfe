//! Driven port for page-view persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::analytics::RecordedView;
use crate::domain::page_view::{DeviceInfo, PageView};

/// Persistence failures surfaced by [`PageViewRepository`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageViewRepositoryError {
    /// The store could not be reached or a connection could not be checked out.
    #[error("page view store unavailable: {message}")]
    Connection { message: String },

    /// A query failed after a connection was established.
    #[error("page view store query failed: {message}")]
    Query { message: String },
}

impl PageViewRepositoryError {
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

/// Fields for a new view row; `viewed_at` is stamped by the store.
#[derive(Debug, Clone)]
pub struct NewPageViewRecord {
    pub id: Uuid,
    pub article_id: Uuid,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub device: DeviceInfo,
}

/// Analytics filter: optional article plus an inclusive time window.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewFilter {
    pub article: Option<Uuid>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

/// Driven port owning immutable view rows.
#[async_trait]
pub trait PageViewRepository: Send + Sync {
    /// Insert one view record and return it as stored.
    async fn insert(&self, record: NewPageViewRecord)
    -> Result<PageView, PageViewRepositoryError>;

    /// Load all views matching the filter, each joined with its article's
    /// current (id, title, status) tuple.
    async fn load_views(
        &self,
        filter: &ViewFilter,
    ) -> Result<Vec<RecordedView>, PageViewRepositoryError>;
}
