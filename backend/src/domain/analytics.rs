//! Time-bucketed aggregation of page views.
//!
//! Views are bucketed by calendar hour, day, or month in UTC — the same
//! reference zone the store uses for `viewed_at` — so a record always lands
//! in the bucket its stored timestamp names. The reduction is pure so the
//! grouping rules stay testable without a store.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, Datelike, Timelike, Utc};
use uuid::Uuid;

use crate::domain::article::ArticleStatus;

/// Identifying tuple of an article referenced by view records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRef {
    pub id: Uuid,
    pub title: String,
    pub status: ArticleStatus,
}

/// One stored view joined with its article tuple.
#[derive(Debug, Clone)]
pub struct RecordedView {
    pub article: ArticleRef,
    pub viewed_at: DateTime<Utc>,
}

/// Calendar grouping for aggregated views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewInterval {
    Hourly,
    Daily,
    Monthly,
}

/// Error returned when an interval selector is not one of the known values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidInterval;

impl fmt::Display for InvalidInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interval must be hourly, daily, or monthly")
    }
}

impl std::error::Error for InvalidInterval {}

impl std::str::FromStr for ViewInterval {
    type Err = InvalidInterval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "monthly" => Ok(Self::Monthly),
            _ => Err(InvalidInterval),
        }
    }
}

/// Calendar bucket key. Orders ascending by (year, month, day, hour);
/// components below the interval's resolution stay zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct BucketKey {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
}

impl ViewInterval {
    fn key_for(self, timestamp: DateTime<Utc>) -> BucketKey {
        match self {
            Self::Hourly => BucketKey {
                year: timestamp.year(),
                month: timestamp.month(),
                day: timestamp.day(),
                hour: timestamp.hour(),
            },
            Self::Daily => BucketKey {
                year: timestamp.year(),
                month: timestamp.month(),
                day: timestamp.day(),
                hour: 0,
            },
            Self::Monthly => BucketKey {
                year: timestamp.year(),
                month: timestamp.month(),
                day: 0,
                hour: 0,
            },
        }
    }

    fn label(self, key: BucketKey) -> String {
        match self {
            Self::Hourly => format!(
                "{:04}-{:02}-{:02} {:02}:00",
                key.year, key.month, key.day, key.hour
            ),
            Self::Daily => format!("{:04}-{:02}-{:02}", key.year, key.month, key.day),
            Self::Monthly => format!("{:04}-{:02}", key.year, key.month),
        }
    }
}

/// One calendar bucket of aggregated views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewBucket {
    /// Formatted bucket label, e.g. "2024-01-01" for daily grouping.
    pub date: String,
    /// Number of views in the bucket.
    pub count: u64,
    /// Distinct article tuples referenced by views in the bucket.
    pub articles: Vec<ArticleRef>,
}

/// Collect the distinct article tuples across all views, first-seen order,
/// each article exactly once regardless of its view count.
pub fn distinct_articles(views: &[RecordedView]) -> Vec<ArticleRef> {
    let mut seen = HashSet::new();
    let mut articles = Vec::new();
    for view in views {
        if seen.insert(view.article.id) {
            articles.push(view.article.clone());
        }
    }
    articles
}

/// Group views into calendar buckets, ascending by bucket key.
pub fn bucket_views(views: &[RecordedView], interval: ViewInterval) -> Vec<ViewBucket> {
    struct Accumulator {
        count: u64,
        articles: Vec<ArticleRef>,
        seen: HashSet<Uuid>,
    }

    let mut buckets: BTreeMap<BucketKey, Accumulator> = BTreeMap::new();
    for view in views {
        let key = interval.key_for(view.viewed_at);
        let bucket = buckets.entry(key).or_insert_with(|| Accumulator {
            count: 0,
            articles: Vec::new(),
            seen: HashSet::new(),
        });
        bucket.count += 1;
        if bucket.seen.insert(view.article.id) {
            bucket.articles.push(view.article.clone());
        }
    }

    buckets
        .into_iter()
        .map(|(key, bucket)| ViewBucket {
            date: interval.label(key),
            count: bucket.count,
            articles: bucket.articles,
        })
        .collect()
}
