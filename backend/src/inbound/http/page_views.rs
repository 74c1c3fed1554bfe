//! Page-view HTTP handlers.
//!
//! ```text
//! POST /page-views
//! GET  /page-views/count?article=<id>&startAt=2024-01-01&endAt=2024-01-31
//! GET  /page-views/aggregate-date?interval=daily
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::analytics::{ArticleRef, ViewBucket};
use crate::domain::ports::ViewWindow;
use crate::inbound::http::ApiResult;
use crate::inbound::http::client_meta::ClientMeta;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::identity::RequiredIdentity;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_interval, parse_optional_timestamp, parse_uuid,
};

/// Record request body carrying the viewed article reference.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TrackPageViewBody {
    pub article: String,
}

/// Analytics query parameters shared by count and aggregation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQueryParams {
    pub interval: Option<String>,
    pub article: Option<String>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
}

/// Article tuple referenced by view records.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArticleRefBody {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    pub title: String,
    #[schema(example = "published")]
    pub status: String,
}

impl From<&ArticleRef> for ArticleRefBody {
    fn from(reference: &ArticleRef) -> Self {
        Self {
            id: reference.id,
            title: reference.title.clone(),
            status: reference.status.as_str().to_owned(),
        }
    }
}

/// Record confirmation envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrackPageViewResponseBody {
    pub message: String,
    pub data: ArticleRefBody,
}

/// Count response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ViewCountBody {
    pub count: u64,
    pub articles: Vec<ArticleRefBody>,
}

/// One aggregation bucket.
#[derive(Debug, Serialize, ToSchema)]
pub struct ViewBucketBody {
    #[schema(example = "2024-01-01")]
    pub date: String,
    pub count: u64,
    pub articles: Vec<ArticleRefBody>,
}

impl From<&ViewBucket> for ViewBucketBody {
    fn from(bucket: &ViewBucket) -> Self {
        Self {
            date: bucket.date.clone(),
            count: bucket.count,
            articles: bucket.articles.iter().map(ArticleRefBody::from).collect(),
        }
    }
}

fn parse_window(params: &ViewQueryParams) -> Result<ViewWindow, ApiError> {
    Ok(ViewWindow {
        article: params
            .article
            .as_deref()
            .map(|raw| parse_uuid(raw, FieldName::new("article")))
            .transpose()?,
        start_at: parse_optional_timestamp(params.start_at.as_deref(), FieldName::new("startAt"))?,
        end_at: parse_optional_timestamp(params.end_at.as_deref(), FieldName::new("endAt"))?,
    })
}

/// Record one view of a published article.
#[utoipa::path(
    post,
    path = "/page-views",
    request_body = TrackPageViewBody,
    responses(
        (status = 201, description = "View recorded", body = TrackPageViewResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Article not found", body = ApiError)
    ),
    tags = ["page-views"],
    operation_id = "trackPageView"
)]
#[post("")]
pub async fn track_page_view(
    state: web::Data<HttpState>,
    payload: web::Json<TrackPageViewBody>,
    client: ClientMeta,
) -> ApiResult<HttpResponse> {
    let article_id = parse_uuid(&payload.article, FieldName::new("article"))?;
    let reference = state
        .page_view_command
        .record_view(article_id, client.into())
        .await?;

    Ok(HttpResponse::Created().json(TrackPageViewResponseBody {
        message: "Page view tracked successfully".to_owned(),
        data: ArticleRefBody::from(&reference),
    }))
}

/// Count views matching the window.
#[utoipa::path(
    get,
    path = "/page-views/count",
    params(
        ("article" = Option<String>, Query, description = "Filter by article id"),
        ("startAt" = Option<String>, Query, description = "Inclusive window start"),
        ("endAt" = Option<String>, Query, description = "Inclusive window end")
    ),
    responses(
        (status = 200, description = "View count", body = ViewCountBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["page-views"],
    operation_id = "getPageViewCount"
)]
#[get("/count")]
pub async fn get_page_view_count(
    state: web::Data<HttpState>,
    _identity: RequiredIdentity,
    params: web::Query<ViewQueryParams>,
) -> ApiResult<web::Json<ViewCountBody>> {
    let window = parse_window(&params)?;
    let count = state.page_view_query.count_views(window).await?;
    Ok(web::Json(ViewCountBody {
        count: count.count,
        articles: count.articles.iter().map(ArticleRefBody::from).collect(),
    }))
}

/// Bucket views matching the window by calendar interval.
#[utoipa::path(
    get,
    path = "/page-views/aggregate-date",
    params(
        ("interval" = Option<String>, Query, description = "hourly, daily (default), or monthly"),
        ("article" = Option<String>, Query, description = "Filter by article id"),
        ("startAt" = Option<String>, Query, description = "Inclusive window start"),
        ("endAt" = Option<String>, Query, description = "Inclusive window end")
    ),
    responses(
        (status = 200, description = "Buckets, ascending", body = [ViewBucketBody]),
        (status = 400, description = "Invalid interval", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["page-views"],
    operation_id = "getAggregatedPageViews"
)]
#[get("/aggregate-date")]
pub async fn get_aggregated_page_views(
    state: web::Data<HttpState>,
    _identity: RequiredIdentity,
    params: web::Query<ViewQueryParams>,
) -> ApiResult<web::Json<Vec<ViewBucketBody>>> {
    let interval = parse_interval(params.interval.as_deref())?;
    let window = parse_window(&params)?;
    let buckets = state
        .page_view_query
        .aggregate_views(interval, window)
        .await?;
    Ok(web::Json(buckets.iter().map(ViewBucketBody::from).collect()))
}
