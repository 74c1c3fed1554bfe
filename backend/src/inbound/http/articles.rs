//! Article HTTP handlers.
//!
//! ```text
//! GET    /articles?status=published,draft&author=<id>&page=2&limit=10
//! GET    /articles/:id
//! POST   /articles
//! PATCH  /articles/:id
//! DELETE /articles/:id
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use pagination::{Page, PageMeta};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::article::{ArticleStatus, Content, Title};
use crate::domain::ports::{
    ArticleChanges, ArticleDraft, ArticleListRequest, ArticleSummary, ArticleView,
};
use crate::domain::user::UserId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::identity::{OptionalIdentity, RequiredIdentity};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageBody;
use crate::inbound::http::validation::{
    FieldName, field_error, parse_assignable_status, parse_page_request, parse_status_filter,
    parse_uuid,
};

/// Listing query parameters. `status` accepts a single value or a
/// comma-separated set; `page`/`limit` parse leniently.
#[derive(Debug, Deserialize)]
pub struct ArticleListParams {
    pub status: Option<String>,
    pub author: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Create/update request body. `status` defaults to draft on create and to
/// the stored status on update.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ArticleRequestBody {
    pub title: String,
    pub content: String,
    pub status: Option<String>,
}

/// Sanitized article as returned by single-article endpoints: full content,
/// author rendered as a display-name string when resolved.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBody {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[schema(example = "published")]
    pub status: String,
    pub author: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

impl From<&ArticleView> for ArticleBody {
    fn from(view: &ArticleView) -> Self {
        Self {
            id: view.article.id(),
            title: view.article.title().as_ref().to_owned(),
            content: view.article.content().as_ref().to_owned(),
            status: view.article.status().as_str().to_owned(),
            author: view.author_name.clone(),
            created_at: view.article.created_at(),
            updated_at: view.article.updated_at(),
        }
    }
}

/// Sanitized list row: content reduced to its preview.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummaryBody {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[schema(example = "published")]
    pub status: String,
    pub author: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

impl From<&ArticleSummary> for ArticleSummaryBody {
    fn from(summary: &ArticleSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title.clone(),
            content: summary.preview.clone(),
            status: summary.status.as_str().to_owned(),
            author: summary.author.as_ref().map(|author| author.name.clone()),
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}

/// Paginated listing response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleListBody {
    pub data: Vec<ArticleSummaryBody>,
    #[schema(value_type = Object)]
    pub pagination: PageMeta,
}

impl From<Page<ArticleSummary>> for ArticleListBody {
    fn from(page: Page<ArticleSummary>) -> Self {
        Self {
            data: page.data.iter().map(ArticleSummaryBody::from).collect(),
            pagination: page.pagination,
        }
    }
}

/// Mutation response envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleResponseBody {
    pub message: String,
    pub data: ArticleData,
}

/// Payload of [`ArticleResponseBody`].
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleData {
    pub article: ArticleBody,
}

fn parse_title(raw: &str) -> Result<Title, ApiError> {
    Title::new(raw).map_err(|err| {
        field_error(FieldName::new("title"), err.to_string(), "invalid_title").into()
    })
}

fn parse_content(raw: &str) -> Result<Content, ApiError> {
    Content::new(raw).map_err(|err| {
        field_error(FieldName::new("content"), err.to_string(), "invalid_content").into()
    })
}

fn parse_article_id(raw: &str) -> Result<Uuid, ApiError> {
    parse_uuid(raw, FieldName::new("id")).map_err(ApiError::from)
}

fn parse_status_body(raw: Option<&str>) -> Result<Option<ArticleStatus>, ApiError> {
    raw.map(parse_assignable_status)
        .transpose()
        .map_err(ApiError::from)
}

/// List articles visible to the caller.
#[utoipa::path(
    get,
    path = "/articles",
    params(
        ("status" = Option<String>, Query, description = "Filter: draft and/or published, comma separated"),
        ("author" = Option<String>, Query, description = "Filter by author id"),
        ("page" = Option<String>, Query, description = "1-based page, default 1"),
        ("limit" = Option<String>, Query, description = "Items per page, clamped to 1..=100")
    ),
    responses(
        (status = 200, description = "Articles", body = ArticleListBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["articles"],
    operation_id = "listArticles"
)]
#[get("")]
pub async fn list_articles(
    state: web::Data<HttpState>,
    identity: OptionalIdentity,
    params: web::Query<ArticleListParams>,
) -> ApiResult<web::Json<ArticleListBody>> {
    let statuses = parse_status_filter(params.status.as_deref())?;
    let author = params
        .author
        .as_deref()
        .map(|raw| parse_uuid(raw, FieldName::new("author")))
        .transpose()?
        .map(UserId::from_uuid);
    let page = parse_page_request(params.page.as_deref(), params.limit.as_deref());

    let caller = identity.0.as_ref().map(|user| *user.id());
    let listed = state
        .articles_query
        .list_articles(
            caller.as_ref(),
            ArticleListRequest {
                statuses,
                author,
                page,
            },
        )
        .await?;

    Ok(web::Json(ArticleListBody::from(listed)))
}

/// Fetch a single article, subject to the draft-visibility rule.
#[utoipa::path(
    get,
    path = "/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article", body = ArticleBody),
        (status = 400, description = "Invalid id", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Article not found", body = ApiError)
    ),
    tags = ["articles"],
    operation_id = "getArticle"
)]
#[get("/{id}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<ArticleBody>> {
    let id = parse_article_id(&path)?;
    let caller = identity.0.as_ref().map(|user| *user.id());
    let view = state.articles_query.get_article(caller.as_ref(), id).await?;
    Ok(web::Json(ArticleBody::from(&view)))
}

/// Create an article owned by the caller.
#[utoipa::path(
    post,
    path = "/articles",
    request_body = ArticleRequestBody,
    responses(
        (status = 201, description = "Article created", body = ArticleResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 409, description = "Duplicate title", body = ApiError)
    ),
    tags = ["articles"],
    operation_id = "createArticle"
)]
#[post("")]
pub async fn create_article(
    state: web::Data<HttpState>,
    identity: RequiredIdentity,
    payload: web::Json<ArticleRequestBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let draft = ArticleDraft {
        title: parse_title(&payload.title)?,
        content: parse_content(&payload.content)?,
        status: parse_status_body(payload.status.as_deref())?.unwrap_or(ArticleStatus::Draft),
    };

    let view = state.article_command.create_article(&identity.0, draft).await?;
    Ok(HttpResponse::Created().json(ArticleResponseBody {
        message: "Article created successfully".to_owned(),
        data: ArticleData {
            article: ArticleBody::from(&view),
        },
    }))
}

/// Update an article owned by the caller.
#[utoipa::path(
    patch,
    path = "/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    request_body = ArticleRequestBody,
    responses(
        (status = 200, description = "Article updated", body = ArticleResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Article not found", body = ApiError),
        (status = 409, description = "Duplicate title", body = ApiError)
    ),
    tags = ["articles"],
    operation_id = "updateArticle"
)]
#[patch("/{id}")]
pub async fn update_article(
    state: web::Data<HttpState>,
    identity: RequiredIdentity,
    path: web::Path<String>,
    payload: web::Json<ArticleRequestBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_article_id(&path)?;
    let payload = payload.into_inner();
    let changes = ArticleChanges {
        title: parse_title(&payload.title)?,
        content: parse_content(&payload.content)?,
        status: parse_status_body(payload.status.as_deref())?,
    };

    let view = state
        .article_command
        .update_article(&identity.0, id, changes)
        .await?;
    Ok(HttpResponse::Ok().json(ArticleResponseBody {
        message: "Article updated successfully".to_owned(),
        data: ArticleData {
            article: ArticleBody::from(&view),
        },
    }))
}

/// Soft-delete an article owned by the caller.
#[utoipa::path(
    delete,
    path = "/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article deleted", body = MessageBody),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Article not found", body = ApiError)
    ),
    tags = ["articles"],
    operation_id = "deleteArticle"
)]
#[delete("/{id}")]
pub async fn delete_article(
    state: web::Data<HttpState>,
    identity: RequiredIdentity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_article_id(&path)?;
    state
        .article_command
        .delete_article(identity.0.id(), id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageBody {
        message: "Article deleted successfully".to_owned(),
    }))
}
