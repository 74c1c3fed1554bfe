//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use crate::domain::error::ErrorCode;
use crate::inbound::http::articles::{
    ArticleBody, ArticleData, ArticleListBody, ArticleRequestBody, ArticleResponseBody,
    ArticleSummaryBody,
};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::page_views::{
    ArticleRefBody, TrackPageViewBody, TrackPageViewResponseBody, ViewBucketBody, ViewCountBody,
};
use crate::inbound::http::users::{
    AuthResponseBody, FullUserBody, LoginRequestBody, MessageBody, MinimalUserBody,
    RegisterRequestBody, UpdateUserRequestBody, UpdateUserResponseBody, UpdatedUserData,
};

/// Aggregated OpenAPI specification for the REST surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::articles::list_articles,
        crate::inbound::http::articles::get_article,
        crate::inbound::http::articles::create_article,
        crate::inbound::http::articles::update_article,
        crate::inbound::http::articles::delete_article,
        crate::inbound::http::page_views::track_page_view,
        crate::inbound::http::page_views::get_page_view_count,
        crate::inbound::http::page_views::get_aggregated_page_views,
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        RegisterRequestBody,
        LoginRequestBody,
        UpdateUserRequestBody,
        FullUserBody,
        MinimalUserBody,
        AuthResponseBody,
        MessageBody,
        UpdateUserResponseBody,
        UpdatedUserData,
        ArticleRequestBody,
        ArticleBody,
        ArticleSummaryBody,
        ArticleListBody,
        ArticleResponseBody,
        ArticleData,
        TrackPageViewBody,
        TrackPageViewResponseBody,
        ArticleRefBody,
        ViewCountBody,
        ViewBucketBody,
    )),
    tags(
        (name = "users", description = "Account registration, authentication, and profiles"),
        (name = "articles", description = "Article CRUD with visibility rules and pagination"),
        (name = "page-views", description = "View recording and time-bucketed analytics"),
        (name = "health", description = "Probe endpoints")
    )
)]
pub struct ApiDoc;
