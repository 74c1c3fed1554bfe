//! Diesel row structs for the persistence layer.
//!
//! Internal implementation details: repositories convert these to and from
//! validated domain types and never expose them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{articles, page_views, users};

/// One `users` row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for `users`; timestamps default in the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Profile update changeset; `None` fields are left untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChangeset<'a> {
    pub name: Option<&'a str>,
    pub username: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// One `articles` row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ArticleRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub status: String,
    pub author_id: Uuid,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insert payload for `articles`; tags and timestamps default in the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = articles)]
pub struct NewArticleRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
    pub status: &'a str,
    pub author_id: Uuid,
}

/// Update changeset for `articles`; status only changes when supplied.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = articles)]
pub struct ArticleChangeset<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub status: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// One `page_views` row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = page_views)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PageViewRow {
    pub id: Uuid,
    pub article_id: Uuid,
    pub viewed_at: DateTime<Utc>,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub device_type: String,
    pub device_os: Option<String>,
    pub device_browser: Option<String>,
}

/// Insert payload for `page_views`; `viewed_at` defaults to now().
#[derive(Debug, Insertable)]
#[diesel(table_name = page_views)]
pub struct NewPageViewRow<'a> {
    pub id: Uuid,
    pub article_id: Uuid,
    pub ip_address: &'a str,
    pub user_agent: Option<&'a str>,
    pub device_type: &'a str,
    pub device_os: Option<&'a str>,
    pub device_browser: Option<&'a str>,
}
