//! HTTP inbound adapter exposing REST endpoints.

pub mod articles;
pub mod client_meta;
pub mod error;
pub mod health;
pub mod identity;
pub mod page_views;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every REST resource scope on an app or test service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(users::register)
            .service(users::login)
            .service(users::logout)
            .service(users::list_users)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user),
    )
    .service(
        web::scope("/articles")
            .service(articles::list_articles)
            .service(articles::get_article)
            .service(articles::create_article)
            .service(articles::update_article)
            .service(articles::delete_article),
    )
    .service(
        web::scope("/page-views")
            .service(page_views::track_page_view)
            .service(page_views::get_page_view_count)
            .service(page_views::get_aggregated_page_views),
    );
}
