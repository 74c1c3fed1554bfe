//! Construction of the HTTP state from infrastructure handles.

use std::sync::Arc;

use actix_web::web;

use backend::domain::ports::{
    ArticleRepository, PageViewRepository, PasswordHasher, RevocationSet, TokenIssuer,
    UserRepository,
};
use backend::domain::{
    AccountService, ArticleService, IdentityResolver, PageViewService, UserService,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::auth::{Argon2PasswordHasher, JwtTokenIssuer};
use backend::outbound::cache::RedisRevocationSet;
use backend::outbound::persistence::{
    DbPool, DieselArticleRepository, DieselPageViewRepository, DieselUserRepository,
};

/// Wire repositories, crypto adapters, and services into the handler state.
pub fn build_http_state(
    pool: DbPool,
    revocations: RedisRevocationSet,
    jwt_secret: &[u8],
) -> web::Data<HttpState> {
    let users: Arc<dyn UserRepository> = Arc::new(DieselUserRepository::new(pool.clone()));
    let articles: Arc<dyn ArticleRepository> =
        Arc::new(DieselArticleRepository::new(pool.clone()));
    let views: Arc<dyn PageViewRepository> = Arc::new(DieselPageViewRepository::new(pool));
    let tokens: Arc<dyn TokenIssuer> = Arc::new(JwtTokenIssuer::new(jwt_secret));
    let revocations: Arc<dyn RevocationSet> = Arc::new(revocations);
    let passwords: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());

    let account_service = Arc::new(AccountService::new(
        users.clone(),
        passwords,
        tokens.clone(),
        revocations.clone(),
    ));
    let user_service = Arc::new(UserService::new(users.clone()));
    let article_service = Arc::new(ArticleService::new(articles.clone(), users.clone()));
    let page_view_service = Arc::new(PageViewService::new(views, articles));
    let identity = Arc::new(IdentityResolver::new(tokens, revocations, users));

    web::Data::new(HttpState {
        auth: account_service,
        users_query: user_service.clone(),
        user_command: user_service,
        articles_query: article_service.clone(),
        article_command: article_service,
        page_view_command: page_view_service.clone(),
        page_view_query: page_view_service,
        identity,
    })
}
