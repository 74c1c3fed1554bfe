//! Handler-test harness: an app wired to in-memory ports.

use std::sync::Arc;

use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, test as actix_test, web};
use serde_json::{Value, json};

use crate::domain::test_support::{
    InMemoryArticles, InMemoryPageViews, InMemoryUsers, StubHasher, StubRevocations, StubTokens,
};
use crate::domain::{
    AccountService, ArticleService, IdentityResolver, PageViewService, UserService,
};
use crate::inbound::http::state::HttpState;

/// Direct handles onto the in-memory stores behind a [`test_state`] app.
pub struct TestHandles {
    pub users: Arc<InMemoryUsers>,
    pub articles: Arc<InMemoryArticles>,
    pub views: Arc<InMemoryPageViews>,
    pub revocations: Arc<StubRevocations>,
}

/// Build an [`HttpState`] backed entirely by in-memory doubles.
pub fn test_state() -> (web::Data<HttpState>, TestHandles) {
    let users = Arc::new(InMemoryUsers::new());
    let articles = Arc::new(InMemoryArticles::new());
    let views = Arc::new(InMemoryPageViews::new(articles.clone()));
    let revocations = Arc::new(StubRevocations::new());
    let tokens = Arc::new(StubTokens::new());

    let account_service = Arc::new(AccountService::new(
        users.clone(),
        Arc::new(StubHasher::new()),
        tokens.clone(),
        revocations.clone(),
    ));
    let user_service = Arc::new(UserService::new(users.clone()));
    let article_service = Arc::new(ArticleService::new(articles.clone(), users.clone()));
    let page_view_service = Arc::new(PageViewService::new(views.clone(), articles.clone()));
    let identity = Arc::new(IdentityResolver::new(
        tokens,
        revocations.clone(),
        users.clone(),
    ));

    let state = web::Data::new(HttpState {
        auth: account_service,
        users_query: user_service.clone(),
        user_command: user_service,
        articles_query: article_service.clone(),
        article_command: article_service,
        page_view_command: page_view_service.clone(),
        page_view_query: page_view_service,
        identity,
    });

    (
        state,
        TestHandles {
            users,
            articles,
            views,
            revocations,
        },
    )
}

/// An app exposing the full REST surface over the given state.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .configure(crate::inbound::http::configure)
}

/// A registered account's token and id, as the API returned them.
pub struct TestAccount {
    pub token: String,
    pub user_id: String,
}

/// Register an account through the API with a fixed valid password.
pub async fn register_account<S>(app: &S, name: &str, username: &str) -> TestAccount
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/users/register")
            .set_json(json!({
                "name": name,
                "username": username,
                "password": "secret-password",
            }))
            .to_request(),
    )
    .await;
    assert!(
        res.status().is_success(),
        "registration failed: {}",
        res.status()
    );
    let body: Value = actix_test::read_body_json(res).await;
    TestAccount {
        token: body["token"].as_str().expect("token").to_owned(),
        user_id: body["user"]["id"].as_str().expect("user id").to_owned(),
    }
}

/// Create an article through the API and return its id.
pub async fn create_article_via_api<S>(
    app: &S,
    token: &str,
    title: &str,
    status: &str,
) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/articles")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({
                "title": title,
                "content": "Body text for the article.",
                "status": status,
            }))
            .to_request(),
    )
    .await;
    assert!(
        res.status().is_success(),
        "article creation failed: {}",
        res.status()
    );
    let body: Value = actix_test::read_body_json(res).await;
    body["data"]["article"]["id"]
        .as_str()
        .expect("article id")
        .to_owned()
}
