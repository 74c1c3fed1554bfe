//! Server construction and wiring.

mod config;
mod state_builders;

pub use config::AppConfig;
use state_builders::build_http_state;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::outbound::cache::RedisRevocationSet;
use backend::outbound::persistence::{DbPool, PoolConfig};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    #[allow(unused_mut, reason = "mutated only in debug builds")]
    let mut app = App::new()
        .app_data(http_state)
        .app_data(health_state)
        .wrap(Trace)
        .configure(http::configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    {
        app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app
}

/// Connect the store and cache, then run the HTTP server until shutdown.
pub async fn run(app_config: AppConfig) -> std::io::Result<()> {
    let pool = DbPool::new(PoolConfig::new(&app_config.database_url))
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let revocations = RedisRevocationSet::connect(&app_config.redis_url)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    let http_state = build_http_state(pool, revocations, &app_config.jwt_secret);
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness flip below still works.
    let server_http_state = http_state.clone();
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_http_state.clone(), server_health_state.clone())
    })
    .bind(app_config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
