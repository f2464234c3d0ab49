//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use foodgram::Trace;
#[cfg(debug_assertions)]
use foodgram::doc::ApiDoc;
use foodgram::inbound::http::api_scope;
use foodgram::inbound::http::error::{json_config, path_config, query_config};
use foodgram::inbound::http::health::{HealthState, live, ready};
use foodgram::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Shared per-worker data handed to every `App` instance.
#[derive(Clone)]
struct Shared {
    health: web::Data<HealthState>,
    http: web::Data<HttpState>,
}

fn build_app(
    shared: Shared,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(shared.health)
        .app_data(shared.http)
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .wrap(Trace)
        .service(api_scope())
        .service(ready)
        .service(live);

    // Swagger UI is only mounted in debug builds.
    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Readiness is marked once the socket is bound; the readiness probe still
/// pings the database on every call.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: HealthState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let ServerConfig {
        bind_addr, db_pool, ..
    } = config;
    let shared = Shared {
        health: web::Data::new(health_state.with_database(Arc::new(db_pool))),
        http: http_state,
    };
    let readiness = shared.health.clone();

    let server = HttpServer::new(move || build_app(shared.clone()))
        .bind(bind_addr)?
        .run();

    readiness.mark_ready();
    Ok(server)
}
