//! Server construction and middleware wiring.

pub mod config;

pub use config::{AdminApiKey, AppConfig, ConfigError, Env, ProcessEnv};

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{ContactService, Error, RetentionPolicy};
use crate::inbound::http::contact::{cleanup_expired, delete_by_email, submit_contact};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{DbPool, DieselSubmissionRepository};

/// Wire the Diesel repository and the contact service into handler state.
pub fn build_http_state(config: &AppConfig, pool: DbPool) -> HttpState {
    let repository = DieselSubmissionRepository::new(pool);
    let service = ContactService::new(
        Arc::new(repository),
        RetentionPolicy::new(config.retention),
    );
    HttpState::new(service, config.admin_api_key.clone())
}

/// Cross-origin policy: one configured origin, or permissive when unset.
fn cors_layer(origin: Option<&str>) -> Cors {
    match origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials(),
        None => Cors::permissive(),
    }
}

async fn endpoint_not_found() -> HttpResponse {
    Error::not_found("Endpoint not found").error_response()
}

/// Bind the HTTP server and return the running future.
///
/// Readiness flips to true once the socket is bound; the caller awaits the
/// returned [`Server`].
pub fn run(config: &AppConfig, pool: DbPool) -> std::io::Result<Server> {
    let state = web::Data::new(build_http_state(config, pool));
    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();
    let cors_origin = config.cors_origin.clone();

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .app_data(server_health_state.clone())
            .wrap(cors_layer(cors_origin.as_deref()))
            .service(
                web::scope("/api/v1")
                    .service(submit_contact)
                    .service(delete_by_email)
                    .service(cleanup_expired),
            )
            .service(ready)
            .service(live)
            .default_service(web::route().to(endpoint_not_found));

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(("0.0.0.0", config.listen_port))?;

    health_state.mark_ready();
    Ok(server.run())
}
