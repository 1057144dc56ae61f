use std::net::SocketAddr;

use actix_cors::Cors;
use actix_web::{
    error::InternalError,
    get, middleware,
    web::{Data, JsonConfig},
    App, HttpResponse, HttpServer, Responder,
};
use actix_web_opentelemetry::{RequestMetrics, RequestTracing};
use anyhow::{anyhow, Result};
use futures::TryFutureExt;
use prodstock_api::message::Message;
use prodstock_core::env::infer;
use tracing::{error, info, instrument, Level};

use crate::db::Database;

#[instrument(level = Level::INFO)]
#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json("healthy")
}

/// Malformed or mistyped request bodies answer 400 with the same
/// `{message}` body shape as every other failure.
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|error, _req| {
        let message = Message::new(error.to_string());
        InternalError::from_response(error, HttpResponse::BadRequest().json(message)).into()
    })
}

pub async fn loop_forever(db: Database) {
    match try_loop_forever(&db).await {
        Ok(()) => db.signal.terminate(),
        Err(error) => {
            error!("failed to operate http server: {error}");
            db.signal.terminate_on_panic()
        }
    }
}

async fn try_loop_forever(db: &Database) -> Result<()> {
    info!("Starting http server...");

    let addr =
        infer::<_, SocketAddr>("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".parse().unwrap());
    let allowed_origin = infer::<_, String>("PRODSTOCK_CORS_ORIGIN").ok();

    let db = Data::new(db.clone());

    let server = HttpServer::new(move || {
        let cors = Cors::default().allow_any_header().allow_any_method();
        let cors = match allowed_origin.as_deref() {
            Some(origin) => cors.allowed_origin(origin),
            None => cors.allow_any_origin(),
        };

        let app = App::new()
            .app_data(Data::clone(&db))
            .app_data(self::json_config());
        let app = app
            .service(health)
            .service(crate::routes::product::list)
            .service(crate::routes::product::create)
            .service(crate::routes::product::update)
            .service(crate::routes::product::delete);
        app.wrap(cors)
            .wrap(middleware::NormalizePath::new(
                middleware::TrailingSlash::Trim,
            ))
            .wrap(RequestTracing::default())
            .wrap(RequestMetrics::default())
    })
    .bind(addr)
    .map_err(|error| anyhow!("failed to bind to {addr}: {error}"))?;

    server.run().map_err(Into::into).await
}
