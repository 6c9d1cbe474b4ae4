use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;

use super::wire::{BusRequest, BusResponse};
use crate::domain::EventKind;
use crate::metrics::Metrics;
use crate::orchestrator::EventOrchestrator;

/// Start the HTTP server exposing the event endpoints, `/metrics` and `/health`
pub async fn start_server(
    host: &str,
    port: u16,
    orchestrator: Arc<EventOrchestrator>,
    metrics: Arc<Metrics>,
) -> std::io::Result<()> {
    tracing::info!("Starting NetSuite sync endpoint on http://{}:{}", host, port);

    let orchestrator = web::Data::from(orchestrator);
    let metrics = web::Data::from(metrics);

    HttpServer::new(move || {
        App::new()
            .app_data(orchestrator.clone())
            .app_data(metrics.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run()
    .await
}

/// Routes, split out so tests can mount them on a test service
pub fn configure(cfg: &mut web::ServiceConfig) {
    for kind in EventKind::ALL {
        cfg.route(
            kind.path(),
            web::post().to(move |body: web::Bytes, orchestrator: web::Data<EventOrchestrator>| {
                event_handler(kind, body, orchestrator)
            }),
        );
    }

    cfg.route("/metrics", web::get().to(metrics_handler))
        .route("/health", web::get().to(health_handler));
}

async fn event_handler(
    kind: EventKind,
    body: web::Bytes,
    orchestrator: web::Data<EventOrchestrator>,
) -> HttpResponse {
    let request = match BusRequest::decode(&body) {
        Ok(request) => request,
        Err(err) => return respond(None, orchestrator.reject(kind, err)),
    };

    let message_id = request.message_id.clone();
    let result = match request.into_event(kind) {
        Ok(event) => orchestrator.handle(event).await,
        Err(err) => orchestrator.reject(kind, err),
    };

    respond(message_id, result)
}

fn respond(message_id: Option<String>, result: crate::domain::HandlingResult) -> HttpResponse {
    let status = StatusCode::from_u16(result.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(BusResponse::new(message_id, result))
}

async fn metrics_handler(metrics: web::Data<Metrics>) -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = metrics.registry().gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}

async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "netsuite-sync"
    }))
}
