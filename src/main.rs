use std::sync::Arc;

mod config;
mod domain;
mod http;
mod ledger;
mod metrics;
mod orchestrator;

use config::ServiceSettings;
use ledger::RestletConnector;
use orchestrator::EventOrchestrator;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = ServiceSettings::from_env()?;

    // Structured logging; RUST_LOG overrides the default filter,
    // e.g. RUST_LOG=debug cargo run
    settings.logging.init();

    tracing::info!("Starting NetSuite sync endpoint");

    // === 1. Prometheus metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!("Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 2. Ledger connector (clients are built per event) ===
    tracing::info!(
        script = %settings.restlet.script_id,
        deploy = %settings.restlet.deploy_id,
        "Using NetSuite RESTlet deployment"
    );
    let connector = Arc::new(RestletConnector::new(settings.restlet.clone()));

    // === 3. Orchestrator + HTTP endpoints ===
    let orchestrator = Arc::new(EventOrchestrator::new(connector, metrics.clone()));
    http::start_server(&settings.host, settings.port, orchestrator, metrics).await?;

    tracing::info!("NetSuite sync endpoint stopped");
    Ok(())
}
