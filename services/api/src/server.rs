use crate::cli::ServeArgs;
use crate::infra::{AppState, LeadDesk};
use crate::routes::with_site_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use campus_leads::catalog::Catalog;
use campus_leads::config::AppConfig;
use campus_leads::error::AppError;
use campus_leads::leads::HttpIntakeGateway;
use campus_leads::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = HttpIntakeGateway::from_config(&config.intake)?;
    if !config.intake.endpoint.is_configured() {
        warn!("LEAD_INTAKE_ENDPOINT is not set; lead submissions will be refused");
    }
    let desk = LeadDesk::new(
        Catalog::standard(),
        Arc::new(gateway),
        config.intake.status_reset,
        config.sessions.clone(),
    );
    let sweeper = desk.spawn_sweeper();

    let app = with_site_routes(desk)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "campus leads service ready");

    let served = axum::serve(listener, app).await;
    sweeper.abort();
    served?;
    Ok(())
}
