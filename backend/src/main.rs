//! Backend entry-point: loads settings, wires stores into the HTTP adapter
//! and serves the REST API with health probes.

mod server;

use std::sync::Arc;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ayuda::inbound::http::health::HealthState;
use ayuda::inbound::http::session_config::{BuildMode, session_settings};
use ayuda::inbound::http::state::HttpState;
use ayuda::outbound::memory::InMemoryStore;
use ayuda::outbound::persistence::{
    DbPool, DieselAssignmentRepository, DieselDeliveryPointRepository,
    DieselHelpRequestRepository, DieselTownRepository, PoolConfig, run_pending_migrations,
};
use ayuda::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    let bind_addr = settings.bind_addr()?;

    let (http_state, health_state) = match settings.database_url() {
        Some(url) => {
            let applied = run_pending_migrations(url)
                .await
                .wrap_err("failed to apply database migrations")?;
            info!(applied, "database schema is up to date");
            let pool = DbPool::new(
                PoolConfig::new(url).with_max_size(settings.db_max_connections()),
            )
            .await
            .wrap_err("failed to build database pool")?;
            let state = HttpState::from_stores(
                Arc::new(DieselHelpRequestRepository::new(pool.clone())),
                Arc::new(DieselAssignmentRepository::new(pool.clone())),
                Arc::new(DieselTownRepository::new(pool.clone())),
                Arc::new(DieselDeliveryPointRepository::new(pool.clone())),
            );
            (state, HealthState::new().with_pool(pool))
        }
        None => {
            warn!("no database configured; using the in-memory store");
            let store = Arc::new(InMemoryStore::default());
            (HttpState::in_memory(store), HealthState::new())
        }
    };

    let config = ServerConfig::new(session.key, session.cookie_secure, bind_addr, http_state);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(make_metrics()?));

    let health_state = web::Data::new(health_state);
    info!(%bind_addr, "starting server");
    create_server(health_state, config)?.await?;
    Ok(())
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Result<actix_web_prom::PrometheusMetrics> {
    PrometheusMetricsBuilder::new("ayuda")
        .endpoint("/metrics")
        .build()
        .map_err(|err| eyre!("failed to configure Prometheus metrics: {err}"))
}
