use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use vouch_api::{AuthBackend, HttpApi};
use vouch_core::{MemoryConfigStore, SystemClock};
use vouch_observe::{LoggerConfig, logger_init};
use vouch_scheduler::{HttpConfig, HttpConnector};

mod settings;
use settings::DaemonSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = DaemonSettings::from_env()?;

    // 1) Logger
    let cfg = LoggerConfig::default()
        .with_format(settings.log_format)
        .with_level(settings.log_level);
    logger_init(&cfg)?;
    info!(format = %settings.log_format, level = %settings.log_level, "logger initialized");

    // 2) Config store, seeded from the environment
    let store = Arc::new(MemoryConfigStore::new());
    if settings.backend.scheduler_urls().is_empty() {
        warn!(
            admin_addr = %settings.admin_addr,
            "no scheduler url configured; logins are denied until PUT /v1/config"
        );
    } else {
        settings
            .backend
            .save(store.as_ref())
            .context("seed backend config")?;
        info!(
            scheduler_url = %settings.backend.scheduler_url,
            cluster_state_url = settings.backend.cluster_state_url().unwrap_or(""),
            "backend config seeded"
        );
    }

    // 3) Upstream connector + auth backend
    let connector = Arc::new(HttpConnector::new(HttpConfig {
        timeout: settings.request_timeout,
        ..Default::default()
    }));
    let backend = AuthBackend::new(
        store,
        connector,
        settings.verifier,
        Arc::new(SystemClock),
    );
    info!(
        startup_threshold_ms = settings.verifier.startup_threshold.as_millis() as u64,
        lease_ttl_secs = settings.verifier.lease_ttl.as_secs(),
        strict_task_match = settings.verifier.strict_task_match,
        require_cluster_check = settings.verifier.require_cluster_check,
        "auth backend ready"
    );

    // 4) HTTP API: login on the workload listener, config on the admin one
    let api = HttpApi::new(Arc::new(backend));
    let listener = TcpListener::bind(settings.listen_addr)
        .await
        .with_context(|| format!("bind {}", settings.listen_addr))?;
    let admin_listener = TcpListener::bind(settings.admin_addr)
        .await
        .with_context(|| format!("bind {}", settings.admin_addr))?;
    info!(
        addr = %settings.listen_addr,
        admin_addr = %settings.admin_addr,
        "listening"
    );

    let admin = tokio::spawn(
        axum::serve(admin_listener, api.admin_router())
            .with_graceful_shutdown(shutdown_signal())
            .into_future(),
    );
    axum::serve(listener, api.router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    admin.await??;
    info!("shut down");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down...");
}
