use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use price_pusher::api::rest::{ApiState, create_router};
use price_pusher::config::loader::AppConfig;
use price_pusher::ledger::rpc::RpcLedgerClient;
use price_pusher::observability::metrics::register_metrics;
use price_pusher::oracle::hermes::HermesQuoteSource;
use price_pusher::pusher::scheduler::PusherScheduler;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    register_metrics();

    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "default".to_string());
    let app_config = AppConfig::load(&run_env)?;

    let quote_source = Arc::new(HermesQuoteSource::new(&app_config.pusher.price_service_url)?);
    let ledger = Arc::new(RpcLedgerClient::new(
        &app_config.pusher.ledger_rpc_url,
        &app_config.pusher.contract_address,
    )?);

    let scheduler = Arc::new(PusherScheduler::new(&app_config.pusher, quote_source, ledger));
    let shutdown = CancellationToken::new();

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received");
        signal_token.cancel();
    });

    let router = create_router(Arc::new(ApiState {
        scheduler: scheduler.clone(),
    }));
    let listener = tokio::net::TcpListener::bind(&app_config.server.listen_address).await?;
    info!(address = %app_config.server.listen_address, "status endpoint listening");

    let server_token = shutdown.clone();
    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router)
            .with_graceful_shutdown(async move { server_token.cancelled().await })
            .await
        {
            error!("status server failed: {}", e);
        }
    });

    if let Err(e) = scheduler.start(shutdown.clone()).await {
        error!("failed to start price pusher: {}", e);
        shutdown.cancel();
        let _ = server.await;
        return Err(e.into());
    }

    shutdown.cancelled().await;
    let _ = server.await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }
}
