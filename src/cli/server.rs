use anyhow::Result;
use tower_http::trace::TraceLayer;

use courtside::AppState;

pub async fn serve(
    config: courtside::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting courtside server...");

    // Use CLI overrides if provided, otherwise use config
    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    // Write pool first: it creates the database and switches it to WAL
    let write_pool = courtside::create_write_pool(&config.database.url).await?;
    let read_pool =
        courtside::create_read_pool(&config.database.url, config.database.max_connections)
            .await?;

    let command = super::command(&config, read_pool.clone(), write_pool.clone())?;
    let query = courtside_social::Query(read_pool.clone());

    let mut scheduler = if config.scheduler.enabled {
        let sched = courtside_social::scheduler(
            &command,
            &config.scheduler.finalize_cron,
            &config.scheduler.sweep_cron,
        )
        .await?;
        sched.start().await?;
        tracing::info!(
            finalize = %config.scheduler.finalize_cron,
            sweep = %config.scheduler.sweep_cron,
            "Scheduler started"
        );
        Some(sched)
    } else {
        None
    };

    let state = AppState {
        config,
        command,
        query,
        pool: read_pool.clone(),
    };

    let app = courtside::router(state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    let shutdown_signal = async {
        let ctrl_c = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to install Ctrl+C handler: {err}");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(err) => {
                    tracing::error!("failed to install SIGTERM handler: {err}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C signal");
            },
            _ = terminate => {
                tracing::info!("Received SIGTERM signal");
            },
        }

        tracing::info!("Starting graceful shutdown...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    if let Some(sched) = scheduler.as_mut() {
        tracing::info!("Shutting down scheduler...");
        if let Err(e) = sched.shutdown().await {
            tracing::error!("{e}");
        }
    }

    tracing::info!("Closing database pools...");
    read_pool.close().await;
    write_pool.close().await;

    tracing::info!("Graceful shutdown complete");

    Ok(())
}
