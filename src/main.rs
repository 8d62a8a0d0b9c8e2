use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use demo_intake::audit::FileAuditLog;
use demo_intake::config::Config;
use demo_intake::email;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!("Starting demo request intake");

    let mailer = match email::from_config(config.mail.as_ref(), config.mail_timeout) {
        Ok(mailer) => mailer,
        Err(e) => {
            tracing::warn!("Mail transport not available: {e}");
            None
        }
    };

    let audit = Arc::new(FileAuditLog::new(config.log_file.clone()));
    tracing::info!("Audit log at {}", audit.path().display());

    let addr = SocketAddr::new(config.host, config.port);
    let path = config.path.clone();
    let app = demo_intake::build_app(config, mailer, audit)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}, accepting demo requests at {path}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
