use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use medibook::config::{self, AppConfig};
use medibook::notify::Notifier;
use medibook::store::{MemoryAppointmentStore, MemoryUserStore};
use medibook::web::{app_router, AppContext};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let config = Arc::new(AppConfig::from_env());
    tracing::info!(
        version = config::APP_VERSION,
        users_table = %config.users_table,
        appointments_table = %config.appointments_table,
        region = %config.region,
        email_enabled = config.enable_email,
        sns_enabled = config.enable_sns,
        "MediBook starting"
    );

    let notifier = Arc::new(Notifier::from_config(&config));
    let ctx = AppContext::new(
        config.clone(),
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryAppointmentStore::new()),
        notifier,
    );
    let app = app_router(ctx);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%err, addr = %config.bind_addr, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %config.bind_addr, "listening");

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(%err, "server error");
    }
}
