mod api_doc;
mod app;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod state;
mod store;
mod validation;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use config::{Config, HostingMode, StoreBackend};
use state::AppState;
use store::{DynamoDbEventStore, EventStore, InMemoryEventStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.hosting_mode);

    tracing::info!("event-management-api starting");
    config.log_startup();

    let store: Arc<dyn EventStore> = match config.store_backend {
        StoreBackend::DynamoDb => {
            let store = DynamoDbEventStore::from_config(&config).await;
            tracing::info!("Using DynamoDB table: {}", store.table_name());
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory event store; data is lost on restart");
            Arc::new(InMemoryEventStore::new())
        }
    };

    let state = AppState {
        store,
        config: Arc::new(config),
    };
    let app = app::router(state.clone());

    match state.config.hosting_mode {
        HostingMode::Lambda => lambda_http::run(app::lambda_service(app))
            .await
            .map_err(|err| anyhow::anyhow!(err)),
        HostingMode::Http => {
            let addr = format!("{}:{}", state.config.service_host, state.config.service_port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {}", addr))?;
            tracing::info!("Listening on http://{}", addr);

            axum::serve(listener, app).await.context("server error")
        }
    }
}

/// JSON logs under Lambda, plain text otherwise.
fn init_tracing(mode: HostingMode) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match mode {
        HostingMode::Lambda => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .init(),
        HostingMode::Http => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
