use std::env;
use anyhow::{Context, Result, bail};

/// Which backing store the service uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

/// How the service receives requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostingMode {
    /// Invoked by API Gateway through the Lambda runtime API
    Lambda,
    /// Plain HTTP listener on `service_host:service_port`
    Http,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub events_table_name: String,
    pub store_backend: StoreBackend,
    pub dynamodb_endpoint_url: Option<String>,
    pub service_port: u16,
    pub service_host: String,
    /// `None` allows every origin
    pub cors_allowed_origins: Option<Vec<String>>,
    pub hosting_mode: HostingMode,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let events_table_name = env::var("EVENTS_TABLE_NAME")
            .unwrap_or_else(|_| "EventsTable".to_string());

        let store_backend = match env::var("EVENTS_STORE")
            .unwrap_or_else(|_| "dynamodb".to_string())
            .as_str()
        {
            "dynamodb" => StoreBackend::DynamoDb,
            "memory" => StoreBackend::Memory,
            other => bail!("EVENTS_STORE must be one of: dynamodb, memory, got '{}'", other),
        };

        let dynamodb_endpoint_url = env::var("DYNAMODB_ENDPOINT_URL").ok();

        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        let cors_allowed_origins = parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let hosting_mode = if env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
            HostingMode::Lambda
        } else {
            HostingMode::Http
        };

        Ok(Config {
            events_table_name,
            store_backend,
            dynamodb_endpoint_url,
            service_port,
            service_host,
            cors_allowed_origins,
            hosting_mode,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Store backend: {:?}", self.store_backend);
        tracing::info!("  Events table: {}", self.events_table_name);
        tracing::info!("  DynamoDB endpoint: {}",
            self.dynamodb_endpoint_url.as_deref().unwrap_or("default (AWS)"));
        tracing::info!("  CORS origins: {}",
            self.cors_allowed_origins.as_ref().map(|o| o.join(", ")).unwrap_or_else(|| "*".to_string()));
        match self.hosting_mode {
            HostingMode::Lambda => tracing::info!("  Hosting: AWS Lambda"),
            HostingMode::Http => tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port),
        }
    }
}

/// Comma-separated origin list; a `*` entry allows every origin.
fn parse_origins(raw: &str) -> Option<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        None
    } else {
        Some(origins)
    }
}
