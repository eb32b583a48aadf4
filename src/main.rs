use std::net::TcpListener;
use std::sync::Arc;

use chirpy::auth::AuthService;
use chirpy::configuration::get_configuration;
use chirpy::startup::run;
use chirpy::store::{AuthStore, InMemoryAuthStore, PgAuthStore};
use chirpy::telemetry::init_telemetry;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry("info");

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!(
                platform = %config.application.platform,
                "Configuration loaded successfully"
            );
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let store: Arc<dyn AuthStore> = match &configuration.database {
        Some(database) => {
            tracing::info!("Attempting to connect to database");

            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database.connection_string())
                .await
                .map_err(|e| {
                    tracing::error!("Failed to create connection pool: {}", e);
                    std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        "Database connection error",
                    )
                })?;

            sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, "Database migration error")
            })?;

            tracing::info!("Database connection pool created successfully");
            Arc::new(PgAuthStore::new(pool))
        }
        None => {
            tracing::warn!("No database configured, using the in-memory store");
            Arc::new(InMemoryAuthStore::new())
        }
    };

    let auth = AuthService::new(store, &configuration.auth).map_err(|e| {
        tracing::error!("Failed to initialise authentication: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Configuration error")
    })?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    run(listener, auth)?.await
}
