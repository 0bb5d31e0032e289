//! Service entry point: load configuration, wire the pipeline, serve.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use ireserve_mailer::config::Config;
use ireserve_mailer::http::{self, AppState};
use ireserve_mailer::providers;
use ireserve_mailer::store::PostgresRecipientStore;
use ireserve_mailer::{AddressCipher, Dispatcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Key length is a startup precondition; fail here, not per request.
    let cipher = AddressCipher::from_key_str(&config.cipher_key)?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(PostgresRecipientStore::new(pool));

    let mailer = providers::build_mailer(&config.mail);
    tracing::info!(backend = mailer.provider_name(), "Mail transport ready");

    let dispatcher = Dispatcher::new(mailer, config.mail.from_address());
    let state = Arc::new(AppState {
        store,
        dispatcher,
        cipher,
    });

    let app = http::router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
