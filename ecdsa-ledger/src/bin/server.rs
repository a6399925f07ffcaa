//! Ledger HTTP server binary

use ecdsa_ledger::{server, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting ECDSA Ledger Server");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        listen_addr = %config.listen_addr,
        accounts = config.accounts.len(),
        "Configuration loaded"
    );

    server::serve(config).await?;

    tracing::info!("Shutting down ledger server");
    Ok(())
}
