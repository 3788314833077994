use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use chopline::{AppState, database, gateway::WhatsAppGateway, load_config, router::build_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chopline=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;
    tracing::info!("loaded configuration:\n{config}");

    let pool = database::connect(&config.database).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let gateway = Arc::new(WhatsAppGateway::new(&config.whatsapp)?);
    let state = AppState::new(pool, gateway, config.whatsapp.verify_token.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "chopline listening");

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
