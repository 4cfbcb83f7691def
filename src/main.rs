use std::sync::Arc;

use social_recs::{
    api::{create_router, AppState, RequestDefaults},
    config::Config,
    db::{create_pool, PgSocialGraph},
    services::recommendations::Recommender,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("social_recs=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Connected to PostgreSQL");

    let recommender = Recommender::new(
        Arc::new(PgSocialGraph::new(pool)),
        config.scoring_weights(),
        config.recommendation_limits(),
    );
    let state = AppState::new(recommender, RequestDefaults::from(&config));

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
