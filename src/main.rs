use anyhow::Context;
use digital_lurker::{AppState, Configuration, build_router};

const DEFAULT_SERVER_URL: &str = "0.0.0.0:8000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    log::info!("Loading configuration...");
    let config = Configuration::load()?;
    let address = config.get_or("server.url", DEFAULT_SERVER_URL).to_string();

    log::info!("Start building application...");
    let state = build_state(config).await?;
    state.seed_admin().await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    log::info!("Listening on http://{}", address);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(feature = "postgres")]
async fn build_state(config: Configuration) -> anyhow::Result<AppState> {
    use digital_lurker::repositories::schema::ensure_schema;
    use sqlx::postgres::PgPoolOptions;

    let Some(url) = config.get("database.url").map(str::to_string) else {
        log::warn!("database.url is not set, using the in-memory store");
        return Ok(AppState::memory(config).0);
    };

    log::info!("Connecting to Postgres...");
    let pool = PgPoolOptions::new()
        .max_connections(config.parse_or("database.max_connections", 10))
        .connect(&url)
        .await
        .context("failed to connect to postgres")?;
    ensure_schema(&pool).await.context("failed to apply schema")?;
    Ok(AppState::postgres(config, pool))
}

#[cfg(not(feature = "postgres"))]
async fn build_state(config: Configuration) -> anyhow::Result<AppState> {
    log::warn!("Built without postgres support, using the in-memory store");
    Ok(AppState::memory(config).0)
}

fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(log::LevelFilter::Debug);
    }
    let _ = builder.try_init();
}
