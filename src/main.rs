use std::sync::Arc;

use anyhow::Context;
use time::Duration;
use tokio::net::TcpListener;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

mod config;
mod data;
mod db;
mod features;
mod handlers;
mod schema;
mod utils;

use config::Config;
use features::quiz::TemplateQuestionRenderer;
use handlers::{AppState, app_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("Invalid configuration")?;

    // Database configuration
    let pool = db::create_pool(&config.database_url).context("Failed to create DB pool")?;
    {
        let mut conn = pool.get().context("Failed to get DB connection")?;
        db::initialize_schema(&mut conn).context("Failed to initialize database schema")?;
    }

    // Question renderer; the service falls back to built-in phrasing if loading fails
    let renderer = match &config.question_templates {
        Some(glob) => TemplateQuestionRenderer::from_glob(glob.clone()),
        None => TemplateQuestionRenderer::built_in(),
    };
    if let Err(e) = renderer.load() {
        log::warn!("Continuing without question templates: {}", e);
    }

    // Sessions configuration
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnInactivity(Duration::days(config.session_inactivity_days)))
        .with_secure(config.session_secure);

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        pool,
        renderer: Arc::new(renderer),
        config: Arc::new(config),
    };
    let app = app_router(state).layer(session_layer);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    log::info!("Server running on http://{}", bind_addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
