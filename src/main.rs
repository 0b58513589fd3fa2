use std::sync::Arc;

use anyhow::Context;
use hospital::{routes, session::LoginManager, Config, Database, Repositories};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("loading configuration")?;
    config.logging.init();

    let db = Database::connect(&config.database)
        .await
        .context("connecting to database")?;
    db.bootstrap().await.context("creating tables")?;

    let repos = Repositories::new(&db, &config);
    let sessions = Arc::new(LoginManager::new(repos.users.clone(), config.session_ttl));
    let app = routes::app(sessions);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app).await.context("serving http")?;
    db.close().await;
    Ok(())
}
