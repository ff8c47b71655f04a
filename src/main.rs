use std::sync::Arc;

use quire::mail::{HttpMailer, LogMailer, Mailer};
use quire::{config, db, routes, state};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quire=info,tower_http=info".into()),
        )
        .init();

    let config = config::Config::from_env()?;
    let config = Arc::new(config);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(pool.as_ref()).await?;

    let mailer: Arc<dyn Mailer> = match &config.mail_relay_url {
        Some(url) => Arc::new(HttpMailer::new(url.clone())),
        None => Arc::new(LogMailer),
    };

    let state = Arc::new(state::AppState {
        pool,
        config: config.clone(),
        mailer,
    });

    let app = routes::app(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Quire listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
