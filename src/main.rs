mod config;
mod db;
mod error;
mod identity;
mod notify;
mod review;
mod routes;
mod state;
mod status;
mod storage;
mod templates;

use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confera=info,tower_http=info".into()),
        )
        .init();

    let config = config::Config::from_env()?;
    let config = Arc::new(config);

    storage::ensure_dirs(&config.upload_folder)?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(pool.as_ref()).await?;

    let store = Arc::new(db::PgStore::new(pool));
    let notifier = Arc::new(notify::MailApiNotifier::new(
        config.mail_api_url.clone(),
        config.mail_api_key.clone(),
        config.mail_sender.clone(),
    ));

    let state = Arc::new(state::AppState {
        service: review::ReviewService::new(store, notifier),
        config: config.clone(),
    });

    let app = routes::app_router(state)
        .nest_service("/static", tower_http::services::ServeDir::new("static"))
        .nest_service(
            "/uploads",
            tower_http::services::ServeDir::new(&config.upload_folder),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Confera listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
