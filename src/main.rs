mod app;
mod auth;
mod categories;
mod config;
mod locations;
mod response;
mod services;
mod state;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "localmart=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;

    sqlx::migrate!("./migrations").run(&app_state.db).await?;

    // Startup invariant: exactly one superadmin with the configured
    // credentials. A failure here is fatal, never a per-request error.
    let superadmin_hash = auth::password::hash_password(&app_state.config.superadmin_password)?;
    auth::repo::ensure_superadmin(
        &app_state.db,
        app_state.config.identifier_kind,
        &app_state.config.superadmin_identifier,
        &superadmin_hash,
    )
    .await?;

    let app = app::build_app(app_state);
    app::serve(app).await
}
