use std::net::SocketAddr;

use anyhow::Context;

use estate_api::{
    auth::bootstrap::init_auth,
    config::AppConfig,
    db::{connection, dao::DaoContext},
    logging::init_tracing,
    routes::app,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        eprintln!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("failed to load config")?;
    init_tracing(&cfg.logging);

    let db_cfg = cfg
        .database
        .as_ref()
        .context("database config is required (APP__DATABASE__URL)")?;
    let db = connection::connect(db_cfg).await?;

    let auth_cfg = cfg
        .auth
        .as_ref()
        .context("auth config is required (APP__AUTH__JWT_SECRET)")?;
    let auth = init_auth(auth_cfg, &DaoContext::new(&db)).await?;

    let addr: SocketAddr = format!("{}:{}", cfg.general.host, cfg.general.port)
        .parse()
        .context("invalid host/port")?;
    let state = AppState::new(cfg, db, auth);
    let app = app(state);

    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
