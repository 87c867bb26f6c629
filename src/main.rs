use std::net::{Ipv4Addr, SocketAddr};

use nestar_server::{
    config::AppConfig,
    database::client::{Database, DbConfig},
    init,
    middleware::{error::AppError, mw_ctx},
    utils::logging,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    logging::init("nestar-server");

    let db = Database::connect(DbConfig {
        url: &config.db_url,
        database: &config.db_database,
        namespace: &config.db_namespace,
        password: config.db_password.as_deref(),
        username: config.db_username.as_deref(),
    })
    .await?;

    init::run_migrations(&db).await?;

    let ctx_state = mw_ctx::create_ctx_state(db, &config);
    init::create_default_admin(&ctx_state, &config).await;

    let routes_all = init::main_router(&ctx_state);

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.server_port));
    info!("->> LISTENING on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Generic {
            description: e.to_string(),
        })?;

    axum::serve(listener, routes_all.into_make_service())
        .await
        .map_err(|e| AppError::Generic {
            description: e.to_string(),
        })?;

    Ok(())
}
