use std::sync::Arc;

use actix_web::HttpServer;
use anyhow::Context;
use dotenvy::dotenv;
use log::{info, warn};

use ak_api::app::{build_services_with_system_clock, create_app};
use ak_api::config::{Config, StorageBackend};
use ak_core::repositories::{
    AccountRepository, InMemoryAccountRepository, InMemoryRefreshTokenRepository,
    InMemoryRoleRepository, RefreshTokenRepository, RoleRepository,
};
use ak_infra::{
    DatabasePool, MySqlAccountRepository, MySqlRefreshTokenRepository, MySqlRoleRepository,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env().map_err(anyhow::Error::msg)?;
    env_logger::init_from_env(config.logger_env());

    info!("Starting Authkeep API Server ({})", config.app.environment);

    match config.storage {
        StorageBackend::MySql => {
            let pool = DatabasePool::new(&config.app.database)
                .await
                .context("Failed to connect to the database")?;
            pool.run_migrations()
                .await
                .context("Failed to apply the schema")?;
            info!("{}", pool.get_statistics());

            let db = pool.get_pool().clone();
            serve(
                config,
                Arc::new(MySqlAccountRepository::new(db.clone())),
                Arc::new(MySqlRoleRepository::new(db.clone())),
                Arc::new(MySqlRefreshTokenRepository::new(db)),
            )
            .await?;

            pool.close().await;
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; accounts and sessions are lost on restart");
            serve(
                config,
                Arc::new(InMemoryAccountRepository::new()),
                Arc::new(InMemoryRoleRepository::with_default_roles()),
                Arc::new(InMemoryRefreshTokenRepository::new()),
            )
            .await?;
        }
    }

    Ok(())
}

async fn serve<U, Ro, R>(
    config: Config,
    accounts: Arc<U>,
    roles: Arc<Ro>,
    tokens: Arc<R>,
) -> anyhow::Result<()>
where
    U: AccountRepository + 'static,
    Ro: RoleRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    if config.app.auth.jwt.is_using_default_secret() {
        warn!("JWT_SECRET is not set; using the development secret");
    }

    let services = build_services_with_system_clock(&config.app, accounts, roles, tokens)
        .context("Failed to build services")?;

    let sweep_task = services.sweeper.clone().start_background_task();

    let bind_address = config.app.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let state = services.state.clone();
    let app_config = config.app.clone();
    let mut server = HttpServer::new(move || create_app(state.clone(), &app_config));
    if config.app.server.workers > 0 {
        server = server.workers(config.app.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    if let Some(task) = sweep_task {
        task.abort();
    }
    info!("Server stopped");

    Ok(())
}
