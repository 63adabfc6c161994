//! shelf application library
//!
//! Application modules plus the bootstrap sequence shared by the
//! `shelf-app` binary and the `shelf` CLI.

use std::future::Future;

use anyhow::Context;
use shelf_db::Database;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod modules;

/// Build the registry with every application module bound to `db`.
pub fn registry(db: &Database) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, db);
    registry
}

/// Apply every pending module migration. Returns how many ran.
pub async fn migrate(registry: &ModuleRegistry, db: &Database) -> anyhow::Result<usize> {
    let migrations = registry.collect_migrations();
    db.run_migrations(&migrations)
        .await
        .context("failed to apply module migrations")
}

/// Connect, migrate, run modules and serve HTTP until `shutdown` resolves,
/// then stop modules and release the database.
pub async fn serve<F>(settings: Settings, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let db = Database::connect(&settings.database)
        .await
        .context("failed to open database")?;

    let result = run(&settings, &db, shutdown).await;

    db.close().await;
    result
}

async fn run<F>(settings: &Settings, db: &Database, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let registry = registry(db);
    let applied = migrate(&registry, db).await?;
    tracing::info!(applied, "migrations complete");

    let ctx = InitCtx { settings };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!(modules = registry.len(), "shelf bootstrap complete");

    let served = shelf_http::start_server(&registry, settings, db, shutdown).await;
    let stopped = registry.stop_all().await;

    served?;
    stopped
}
