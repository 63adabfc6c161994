//! Module-contributed schema migrations.
//!
//! Applied migrations are recorded in `_shelf_migrations`; running the same
//! set twice is a no-op.

use anyhow::Context;

use crate::Database;

const LEDGER_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS _shelf_migrations (
    module     TEXT NOT NULL,
    id         TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (module, id)
);
"#;

/// Migration definition for modules
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

impl Database {
    /// Apply every pending `(module, migration)` pair, each in its own
    /// transaction. Returns how many were applied.
    pub async fn run_migrations(&self, migrations: &[(String, Migration)]) -> anyhow::Result<usize> {
        sqlx::raw_sql(LEDGER_DDL)
            .execute(self.pool())
            .await
            .context("failed to create migration ledger")?;

        let mut applied = 0;
        for (module, migration) in migrations {
            let already: Option<(String,)> =
                sqlx::query_as("SELECT id FROM _shelf_migrations WHERE module = ? AND id = ?")
                    .bind(module)
                    .bind(migration.id)
                    .fetch_optional(self.pool())
                    .await
                    .context("failed to read migration ledger")?;

            if already.is_some() {
                tracing::debug!(module = %module, migration = migration.id, "migration already applied");
                continue;
            }

            let mut tx = self.pool().begin().await?;
            sqlx::raw_sql(migration.up)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("migration '{}/{}' failed", module, migration.id))?;
            sqlx::query("INSERT INTO _shelf_migrations (module, id) VALUES (?, ?)")
                .bind(module)
                .bind(migration.id)
                .execute(&mut *tx)
                .await
                .context("failed to record migration")?;
            tx.commit().await?;

            tracing::info!(module = %module, migration = migration.id, "migration applied");
            applied += 1;
        }

        Ok(applied)
    }
}
