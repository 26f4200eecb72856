//! Database schema migrations.
//!
//! A `_migrations` version table tracks what has been applied; anything
//! newer runs in order on open. The SQL batches themselves are idempotent
//! (CREATE IF NOT EXISTS) so a fresh database and a current one converge.

use super::Error;
use tokio_rusqlite::{Connection, params};

/// Ordered migration list: (version, SQL batch).
const MIGRATIONS: &[(i64, &str)] = &[
    (1, include_str!("../../migrations/001_cache_entries.sql")),
    (2, include_str!("../../migrations/002_limiter_state.sql")),
];

/// Apply any migrations newer than the recorded version.
///
/// # Errors
///
/// Returns [`Error::Database`] if a migration batch fails to execute.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(Error::from)?;

        let current: i64 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| {
                row.get(0)
            })
            .map_err(Error::from)?;

        for (version, sql) in MIGRATIONS {
            if *version > current {
                conn.execute_batch(sql)?;
                conn.execute(
                    "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                    params![version, chrono::Utc::now().to_rfc3339()],
                )
                .map_err(Error::from)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
