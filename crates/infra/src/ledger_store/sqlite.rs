//! SQLite-backed ledger store.
//!
//! Every ledger table lives in one SQL table, `sheet_rows`, keyed by
//! `(sheet, position)`, with each row stored as a JSON object. This keeps the
//! sheet semantics of the original store: ordered rows of named cells, whole
//! table replacement, single-row append.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use super::r#trait::{LedgerStore, LedgerStoreError, SheetRow};

#[derive(Debug, Clone)]
pub struct SqliteLedgerStore {
    pool: SqlitePool,
}

impl SqliteLedgerStore {
    /// Connect to `url` (`sqlite::memory:`, `sqlite://path.db`, or a bare
    /// file path) and create the schema if missing.
    pub async fn connect(url: &str) -> Result<Self, LedgerStoreError> {
        let url = if url.starts_with("sqlite:") {
            url.to_string()
        } else {
            format!("sqlite://{url}")
        };

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| LedgerStoreError::Unavailable(format!("invalid sqlite url {url}: {e}")))?
            .create_if_missing(true);

        // An in-memory database exists per connection: keep exactly one alive for the pool's lifetime.
        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(4)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| LedgerStoreError::Unavailable(format!("failed to open {url}: {e}")))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> Result<(), LedgerStoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sheet_rows (
                sheet    TEXT    NOT NULL,
                position INTEGER NOT NULL,
                data     TEXT    NOT NULL,
                PRIMARY KEY (sheet, position)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }
}

fn unavailable(e: sqlx::Error) -> LedgerStoreError {
    LedgerStoreError::Unavailable(e.to_string())
}

fn rejected(table: &str, e: sqlx::Error) -> LedgerStoreError {
    LedgerStoreError::Rejected {
        table: table.to_string(),
        reason: e.to_string(),
    }
}

fn encode(row: &SheetRow) -> Result<String, LedgerStoreError> {
    serde_json::to_string(row).map_err(|e| LedgerStoreError::Codec(e.to_string()))
}

#[async_trait]
impl LedgerStore for SqliteLedgerStore {
    async fn read_all(&self, table: &str) -> Result<Vec<SheetRow>, LedgerStoreError> {
        let rows = sqlx::query("SELECT data FROM sheet_rows WHERE sheet = ? ORDER BY position")
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        rows.into_iter()
            .map(|row| {
                let data: String = row.try_get("data").map_err(unavailable)?;
                serde_json::from_str::<SheetRow>(&data)
                    .map_err(|e| LedgerStoreError::Codec(format!("{table}: {e}")))
            })
            .collect()
    }

    async fn write_all(&self, table: &str, rows: Vec<SheetRow>) -> Result<(), LedgerStoreError> {
        let encoded = rows.iter().map(encode).collect::<Result<Vec<_>, _>>()?;

        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        sqlx::query("DELETE FROM sheet_rows WHERE sheet = ?")
            .bind(table)
            .execute(&mut *tx)
            .await
            .map_err(|e| rejected(table, e))?;

        for (position, data) in encoded.iter().enumerate() {
            sqlx::query("INSERT INTO sheet_rows (sheet, position, data) VALUES (?, ?, ?)")
                .bind(table)
                .bind(position as i64)
                .bind(data)
                .execute(&mut *tx)
                .await
                .map_err(|e| rejected(table, e))?;
        }

        tx.commit().await.map_err(|e| rejected(table, e))?;
        Ok(())
    }

    async fn append_row(&self, table: &str, row: SheetRow) -> Result<(), LedgerStoreError> {
        let data = encode(&row)?;

        sqlx::query(
            r#"
            INSERT INTO sheet_rows (sheet, position, data)
            SELECT ?, COALESCE(MAX(position) + 1, 0), ?
            FROM sheet_rows
            WHERE sheet = ?
            "#,
        )
        .bind(table)
        .bind(data)
        .bind(table)
        .execute(&self.pool)
        .await
        .map_err(|e| rejected(table, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: serde_json::Value) -> SheetRow {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn rows_round_trip_in_order() {
        let store = SqliteLedgerStore::connect("sqlite::memory:").await.unwrap();

        store
            .write_all(
                "Inventory",
                vec![
                    row(json!({"ISBN": "b", "qty": 2})),
                    row(json!({"ISBN": "a", "qty": 1})),
                ],
            )
            .await
            .unwrap();
        store.append_row("Inventory", row(json!({"ISBN": "c", "qty": 3}))).await.unwrap();

        let rows = store.read_all("Inventory").await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r["ISBN"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(rows[2]["qty"], json!(3));
    }

    #[tokio::test]
    async fn write_all_only_touches_its_own_table() {
        let store = SqliteLedgerStore::connect("sqlite::memory:").await.unwrap();

        store.append_row("Transactions", row(json!({"Type": "IN"}))).await.unwrap();
        store.write_all("Inventory", vec![row(json!({"ISBN": "1"}))]).await.unwrap();
        store.write_all("Inventory", vec![]).await.unwrap();

        assert!(store.read_all("Inventory").await.unwrap().is_empty());
        assert_eq!(store.read_all("Transactions").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn in_memory_pool_never_recycles_its_connection() {
        let store = SqliteLedgerStore::connect("sqlite::memory:").await.unwrap();
        let options = store.pool().options();

        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);
    }

    #[tokio::test]
    async fn append_to_empty_table_starts_at_zero() {
        let store = SqliteLedgerStore::connect("sqlite::memory:").await.unwrap();
        store.append_row("Log", row(json!({"n": 1}))).await.unwrap();
        store.append_row("Log", row(json!({"n": 2}))).await.unwrap();

        let positions: Vec<i64> = sqlx::query("SELECT position FROM sheet_rows WHERE sheet = 'Log' ORDER BY position")
            .fetch_all(store.pool())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.get::<i64, _>("position"))
            .collect();
        assert_eq!(positions, vec![0, 1]);
    }
}
