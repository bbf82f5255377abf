//! # SQLite database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are maintained by simple functions (rather than stateful structs) that
//! accept a `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or
//! create an atomic transaction as the need arises and call through to the functions without any
//! other changes.
use std::{env, str::FromStr, time::Duration};

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod admins;
pub mod fulfilments;
pub mod products;

const SQLITE_DB_URL: &str = "sqlite://data/warung_store.db";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub fn db_url() -> String {
    let result = env::var("WARUNG_DATABASE_URL").unwrap_or_else(|_| {
        info!("WARUNG_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    // Write-ahead logging keeps reads from blocking the single writer, and the busy timeout lets
    // a second writer queue behind a fulfilment transaction instead of erroring out.
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    create_schema(&pool).await?;
    Ok(pool)
}

// Statements are executed one at a time; the SQLite driver does not accept multi-statement
// strings in prepared queries.
const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS products (
        code        TEXT PRIMARY KEY NOT NULL,
        name        TEXT NOT NULL,
        price       INTEGER NOT NULL CHECK (price > 0),
        description TEXT NOT NULL DEFAULT '',
        stock       INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
        sold        INTEGER NOT NULL DEFAULT 0 CHECK (sold >= 0),
        created_at  TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at  TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );"#,
    r#"
    CREATE TABLE IF NOT EXISTS stock_items (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        product_code TEXT NOT NULL REFERENCES products (code),
        credential   TEXT NOT NULL,
        created_at   TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );"#,
    r#"CREATE INDEX IF NOT EXISTS stock_items_product ON stock_items (product_code, id);"#,
    r#"
    CREATE TABLE IF NOT EXISTS admins (
        buyer_id   TEXT PRIMARY KEY NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );"#,
    r#"
    CREATE TABLE IF NOT EXISTS fulfilments (
        reference    TEXT PRIMARY KEY NOT NULL,
        buyer_id     TEXT NOT NULL,
        product_code TEXT NOT NULL,
        quantity     INTEGER NOT NULL CHECK (quantity > 0),
        delivered    BOOLEAN NOT NULL DEFAULT 0,
        created_at   TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );"#,
];

async fn create_schema(pool: &SqlitePool) -> Result<(), SqlxError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
