//! SQLite price cache adapter.
//!
//! One table per ticker, `(Date TEXT, Price REAL)`. Table names come from
//! [`Ticker::storage_key`] and never from user input.

use crate::domain::asset::Ticker;
use crate::domain::error::CryptochartError;
use crate::domain::price_series::{DateRange, PricePoint, PriceSeries};
use crate::domain::settings::CacheSettings;
use crate::ports::cache_port::CachePort;
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use tracing::debug;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn db_err(e: r2d2::Error) -> CryptochartError {
    CryptochartError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> CryptochartError {
    CryptochartError::DatabaseQuery {
        reason: e.to_string(),
    }
}

/// Quoted table identifier for a ticker.
fn table_name(ticker: Ticker) -> String {
    format!("\"{}\"", ticker.storage_key())
}

/// Parses a stored date. Only the leading `YYYY-MM-DD` is significant, so
/// rows written with a time component still read back.
fn parse_stored_date(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    let head = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
}

fn create_table(conn: &Connection, ticker: Ticker) -> Result<(), CryptochartError> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {} (
            Date TEXT NOT NULL,
            Price REAL NOT NULL
        );",
        table_name(ticker)
    ))
    .map_err(query_err)
}

fn table_exists(conn: &Connection, ticker: Ticker) -> Result<bool, CryptochartError> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![ticker.storage_key()],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(query_err)
}

impl SqliteAdapter {
    pub fn from_settings(settings: &CacheSettings) -> Result<Self, CryptochartError> {
        if let Some(parent) = settings.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(&settings.path);
        let pool = Pool::builder()
            .max_size(settings.pool_size)
            .build(manager)
            .map_err(db_err)?;

        debug!(path = %settings.path.display(), "opened price cache");
        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, CryptochartError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).map_err(db_err)?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, CryptochartError> {
        self.pool.get().map_err(db_err)
    }
}

impl CachePort for SqliteAdapter {
    fn ensure_table(&self, ticker: Ticker) -> Result<(), CryptochartError> {
        let conn = self.conn()?;
        create_table(&conn, ticker)
    }

    fn replace_series(
        &self,
        ticker: Ticker,
        series: &PriceSeries,
    ) -> Result<(), CryptochartError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;

        create_table(&tx, ticker)?;
        tx.execute(&format!("DELETE FROM {}", table_name(ticker)), [])
            .map_err(query_err)?;
        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO {} (Date, Price) VALUES (?1, ?2)",
                    table_name(ticker)
                ))
                .map_err(query_err)?;
            for point in series.iter() {
                stmt.execute(params![point.date.format("%Y-%m-%d").to_string(), point.price])
                    .map_err(query_err)?;
            }
        }

        tx.commit().map_err(query_err)?;
        debug!(%ticker, rows = series.len(), "replaced cached series");
        Ok(())
    }

    fn latest_date(&self, ticker: Ticker) -> Result<Option<NaiveDate>, CryptochartError> {
        self.ensure_table(ticker)?;
        let conn = self.conn()?;

        let latest: Option<String> = conn
            .query_row(
                &format!("SELECT MAX(Date) FROM {}", table_name(ticker)),
                [],
                |row| row.get(0),
            )
            .map_err(query_err)?;

        latest
            .map(|s| {
                parse_stored_date(&s).map_err(|e| CryptochartError::Database {
                    reason: format!("bad date {s:?} in {ticker}: {e}"),
                })
            })
            .transpose()
    }

    fn read_series(
        &self,
        ticker: Ticker,
        range: Option<DateRange>,
    ) -> Result<PriceSeries, CryptochartError> {
        let conn = self.conn()?;
        if !table_exists(&conn, ticker)? {
            return Err(CryptochartError::UnknownAsset {
                ticker: ticker.to_string(),
            });
        }

        let mut stmt = conn
            .prepare(&format!(
                "SELECT Date, Price FROM {} ORDER BY Date ASC",
                table_name(ticker)
            ))
            .map_err(query_err)?;

        let rows = stmt
            .query_map([], |row| {
                let date_str: String = row.get(0)?;
                let date = parse_stored_date(&date_str).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(PricePoint {
                    date,
                    price: row.get(1)?,
                })
            })
            .map_err(query_err)?;

        let series = rows
            .collect::<Result<PriceSeries, _>>()
            .map_err(query_err)?;

        Ok(match range {
            Some(range) => series.filter_range(&range),
            None => series,
        })
    }

    fn data_range(
        &self,
        ticker: Ticker,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CryptochartError> {
        self.ensure_table(ticker)?;
        let conn = self.conn()?;

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(
                &format!(
                    "SELECT MIN(Date), MAX(Date), COUNT(*) FROM {}",
                    table_name(ticker)
                ),
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(query_err)?;

        match result {
            (Some(min_str), Some(max_str), count) if count > 0 => {
                let min = parse_stored_date(&min_str).map_err(|e| CryptochartError::Database {
                    reason: e.to_string(),
                })?;
                let max = parse_stored_date(&max_str).map_err(|e| CryptochartError::Database {
                    reason: e.to_string(),
                })?;
                Ok(Some((min, max, count as usize)))
            }
            _ => Ok(None),
        }
    }
}
