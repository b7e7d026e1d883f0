use chrono::{DateTime, FixedOffset, TimeZone};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::pricing::compute_price;
use crate::schedule::pickup_for;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("entry {id} has an unreadable timestamp {value:?}: {source}")]
    Timestamp {
        id: i64,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A drop-off that has been validated but not yet stored.
///
/// Price and pickup are derived here and nowhere else, so a stored entry
/// always satisfies `price == weight_lbs * RATE_PER_POUND`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    phone: String,
    customer_name: String,
    weight_lbs: f64,
    price: f64,
    dropoff_at: DateTime<FixedOffset>,
    pickup_at: DateTime<FixedOffset>,
}

impl NewEntry {
    /// `dropoff_at` must carry the store's zone: the pickup is scheduled on
    /// that zone's wall clock and may end up with a different UTC offset
    /// than the drop-off.
    pub fn new<Tz: TimeZone>(
        phone: impl Into<String>,
        customer_name: impl Into<String>,
        weight_lbs: f64,
        dropoff_at: DateTime<Tz>,
    ) -> Self {
        let pickup_at = pickup_for(&dropoff_at);
        Self {
            phone: phone.into(),
            customer_name: customer_name.into(),
            weight_lbs,
            price: compute_price(weight_lbs),
            dropoff_at: dropoff_at.fixed_offset(),
            pickup_at: pickup_at.fixed_offset(),
        }
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn weight_lbs(&self) -> f64 {
        self.weight_lbs
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn dropoff_at(&self) -> DateTime<FixedOffset> {
        self.dropoff_at
    }

    pub fn pickup_at(&self) -> DateTime<FixedOffset> {
        self.pickup_at
    }

    pub fn into_entry(self, id: i64) -> Entry {
        Entry {
            id,
            phone: self.phone,
            customer_name: self.customer_name,
            weight_lbs: self.weight_lbs,
            price: self.price,
            dropoff_at: self.dropoff_at,
            pickup_at: self.pickup_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: i64,
    pub phone: String,
    pub customer_name: String,
    pub weight_lbs: f64,
    pub price: f64,
    pub dropoff_at: DateTime<FixedOffset>,
    pub pickup_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerSummary {
    pub visit_count: i64,
    pub total_weight: f64,
    pub total_price: f64,
    pub last_known_name: Option<String>,
}

/// Append-only store of drop-offs.
pub trait Ledger {
    fn append(&self, entry: &NewEntry) -> Result<i64, LedgerError>;

    /// Name on the newest entry for `phone`, `None` for a new customer.
    fn lookup_latest_name(&self, phone: &str) -> Result<Option<String>, LedgerError>;

    /// Totals over every entry for `phone`; all zeros for a new customer.
    fn summarize(&self, phone: &str) -> Result<CustomerSummary, LedgerError>;
}

/// SQLite ledger. Holds only the file path; every call opens its own
/// connection and drops it before returning.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    path: PathBuf,
}

impl SqliteLedger {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let ledger = Self { path };
        init_db(&ledger.connect()?)?;
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry(&self, id: i64) -> Result<Option<Entry>, LedgerError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, phone, customer_name, weight_lbs, price, dropoff_at, pickup_at
             FROM entries WHERE id = ?1",
        )?;
        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => Ok(Some(entry_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn connect(&self) -> Result<Connection, LedgerError> {
        Ok(Connection::open(&self.path)?)
    }
}

impl Ledger for SqliteLedger {
    fn append(&self, entry: &NewEntry) -> Result<i64, LedgerError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO entries (phone, customer_name, weight_lbs, price, dropoff_at, pickup_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.phone(),
                entry.customer_name(),
                entry.weight_lbs(),
                entry.price(),
                entry.dropoff_at().to_rfc3339(),
                entry.pickup_at().to_rfc3339(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    fn lookup_latest_name(&self, phone: &str) -> Result<Option<String>, LedgerError> {
        let conn = self.connect()?;
        latest_name(&conn, phone)
    }

    fn summarize(&self, phone: &str) -> Result<CustomerSummary, LedgerError> {
        let conn = self.connect()?;
        let (visit_count, total_weight, total_price) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(weight_lbs), 0.0), COALESCE(SUM(price), 0.0)
             FROM entries WHERE phone = ?1",
            params![phone],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            },
        )?;
        Ok(CustomerSummary {
            visit_count,
            total_weight,
            total_price,
            last_known_name: latest_name(&conn, phone)?,
        })
    }
}

fn init_db(conn: &Connection) -> Result<(), LedgerError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            phone TEXT NOT NULL,
            customer_name TEXT NOT NULL,
            weight_lbs REAL NOT NULL,
            price REAL NOT NULL,
            dropoff_at TEXT NOT NULL,
            pickup_at TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_phone ON entries (phone, id)",
        [],
    )?;
    Ok(())
}

fn latest_name(conn: &Connection, phone: &str) -> Result<Option<String>, LedgerError> {
    let name = conn
        .query_row(
            "SELECT customer_name FROM entries WHERE phone = ?1 ORDER BY id DESC LIMIT 1",
            params![phone],
            |row| row.get(0),
        )
        .optional()?;
    Ok(name)
}

fn entry_from_row(row: &Row<'_>) -> Result<Entry, LedgerError> {
    let id: i64 = row.get(0)?;
    let dropoff_at: String = row.get(5)?;
    let pickup_at: String = row.get(6)?;
    Ok(Entry {
        id,
        phone: row.get(1)?,
        customer_name: row.get(2)?,
        weight_lbs: row.get(3)?,
        price: row.get(4)?,
        dropoff_at: parse_timestamp(id, dropoff_at)?,
        pickup_at: parse_timestamp(id, pickup_at)?,
    })
}

fn parse_timestamp(id: i64, value: String) -> Result<DateTime<FixedOffset>, LedgerError> {
    DateTime::parse_from_rfc3339(&value)
        .map_err(|source| LedgerError::Timestamp { id, value, source })
}
