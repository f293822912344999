//! Per-month warehouse tables.
//!
//! Order details and summary snapshots are split into one table per calendar
//! month, e.g. `sales_detail_2025_03`. Queries address them through
//! [`table_name`] so the sharding scheme stays in one place.

use rusqlite::Connection;

use crate::date_utils::Period;

pub const SALES_DETAIL: &str = "sales_detail";
pub const SUMMARY: &str = "summary";

pub fn table_name(prefix: &str, period: Period) -> String {
    format!("{}_{:04}_{:02}", prefix, period.year, period.month)
}

pub fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
        [name],
        |row| row.get(0),
    )
}

/// Create the order-detail and summary tables for one month if missing.
///
/// The upstream loader owns these tables; this exists for seeding local and
/// test databases with the same layout.
pub fn create_period_tables(conn: &Connection, period: Period) -> rusqlite::Result<()> {
    let sales = table_name(SALES_DETAIL, period);
    let summary = table_name(SUMMARY, period);
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {sales} (
            order_id TEXT PRIMARY KEY,
            service_id TEXT NOT NULL,
            stage TEXT NOT NULL,
            channel TEXT NOT NULL DEFAULT '',
            sales_agent TEXT,
            registered_at TEXT NOT NULL,
            provision_start_at TEXT,
            provision_completed_at TEXT,
            fallout_category TEXT,
            fallout_subcategory TEXT,
            regional TEXT NOT NULL,
            branch TEXT NOT NULL,
            wok TEXT NOT NULL,
            sto TEXT NOT NULL,
            odp_name TEXT,
            provisioning_days REAL
        );
        CREATE INDEX IF NOT EXISTS idx_{sales}_territory ON {sales}(regional, branch, wok);
        CREATE INDEX IF NOT EXISTS idx_{sales}_service ON {sales}(service_id);

        CREATE TABLE IF NOT EXISTS {summary} (
            snapshot_date TEXT NOT NULL,
            regional TEXT NOT NULL,
            branch TEXT NOT NULL,
            wok TEXT NOT NULL,
            sto TEXT NOT NULL,
            channel TEXT NOT NULL,
            package TEXT NOT NULL,
            io INTEGER NOT NULL DEFAULT 0,
            re INTEGER NOT NULL DEFAULT 0,
            ps INTEGER NOT NULL DEFAULT 0,
            revenue REAL NOT NULL DEFAULT 0,
            subscribers INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (snapshot_date, sto, channel, package)
        );
        CREATE INDEX IF NOT EXISTS idx_{summary}_territory ON {summary}(regional, branch, wok);"
    ))?;
    tracing::debug!(%period, "Ensured period tables");
    Ok(())
}
