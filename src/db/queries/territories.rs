use rusqlite::Connection;
use tracing::debug;

use crate::models::TerritoryPath;

/// Every sto of a region with its wok and branch, ordered top-down.
pub fn list_for_region(conn: &Connection, regional: &str) -> rusqlite::Result<Vec<TerritoryPath>> {
    let mut stmt = conn.prepare(
        "SELECT regional, branch, wok, sto
         FROM territories
         WHERE UPPER(regional) = UPPER(?)
         ORDER BY branch, wok, sto",
    )?;

    let rows = stmt
        .query_map([regional], |row| {
            Ok(TerritoryPath {
                regional: row.get(0)?,
                branch: row.get(1)?,
                wok: row.get(2)?,
                sto: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(regional, count = rows.len(), "Loaded territory hierarchy");
    Ok(rows)
}
