use chrono::NaiveDate;
use rusqlite::{params_from_iter, Connection};
use tracing::debug;

use crate::date_utils::parse_stamp;
use crate::models::{OdpGoLive, OdpPort, TerritoryPath};
use crate::services::scope::TerritoryScope;

/// Most recent inventory snapshot taken on or before `date` that holds rows
/// inside the scope.
pub fn latest_snapshot_date(
    conn: &Connection,
    date: NaiveDate,
    scope: &TerritoryScope,
) -> rusqlite::Result<Option<String>> {
    let (predicate, scope_values) = scope.sql_predicate("tr");
    let sql = format!(
        "SELECT MAX(p.snapshot_date)
         FROM odp_ports p
         JOIN territories tr ON tr.sto = p.sto
         WHERE p.snapshot_date <= ? AND {}",
        predicate
    );

    let mut values = vec![date.format("%Y-%m-%d").to_string()];
    values.extend(scope_values);

    conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))
}

/// Distribution points of one inventory snapshot inside the scope.
pub fn list_snapshot(
    conn: &Connection,
    snapshot_date: &str,
    scope: &TerritoryScope,
) -> rusqlite::Result<Vec<OdpPort>> {
    let (predicate, scope_values) = scope.sql_predicate("tr");
    let sql = format!(
        "SELECT p.odp_name, tr.regional, tr.branch, tr.wok, tr.sto,
                p.port_total, p.port_used, p.status
         FROM odp_ports p
         JOIN territories tr ON tr.sto = p.sto
         WHERE p.snapshot_date = ? AND {}
         ORDER BY p.odp_name",
        predicate
    );

    let mut values = vec![snapshot_date.to_string()];
    values.extend(scope_values);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            let status: Option<String> = row.get(7)?;
            Ok(OdpPort {
                odp_name: row.get(0)?,
                territory: TerritoryPath {
                    regional: row.get(1)?,
                    branch: row.get(2)?,
                    wok: row.get(3)?,
                    sto: row.get(4)?,
                },
                port_total: row.get(5)?,
                port_used: row.get(6)?,
                status: status.and_then(|s| s.parse().ok()),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(snapshot_date, count = rows.len(), "Loaded port snapshot");
    Ok(rows)
}

/// Go-live registry entries inside the scope.
pub fn list_golive(conn: &Connection, scope: &TerritoryScope) -> rusqlite::Result<Vec<OdpGoLive>> {
    let (predicate, values) = scope.sql_predicate("tr");
    let sql = format!(
        "SELECT g.odp_name, tr.regional, tr.branch, tr.wok, tr.sto,
                g.golive_date, g.program_year, g.port_capacity
         FROM odp_golive g
         JOIN territories tr ON tr.sto = g.sto
         WHERE {}
         ORDER BY g.odp_name",
        predicate
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            let golive: Option<String> = row.get(5)?;
            Ok(OdpGoLive {
                odp_name: row.get(0)?,
                territory: TerritoryPath {
                    regional: row.get(1)?,
                    branch: row.get(2)?,
                    wok: row.get(3)?,
                    sto: row.get(4)?,
                },
                golive_date: golive.as_deref().and_then(parse_stamp),
                program_year: row.get(6)?,
                port_capacity: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = rows.len(), "Loaded ODP go-live registry");
    Ok(rows)
}
