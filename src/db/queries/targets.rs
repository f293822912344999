use rusqlite::{params_from_iter, Connection};
use tracing::debug;

use crate::date_utils::Period;
use crate::models::{TargetRecord, TargetValues, TerritoryPath};
use crate::services::scope::TerritoryScope;

/// Sto-level targets of one month inside the scope.
pub fn list_for_period(
    conn: &Connection,
    period: Period,
    scope: &TerritoryScope,
) -> rusqlite::Result<Vec<TargetRecord>> {
    let (predicate, scope_values) = scope.sql_predicate("tr");
    let sql = format!(
        "SELECT t.periode, tr.regional, tr.branch, tr.wok, tr.sto,
                t.all_sales, t.demand, t.revenue,
                t.ps_grapari, t.ps_digital, t.ps_community, t.ps_agency
         FROM household_targets t
         JOIN territories tr ON tr.sto = t.sto
         WHERE t.periode = ? AND {}
         ORDER BY tr.sto",
        predicate
    );

    let mut values = vec![period.periode()];
    values.extend(scope_values);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            Ok(TargetRecord {
                periode: row.get(0)?,
                territory: TerritoryPath {
                    regional: row.get(1)?,
                    branch: row.get(2)?,
                    wok: row.get(3)?,
                    sto: row.get(4)?,
                },
                values: TargetValues {
                    all_sales: row.get(5)?,
                    demand: row.get(6)?,
                    revenue: row.get(7)?,
                    ps_grapari: row.get(8)?,
                    ps_digital: row.get(9)?,
                    ps_community: row.get(10)?,
                    ps_agency: row.get(11)?,
                },
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(periode = %period.periode(), count = rows.len(), "Loaded targets");
    Ok(rows)
}
