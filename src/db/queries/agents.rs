use rusqlite::{params_from_iter, Connection};
use tracing::debug;

use crate::models::{SalesAgent, TerritoryPath};
use crate::services::scope::TerritoryScope;

/// Active sales-force agents whose home sto is inside the scope.
pub fn list_active(conn: &Connection, scope: &TerritoryScope) -> rusqlite::Result<Vec<SalesAgent>> {
    let (predicate, values) = scope.sql_predicate("tr");
    let sql = format!(
        "SELECT a.agent_code, a.agent_name, tr.regional, tr.branch, tr.wok, tr.sto
         FROM sales_agents a
         JOIN territories tr ON tr.sto = a.sto
         WHERE a.active = 1 AND {}
         ORDER BY a.agent_code",
        predicate
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            Ok(SalesAgent {
                agent_code: row.get(0)?,
                agent_name: row.get(1)?,
                territory: TerritoryPath {
                    regional: row.get(2)?,
                    branch: row.get(3)?,
                    wok: row.get(4)?,
                    sto: row.get(5)?,
                },
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = rows.len(), "Loaded sales agents");
    Ok(rows)
}
