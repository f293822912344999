use rusqlite::Connection;

use crate::date_utils::DateWindows;
use crate::db::queries::{agents, orders};
use crate::models::kpi::{SfClassCount, SfClassRow};
use crate::services::achievement::{divide, percent_str, round2};
use crate::services::aggregator::tally;
use crate::services::categorizer::{SfClass, SfClassTally};
use crate::services::scope::TerritoryScope;

/// Agents are counted under their home sto whether or not they sold anything
/// this month, so every active agent lands in exactly one class.
pub fn build(
    conn: &Connection,
    windows: &DateWindows,
    scope: &TerritoryScope,
) -> rusqlite::Result<Vec<SfClassRow>> {
    let roster = agents::list_active(conn, scope)?;
    let ps = orders::ps_by_agent(conn, &windows.ps_lookback(), &windows.current, &scope.regional)?;

    let classes = tally(scope, &roster, |counts: &mut SfClassTally, agent| {
        counts.add_agent(ps.get(&agent.agent_code).copied().unwrap_or(0));
    });

    let rows = classes
        .into_rows()
        .into_iter()
        .map(|(node, counts)| {
            let agents = counts.agents();
            let productive = counts.productive();
            SfClassRow {
                agents,
                classes: SfClass::all()
                    .iter()
                    .map(|&class| SfClassCount {
                        class,
                        agents: counts.count(class),
                        share: percent_str(counts.count(class) as f64, agents as f64),
                    })
                    .collect(),
                productive,
                productivity: percent_str(productive as f64, agents as f64),
                ps_mtd: counts.ps,
                ps_per_agent: divide(counts.ps as f64, Some(agents as f64)).map(round2),
                node,
            }
        })
        .collect();

    Ok(rows)
}
