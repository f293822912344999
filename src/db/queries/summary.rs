use rusqlite::{params_from_iter, Connection};
use tracing::debug;

use crate::date_utils::Window;
use crate::db::shards::{table_name, SUMMARY};
use crate::models::summary::ALL;
use crate::models::{SummaryFacts, SummaryRow, SummarySlice, TerritoryPath};
use crate::services::scope::TerritoryScope;

/// Sum summary snapshot facts per sto over `window`.
///
/// [`SummarySlice::Total`] reads only the all-channel, all-package roll-up
/// rows; [`SummarySlice::ByChannel`] reads the per-channel rows of the
/// all-package roll-up and keeps one row per sto and channel.
pub fn sum_by_sto(
    conn: &Connection,
    window: &Window,
    scope: &TerritoryScope,
    slice: SummarySlice,
) -> rusqlite::Result<Vec<SummaryRow>> {
    let (predicate, scope_values) = scope.sql_predicate("");
    let (channel_select, slice_filter, group_by) = match slice {
        SummarySlice::Total => (
            format!("'{}'", ALL),
            "channel = 'ALL' AND package = 'ALL'",
            "regional, branch, wok, sto",
        ),
        SummarySlice::ByChannel => (
            "channel".to_string(),
            "channel <> 'ALL' AND package = 'ALL'",
            "regional, branch, wok, sto, channel",
        ),
    };

    let mut rows = Vec::new();
    for (period, month) in window.months() {
        let table = table_name(SUMMARY, period);
        let sql = format!(
            "SELECT regional, branch, wok, sto, {channel_select},
                    COALESCE(SUM(io), 0), COALESCE(SUM(re), 0), COALESCE(SUM(ps), 0),
                    COALESCE(SUM(revenue), 0.0), COALESCE(SUM(subscribers), 0)
             FROM {table}
             WHERE snapshot_date BETWEEN ? AND ? AND {slice_filter} AND {predicate}
             GROUP BY {group_by}"
        );

        let mut values = vec![month.start_str(), month.end_str()];
        values.extend(scope_values.iter().cloned());

        let mut stmt = conn.prepare(&sql)?;
        let found = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok(SummaryRow {
                    territory: TerritoryPath {
                        regional: row.get(0)?,
                        branch: row.get(1)?,
                        wok: row.get(2)?,
                        sto: row.get(3)?,
                    },
                    channel: row.get(4)?,
                    facts: SummaryFacts {
                        io: row.get(5)?,
                        re: row.get(6)?,
                        ps: row.get(7)?,
                        revenue: row.get(8)?,
                        subscribers: row.get(9)?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(table = %table, ?slice, count = found.len(), "Summed summary snapshot");
        rows.extend(found);
    }

    Ok(rows)
}
