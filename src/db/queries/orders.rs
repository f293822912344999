use std::collections::HashMap;

use chrono::Duration;
use rusqlite::{params_from_iter, Connection};
use tracing::{debug, warn};

use crate::date_utils::{parse_stamp, Period, Window};
use crate::db::shards::{table_exists, table_name, SALES_DETAIL};
use crate::models::{FunnelStage, OrderRecord, TerritoryPath};
use crate::services::scope::TerritoryScope;

const ORDER_COLUMNS: &str = "order_id, service_id, stage, channel, sales_agent,
    registered_at, provision_start_at, provision_completed_at,
    fallout_category, fallout_subcategory,
    regional, branch, wok, sto, odp_name, provisioning_days";

/// Orders registered inside `window` and located in the scope, read from each
/// month's `sales_detail` table.
pub fn list_orders(
    conn: &Connection,
    window: &Window,
    scope: &TerritoryScope,
) -> rusqlite::Result<Vec<OrderRecord>> {
    let (predicate, scope_values) = scope.sql_predicate("");
    let mut orders = Vec::new();

    for (period, slice) in window.months() {
        let table = table_name(SALES_DETAIL, period);
        let mut values = vec![slice.start_str(), slice.end_str()];
        values.extend(scope_values.iter().cloned());

        let before = orders.len();
        orders.extend(select_orders(conn, &table, &predicate, &values)?);
        debug!(table = %table, count = orders.len() - before, "Loaded orders");
    }

    Ok(orders)
}

/// Orders in the scope whose provisioning completed inside `ps_window`,
/// registered anywhere in `lookback`.
///
/// Tables for months before the start of `ps_window`'s previous month are
/// optional: a missing one is skipped.
pub fn list_completed(
    conn: &Connection,
    lookback: &Window,
    ps_window: &Window,
    scope: &TerritoryScope,
) -> rusqlite::Result<Vec<OrderRecord>> {
    let (predicate, scope_values) = scope.sql_predicate("");
    let predicate = format!(
        "substr(provision_completed_at, 1, 10) BETWEEN ? AND ? AND {}",
        predicate
    );
    let mut orders = Vec::new();

    for (period, slice, table) in registration_tables(conn, lookback, ps_window)? {
        let mut values = vec![
            slice.start_str(),
            slice.end_str(),
            ps_window.start_str(),
            ps_window.end_str(),
        ];
        values.extend(scope_values.iter().cloned());

        let before = orders.len();
        orders.extend(select_orders(conn, &table, &predicate, &values)?);
        debug!(%period, count = orders.len() - before, "Loaded completed orders");
    }

    Ok(orders)
}

/// PS count per sales agent for orders completed inside `ps_window` and
/// registered anywhere in `lookback`.
pub fn ps_by_agent(
    conn: &Connection,
    lookback: &Window,
    ps_window: &Window,
    regional: &str,
) -> rusqlite::Result<HashMap<String, i64>> {
    let mut counts: HashMap<String, i64> = HashMap::new();

    for (period, slice, table) in registration_tables(conn, lookback, ps_window)? {
        let sql = format!(
            "SELECT sales_agent, COUNT(*)
             FROM {}
             WHERE sales_agent IS NOT NULL
               AND UPPER(stage) IN ('PS', 'COMPLETED')
               AND substr(registered_at, 1, 10) BETWEEN ? AND ?
               AND substr(provision_completed_at, 1, 10) BETWEEN ? AND ?
               AND regional = ?
             GROUP BY sales_agent",
            table
        );

        let values = [
            slice.start_str(),
            slice.end_str(),
            ps_window.start_str(),
            ps_window.end_str(),
            regional.to_string(),
        ];

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (agent, ps) in rows {
            *counts.entry(agent).or_insert(0) += ps;
        }
        debug!(%period, agents = counts.len(), "Counted PS per agent");
    }

    Ok(counts)
}

/// Monthly slices of `lookback` paired with their order table. Months from
/// the one before `ps_window` onward are always returned, so a missing table
/// there still fails the query. Earlier months are dropped when absent.
fn registration_tables(
    conn: &Connection,
    lookback: &Window,
    ps_window: &Window,
) -> rusqlite::Result<Vec<(Period, Window, String)>> {
    let required_from = Period::of(ps_window.start - Duration::days(1));
    let mut tables = Vec::new();

    for (period, slice) in lookback.months() {
        let table = table_name(SALES_DETAIL, period);
        if period < required_from && !table_exists(conn, &table)? {
            debug!(table = %table, "Skipping absent order table");
            continue;
        }
        tables.push((period, slice, table));
    }

    Ok(tables)
}

/// Rows of one order table matching `registered_at BETWEEN ? AND ?` plus
/// `predicate`, with unparseable rows dropped.
fn select_orders(
    conn: &Connection,
    table: &str,
    predicate: &str,
    values: &[String],
) -> rusqlite::Result<Vec<OrderRecord>> {
    let sql = format!(
        "SELECT {}
         FROM {}
         WHERE substr(registered_at, 1, 10) BETWEEN ? AND ? AND {}",
        ORDER_COLUMNS, table, predicate
    );

    let mut stmt = conn.prepare(&sql)?;
    let raw = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            Ok(RawOrder {
                order_id: row.get(0)?,
                service_id: row.get(1)?,
                stage: row.get(2)?,
                channel: row.get(3)?,
                sales_agent: row.get(4)?,
                registered_at: row.get(5)?,
                provision_start_at: row.get(6)?,
                provision_completed_at: row.get(7)?,
                fallout_category: row.get(8)?,
                fallout_subcategory: row.get(9)?,
                territory: TerritoryPath {
                    regional: row.get(10)?,
                    branch: row.get(11)?,
                    wok: row.get(12)?,
                    sto: row.get(13)?,
                },
                odp_name: row.get(14)?,
                provisioning_days: row.get(15)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(raw.into_iter().filter_map(RawOrder::into_record).collect())
}

struct RawOrder {
    order_id: String,
    service_id: String,
    stage: String,
    channel: Option<String>,
    sales_agent: Option<String>,
    registered_at: String,
    provision_start_at: Option<String>,
    provision_completed_at: Option<String>,
    fallout_category: Option<String>,
    fallout_subcategory: Option<String>,
    territory: TerritoryPath,
    odp_name: Option<String>,
    provisioning_days: Option<f64>,
}

impl RawOrder {
    fn into_record(self) -> Option<OrderRecord> {
        let Some(registered_at) = parse_stamp(&self.registered_at) else {
            warn!(order_id = %self.order_id, value = %self.registered_at, "Unparseable registration date");
            return None;
        };
        Some(OrderRecord {
            stage: self.stage.parse().unwrap_or(FunnelStage::Unknown),
            channel: self.channel.unwrap_or_default(),
            registered_at,
            provision_start_at: self.provision_start_at.as_deref().and_then(parse_stamp),
            provision_completed_at: self.provision_completed_at.as_deref().and_then(parse_stamp),
            order_id: self.order_id,
            service_id: self.service_id,
            sales_agent: self.sales_agent,
            fallout_category: self.fallout_category,
            fallout_subcategory: self.fallout_subcategory,
            territory: self.territory,
            odp_name: self.odp_name,
            provisioning_days: self.provisioning_days,
        })
    }
}
