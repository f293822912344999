use rusqlite::Connection;

use super::at;
use crate::date_utils::{DateWindows, Window};
use crate::db::queries::{ports, targets};
use crate::models::kpi::{DemandsRow, StatusBreakdown, StatusBucket};
use crate::models::{OdpGoLive, OdpPort, PortStatus};
use crate::services::achievement::{attainment, percent_str, trend_i64};
use crate::services::aggregator::tally;
use crate::services::scope::TerritoryScope;
use crate::services::targets::join_targets;

#[derive(Debug, Clone, Default)]
struct Capacity {
    odp_total: i64,
    port_total: i64,
    port_used: i64,
    status: StatusBreakdown,
}

impl StatusBreakdown {
    fn bucket_mut(&mut self, status: PortStatus) -> &mut StatusBucket {
        match status {
            PortStatus::Black => &mut self.black,
            PortStatus::Red => &mut self.red,
            PortStatus::Yellow => &mut self.yellow,
            PortStatus::Green => &mut self.green,
        }
    }

    /// Points with no recognised status count toward the totals only.
    fn add(&mut self, odp: &OdpPort) {
        if let Some(status) = odp.status {
            let bucket = self.bucket_mut(status);
            bucket.odp += 1;
            bucket.port_total += odp.port_total;
            bucket.port_used += odp.port_used;
        }
    }

    fn with_occupancy(mut self) -> Self {
        for bucket in [&mut self.black, &mut self.red, &mut self.yellow, &mut self.green] {
            bucket.occupancy = percent_str(bucket.port_used as f64, bucket.port_total as f64);
        }
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Deployment {
    mtd: i64,
    m1: i64,
    yoy: i64,
    odp_mtd: i64,
}

fn live_in(odp: &OdpGoLive, window: &Window) -> bool {
    odp.golive_date.is_some_and(|d| window.contains(d))
}

pub fn build(
    conn: &Connection,
    windows: &DateWindows,
    scope: &TerritoryScope,
) -> rusqlite::Result<Vec<DemandsRow>> {
    let snapshot = match ports::latest_snapshot_date(conn, windows.reference, scope)? {
        Some(date) => ports::list_snapshot(conn, &date, scope)?,
        None => {
            tracing::debug!(reference = %windows.reference, "No port snapshot on or before reference date");
            Vec::new()
        }
    };
    let capacity = tally(scope, &snapshot, |cap: &mut Capacity, odp| {
        cap.odp_total += 1;
        cap.port_total += odp.port_total;
        cap.port_used += odp.port_used;
        cap.status.add(odp);
    });

    let registry = ports::list_golive(conn, scope)?;
    let deployed = tally(scope, &registry, |dep: &mut Deployment, odp| {
        if live_in(odp, &windows.current) {
            dep.mtd += odp.port_capacity;
            dep.odp_mtd += 1;
        }
        if live_in(odp, &windows.previous_month) {
            dep.m1 += odp.port_capacity;
        }
        if live_in(odp, &windows.previous_year) {
            dep.yoy += odp.port_capacity;
        }
    });

    let target_rows = targets::list_for_period(conn, windows.period(), scope)?;
    let joined = join_targets(scope, &target_rows);

    let rows = capacity
        .into_rows()
        .into_iter()
        .map(|(node, cap)| {
            let dep = at(&deployed, &node.name);
            let demand = joined
                .get(&node.name)
                .copied()
                .flatten()
                .and_then(|t| t.demand);
            DemandsRow {
                odp_total: cap.odp_total,
                port_total: cap.port_total,
                port_used: cap.port_used,
                port_available: cap.port_total - cap.port_used,
                occupancy: percent_str(cap.port_used as f64, cap.port_total as f64),
                status: cap.status.with_occupancy(),
                odp_golive_mtd: dep.odp_mtd,
                deployed_ports: trend_i64(dep.mtd, dep.m1, dep.yoy),
                demand_attainment: attainment(dep.mtd as f64, demand, windows),
                node,
            }
        })
        .collect();

    Ok(rows)
}
