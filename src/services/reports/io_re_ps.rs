use std::collections::HashMap;

use rusqlite::Connection;

use super::{at, channel_target, channels_by_node, facts_by_node};
use crate::date_utils::{DateWindows, Window};
use crate::db::queries::{orders, ports, summary, targets};
use crate::models::kpi::{ChannelAttainment, IoRePsRow};
use crate::models::{OdpGoLive, SummarySlice};
use crate::services::achievement::{
    attainment, format_percent, growth, percent, percent_str, trend_i64,
};
use crate::services::aggregator::tally;
use crate::services::categorizer::{field_class, ChannelGroup, FieldClass};
use crate::services::scope::TerritoryScope;
use crate::services::targets::join_targets;

#[derive(Debug, Clone, Copy, Default)]
struct FieldCounts {
    greenfield: i64,
    brownfield: i64,
}

pub fn build(
    conn: &Connection,
    windows: &DateWindows,
    scope: &TerritoryScope,
) -> rusqlite::Result<Vec<IoRePsRow>> {
    let total = |window: &Window| summary::sum_by_sto(conn, window, scope, SummarySlice::Total);
    let mtd = facts_by_node(scope, &total(&windows.current)?);
    let m1 = facts_by_node(scope, &total(&windows.previous_month)?);
    let yoy = facts_by_node(scope, &total(&windows.previous_year)?);
    let ytd = facts_by_node(scope, &total(&windows.ytd)?);
    let ytd_prev = facts_by_node(scope, &total(&windows.previous_ytd)?);

    let by_channel = summary::sum_by_sto(conn, &windows.current, scope, SummarySlice::ByChannel)?;
    let channel_ps = channels_by_node(scope, &by_channel, |facts| facts.ps);

    let target_rows = targets::list_for_period(conn, windows.period(), scope)?;
    let joined = join_targets(scope, &target_rows);

    // ODPs may serve orders across sto boundaries, so look them up region-wide.
    let registry: HashMap<String, OdpGoLive> = ports::list_golive(conn, &scope.region_wide())?
        .into_iter()
        .map(|odp| (odp.odp_name.clone(), odp))
        .collect();
    let order_rows = orders::list_completed(conn, &windows.ps_lookback(), &windows.current, scope)?;
    let reference_year = windows.period().year;
    let fields = tally(scope, &order_rows, |counts: &mut FieldCounts, order| {
        let Some(ps_date) = order.ps_date() else {
            return;
        };
        if !windows.current.contains(ps_date) {
            return;
        }
        let Some(odp) = order.odp_name.as_ref().and_then(|name| registry.get(name)) else {
            return;
        };
        match field_class(odp.golive_date, odp.program_year, reference_year) {
            Some(FieldClass::Greenfield) => counts.greenfield += 1,
            Some(FieldClass::Brownfield) => counts.brownfield += 1,
            None => {}
        }
    });

    let rows = mtd
        .into_rows()
        .into_iter()
        .map(|(node, cur)| {
            let prev = at(&m1, &node.name);
            let last_year = at(&yoy, &node.name);
            let ytd_cur = at(&ytd, &node.name);
            let ytd_last = at(&ytd_prev, &node.name);
            let split = at(&channel_ps, &node.name);
            let target = joined.get(&node.name).copied().flatten();
            let field = at(&fields, &node.name);

            let channels = ChannelGroup::reported()
                .iter()
                .map(|&group| {
                    let actual = split.get(group);
                    let goal = channel_target(target.as_ref(), group);
                    ChannelAttainment {
                        channel: group,
                        actual,
                        target: goal,
                        achievement: format_percent(percent(actual as f64, goal)),
                    }
                })
                .collect();

            IoRePsRow {
                io: trend_i64(cur.io, prev.io, last_year.io),
                re: trend_i64(cur.re, prev.re, last_year.re),
                ps: trend_i64(cur.ps, prev.ps, last_year.ps),
                ps_ytd: ytd_cur.ps,
                ps_ytd_prev: ytd_last.ps,
                ps_ytd_growth: growth(ytd_cur.ps as f64, ytd_last.ps as f64),
                re_to_io: percent_str(cur.re as f64, cur.io as f64),
                ps_to_re: percent_str(cur.ps as f64, cur.re as f64),
                ps_attainment: attainment(
                    cur.ps as f64,
                    target.and_then(|t| t.all_sales),
                    windows,
                ),
                channels,
                greenfield: field.greenfield,
                brownfield: field.brownfield,
                node,
            }
        })
        .collect();

    Ok(rows)
}
