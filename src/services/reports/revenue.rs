//! Revenue (C3MR) reports: the per-node trend view and the channel split.

use rusqlite::Connection;

use super::{at, channels_by_node, facts_by_node};
use crate::date_utils::{DateWindows, Window};
use crate::db::queries::{summary, targets};
use crate::models::kpi::{ChannelRevenue, RevenueChannelRow, RevenueRow};
use crate::models::SummarySlice;
use crate::services::achievement::{
    attainment, divide, growth, percent_str, round2, trend_f64, trend_i64,
};
use crate::services::categorizer::ChannelGroup;
use crate::services::scope::TerritoryScope;
use crate::services::targets::join_targets;

pub fn build(
    conn: &Connection,
    windows: &DateWindows,
    scope: &TerritoryScope,
) -> rusqlite::Result<Vec<RevenueRow>> {
    let total = |window: &Window| summary::sum_by_sto(conn, window, scope, SummarySlice::Total);
    let mtd = facts_by_node(scope, &total(&windows.current)?);
    let m1 = facts_by_node(scope, &total(&windows.previous_month)?);
    let yoy = facts_by_node(scope, &total(&windows.previous_year)?);
    let ytd = facts_by_node(scope, &total(&windows.ytd)?);
    let ytd_prev = facts_by_node(scope, &total(&windows.previous_ytd)?);
    let qtd = facts_by_node(scope, &total(&windows.qtd)?);
    let qtd_prev = facts_by_node(scope, &total(&windows.previous_qtd)?);

    let target_rows = targets::list_for_period(conn, windows.period(), scope)?;
    let joined = join_targets(scope, &target_rows);

    let rows = mtd
        .into_rows()
        .into_iter()
        .map(|(node, cur)| {
            let prev = at(&m1, &node.name);
            let last_year = at(&yoy, &node.name);
            let ytd_cur = at(&ytd, &node.name).revenue;
            let ytd_last = at(&ytd_prev, &node.name).revenue;
            let qtd_cur = at(&qtd, &node.name).revenue;
            let qtd_last = at(&qtd_prev, &node.name).revenue;
            let target = joined
                .get(&node.name)
                .copied()
                .flatten()
                .and_then(|t| t.revenue);

            RevenueRow {
                revenue: trend_f64(cur.revenue, prev.revenue, last_year.revenue),
                revenue_ytd: ytd_cur,
                revenue_ytd_prev: ytd_last,
                ytd_growth: growth(ytd_cur, ytd_last),
                revenue_qtd: qtd_cur,
                revenue_qtd_prev: qtd_last,
                qoq: growth(qtd_cur, qtd_last),
                subscribers: trend_i64(cur.subscribers, prev.subscribers, last_year.subscribers),
                arpu: divide(cur.revenue, Some(cur.subscribers as f64)).map(round2),
                attainment: attainment(cur.revenue, target, windows),
                node,
            }
        })
        .collect();

    Ok(rows)
}

/// Revenue per channel group. Shares are taken against the node's total over
/// all channels, so unmapped channels still weigh in the denominator.
pub fn build_by_channel(
    conn: &Connection,
    windows: &DateWindows,
    scope: &TerritoryScope,
) -> rusqlite::Result<Vec<RevenueChannelRow>> {
    let current = summary::sum_by_sto(conn, &windows.current, scope, SummarySlice::ByChannel)?;
    let previous = summary::sum_by_sto(conn, &windows.previous_month, scope, SummarySlice::ByChannel)?;
    let mtd = channels_by_node(scope, &current, |facts| facts.revenue);
    let m1 = channels_by_node(scope, &previous, |facts| facts.revenue);

    let rows = mtd
        .into_rows()
        .into_iter()
        .map(|(node, split)| {
            let prev = at(&m1, &node.name);
            let total_mtd: f64 = ChannelGroup::reported()
                .iter()
                .map(|&g| split.get(g))
                .sum::<f64>()
                + split.get(ChannelGroup::Other);

            RevenueChannelRow {
                total_mtd,
                channels: ChannelGroup::reported()
                    .iter()
                    .map(|&channel| ChannelRevenue {
                        channel,
                        mtd: split.get(channel),
                        m1: prev.get(channel),
                        mom: growth(split.get(channel), prev.get(channel)),
                        share: percent_str(split.get(channel), total_mtd),
                    })
                    .collect(),
                node,
            }
        })
        .collect();

    Ok(rows)
}
