use rusqlite::Connection;

use crate::date_utils::DateWindows;
use crate::db::queries::orders;
use crate::models::kpi::{DurationCount, FalloutCategoryCount, FunnelRow, StageCount, SubcategoryCount};
use crate::models::FunnelStage;
use crate::services::achievement::percent_str;
use crate::services::aggregator::tally;
use crate::services::categorizer::{
    duration_bucket, fallout_bucket, DurationBucket, DurationTally, FalloutCategory, FalloutTally,
};
use crate::services::dedup;
use crate::services::scope::TerritoryScope;

#[derive(Debug, Clone, Default)]
struct FunnelTally {
    in_flight: i64,
    stages: Vec<(FunnelStage, i64)>,
    fallout: FalloutTally,
    durations: DurationTally,
}

impl FunnelTally {
    fn add_stage(&mut self, stage: FunnelStage) {
        match self.stages.iter_mut().find(|(s, _)| *s == stage) {
            Some((_, count)) => *count += 1,
            None => self.stages.push((stage, 1)),
        }
    }

    fn stage(&self, stage: FunnelStage) -> i64 {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map_or(0, |(_, count)| *count)
    }
}

/// In-flight funnel over orders registered since the start of the previous
/// month, after dropping duplicated and terminal services.
pub fn build(
    conn: &Connection,
    windows: &DateWindows,
    scope: &TerritoryScope,
) -> rusqlite::Result<Vec<FunnelRow>> {
    let records = orders::list_orders(conn, &windows.trailing(), scope)?;
    let kept = dedup::in_flight(&records);

    let funnel = tally(scope, &kept, |t: &mut FunnelTally, order| {
        t.in_flight += 1;
        t.add_stage(order.stage);
        if order.stage == FunnelStage::Fallout {
            t.fallout.add(fallout_bucket(
                order.fallout_category.as_deref(),
                order.fallout_subcategory.as_deref(),
            ));
        }
        t.durations.add(duration_bucket(order.provisioning_days));
    });

    let rows = funnel
        .into_rows()
        .into_iter()
        .map(|(node, t)| {
            let known = t.durations.known();
            FunnelRow {
                in_flight: t.in_flight,
                stages: FunnelStage::in_flight()
                    .iter()
                    .map(|&stage| StageCount {
                        stage,
                        count: t.stage(stage),
                    })
                    .collect(),
                fallout_total: t.fallout.total,
                fallout: FalloutCategory::all()
                    .iter()
                    .map(|&category| FalloutCategoryCount {
                        category,
                        total: t.fallout.category(category),
                        subcategories: category
                            .subcategories()
                            .iter()
                            .map(|&subcategory| SubcategoryCount {
                                subcategory,
                                count: t.fallout.subcategory(category, subcategory),
                            })
                            .collect(),
                    })
                    .collect(),
                duration_known: known,
                durations: DurationBucket::all()
                    .iter()
                    .map(|&bucket| DurationCount {
                        bucket,
                        count: t.durations.count(bucket),
                        percentage: percent_str(t.durations.count(bucket) as f64, known as f64),
                    })
                    .collect(),
                node,
            }
        })
        .collect();

    Ok(rows)
}
