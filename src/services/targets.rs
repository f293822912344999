use crate::models::{TargetRecord, TargetValues};
use crate::services::aggregator::{tally, NodeTally};
use crate::services::scope::TerritoryScope;

/// Sum sto-level targets up to the scope's rows.
///
/// A row that no target record reaches stays `None`, which callers must keep
/// apart from a zero target.
pub fn join_targets(
    scope: &TerritoryScope,
    records: &[TargetRecord],
) -> NodeTally<Option<TargetValues>> {
    tally(scope, records, |slot: &mut Option<TargetValues>, record| {
        let merged = match slot.as_ref() {
            Some(existing) => existing.merge(&record.values),
            None => record.values,
        };
        *slot = Some(merged);
    })
}
