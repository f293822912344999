use std::collections::HashMap;

use crate::models::OrderRecord;

#[derive(Debug, Default, Clone, Copy)]
struct Partition {
    size: usize,
    terminal: bool,
}

/// Orders still genuinely in flight.
///
/// Records are partitioned by service id. A record survives only if it is the
/// sole member of its partition and no member has reached a terminal stage.
/// The result is sorted by order id, so it does not depend on input order.
pub fn in_flight(records: &[OrderRecord]) -> Vec<OrderRecord> {
    let mut partitions: HashMap<&str, Partition> = HashMap::new();
    for record in records {
        let partition = partitions.entry(record.service_id.as_str()).or_default();
        partition.size += 1;
        partition.terminal |= record.stage.is_terminal();
    }

    let mut kept: Vec<OrderRecord> = records
        .iter()
        .filter(|record| {
            partitions
                .get(record.service_id.as_str())
                .is_some_and(|p| p.size == 1 && !p.terminal)
        })
        .cloned()
        .collect();

    kept.sort_by(|a, b| a.order_id.cmp(&b.order_id));
    tracing::debug!(
        input = records.len(),
        partitions = partitions.len(),
        kept = kept.len(),
        "Deduplicated in-flight orders"
    );
    kept
}
