//! One module per `/household` endpoint.
//!
//! Each `build` reads its facts through the request's connection, tallies
//! them per scope row and assembles the response rows. All reads of a request
//! go through the same connection so they observe one snapshot.

pub mod demands;
pub mod funnel;
pub mod io_re_ps;
pub mod revenue;
pub mod sf_class;

use crate::models::{SummaryFacts, SummaryRow, TargetValues};
use crate::services::aggregator::{tally, NodeTally};
use crate::services::categorizer::{channel_group, ChannelGroup, ChannelSplit};
use crate::services::scope::TerritoryScope;

pub(crate) fn facts_by_node(scope: &TerritoryScope, rows: &[SummaryRow]) -> NodeTally<SummaryFacts> {
    tally(scope, rows, |facts: &mut SummaryFacts, row| *facts += row.facts)
}

pub(crate) fn channels_by_node<T, F>(
    scope: &TerritoryScope,
    rows: &[SummaryRow],
    value: F,
) -> NodeTally<ChannelSplit<T>>
where
    T: Copy + Default + std::ops::AddAssign,
    F: Fn(&SummaryFacts) -> T,
{
    tally(scope, rows, |split: &mut ChannelSplit<T>, row| {
        split.add(channel_group(&row.channel), value(&row.facts))
    })
}

/// Value accumulated for a row, or the default when nothing reached it.
pub(crate) fn at<T: Clone + Default>(tally: &NodeTally<T>, name: &str) -> T {
    tally.get(name).cloned().unwrap_or_default()
}

pub(crate) fn channel_target(targets: Option<&TargetValues>, group: ChannelGroup) -> Option<f64> {
    let targets = targets?;
    match group {
        ChannelGroup::Grapari => targets.ps_grapari,
        ChannelGroup::Digital => targets.ps_digital,
        ChannelGroup::Community => targets.ps_community,
        ChannelGroup::Agency => targets.ps_agency,
        ChannelGroup::Other => None,
    }
}
