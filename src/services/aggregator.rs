use std::collections::HashMap;

use crate::models::{TerritoryNode, TerritoryPath};
use crate::services::scope::TerritoryScope;

/// One accumulator per response row of a scope.
///
/// Every fact is credited to exactly one row (the scope child containing its
/// territory) or dropped when outside the scope, so any additive metric sums
/// to the same total at every level.
#[derive(Debug, Clone)]
pub struct NodeTally<T> {
    nodes: Vec<TerritoryNode>,
    values: HashMap<String, T>,
    scope: TerritoryScope,
    dropped: usize,
}

impl<T: Default> NodeTally<T> {
    pub fn new(scope: &TerritoryScope) -> Self {
        let values = scope
            .nodes
            .iter()
            .map(|n| (n.name.clone(), T::default()))
            .collect();
        Self {
            nodes: scope.nodes.clone(),
            values,
            scope: scope.clone(),
            dropped: 0,
        }
    }

    /// Credit a fact at `path` to its row. Returns false if it fell outside.
    pub fn add<F>(&mut self, path: &TerritoryPath, apply: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let slot = self
            .scope
            .node_for(path)
            .and_then(|name| self.values.get_mut(name));
        match slot {
            Some(value) => {
                apply(value);
                true
            }
            None => {
                self.dropped += 1;
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.values.get(name)
    }

    /// Facts that matched no row, typically territory names missing from the
    /// hierarchy table.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Rows in scope order, each paired with its accumulated value.
    pub fn into_rows(mut self) -> Vec<(TerritoryNode, T)> {
        if self.dropped > 0 {
            tracing::debug!(dropped = self.dropped, "Facts outside territory scope");
        }
        self.nodes
            .into_iter()
            .map(|node| {
                let value = self.values.remove(&node.name).unwrap_or_default();
                (node, value)
            })
            .collect()
    }
}

/// Credit every record to its row with `apply`.
pub fn tally<R, T, F>(scope: &TerritoryScope, records: R, mut apply: F) -> NodeTally<T>
where
    R: IntoIterator,
    R::Item: HasTerritory,
    T: Default,
    F: FnMut(&mut T, &R::Item),
{
    let mut tally = NodeTally::new(scope);
    for record in records {
        tally.add(record.territory(), |value| apply(value, &record));
    }
    tally
}

/// Anything placed in the territory tree.
pub trait HasTerritory {
    fn territory(&self) -> &TerritoryPath;
}

impl<H: HasTerritory + ?Sized> HasTerritory for &H {
    fn territory(&self) -> &TerritoryPath {
        (**self).territory()
    }
}

macro_rules! has_territory {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasTerritory for $ty {
                fn territory(&self) -> &TerritoryPath {
                    &self.territory
                }
            }
        )*
    };
}

has_territory!(
    crate::models::OrderRecord,
    crate::models::SummaryRow,
    crate::models::TargetRecord,
    crate::models::OdpPort,
    crate::models::OdpGoLive,
    crate::models::SalesAgent,
);
