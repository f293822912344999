use std::collections::BTreeSet;

use rusqlite::Connection;

use crate::db::queries::territories;
use crate::models::{TerritoryLevel, TerritoryNode, TerritoryPath};

/// Optional `branch` / `wok` request filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerritoryFilter {
    pub branch: Option<String>,
    pub wok: Option<String>,
}

impl TerritoryFilter {
    pub fn new(branch: Option<&str>, wok: Option<&str>) -> Self {
        let clean = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_uppercase)
        };
        Self {
            branch: clean(branch),
            wok: clean(wok),
        }
    }
}

/// The resolved subtree a request reports on, and the rows it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerritoryScope {
    pub regional: String,
    pub branch: Option<String>,
    pub wok: Option<String>,
    pub level: TerritoryLevel,
    pub nodes: Vec<TerritoryNode>,
}

impl TerritoryScope {
    /// Level of the rows in the response.
    pub fn row_level(&self) -> TerritoryLevel {
        self.level.child().unwrap_or(self.level)
    }

    pub fn contains(&self, path: &TerritoryPath) -> bool {
        path.regional == self.regional
            && self.branch.as_ref().map_or(true, |b| &path.branch == b)
            && self.wok.as_ref().map_or(true, |w| &path.wok == w)
    }

    /// Name of the response row a fact at `path` rolls up into.
    pub fn node_for<'a>(&self, path: &'a TerritoryPath) -> Option<&'a str> {
        if self.contains(path) {
            Some(path.name_at(self.row_level()))
        } else {
            None
        }
    }

    /// The whole region, for facts that may sit outside the filtered subtree.
    pub fn region_wide(&self) -> TerritoryScope {
        TerritoryScope {
            regional: self.regional.clone(),
            branch: None,
            wok: None,
            level: TerritoryLevel::Regional,
            nodes: Vec::new(),
        }
    }

    /// `WHERE` fragment restricting a query to this scope, with its bind values.
    pub fn sql_predicate(&self, alias: &str) -> (String, Vec<String>) {
        let prefix = if alias.is_empty() {
            String::new()
        } else {
            format!("{}.", alias)
        };
        let mut clauses = vec![format!("{}regional = ?", prefix)];
        let mut values = vec![self.regional.clone()];
        if let Some(branch) = &self.branch {
            clauses.push(format!("{}branch = ?", prefix));
            values.push(branch.clone());
        }
        if let Some(wok) = &self.wok {
            clauses.push(format!("{}wok = ?", prefix));
            values.push(wok.clone());
        }
        (clauses.join(" AND "), values)
    }
}

/// Resolve filters against the territory hierarchy of one region.
///
/// Filters only compose top-down: a wok is honoured only under a branch that
/// contains it. An unknown branch yields a scope with no rows.
pub fn resolve_scope(
    regional: &str,
    hierarchy: &[TerritoryPath],
    filter: &TerritoryFilter,
) -> TerritoryScope {
    let in_region: Vec<&TerritoryPath> = hierarchy
        .iter()
        .filter(|p| p.regional.eq_ignore_ascii_case(regional))
        .collect();
    let regional = in_region
        .first()
        .map(|p| p.regional.clone())
        .unwrap_or_else(|| regional.to_string());

    let Some(branch_filter) = &filter.branch else {
        return build(regional, None, None, TerritoryLevel::Regional, &in_region);
    };

    let branch = in_region
        .iter()
        .find(|p| p.branch.eq_ignore_ascii_case(branch_filter))
        .map(|p| p.branch.clone());
    let Some(branch) = branch else {
        tracing::debug!(branch = %branch_filter, "Branch not found in hierarchy");
        return TerritoryScope {
            regional,
            branch: Some(branch_filter.clone()),
            wok: None,
            level: TerritoryLevel::Branch,
            nodes: Vec::new(),
        };
    };

    let wok = filter.wok.as_ref().and_then(|wok_filter| {
        in_region
            .iter()
            .find(|p| p.branch == branch && p.wok.eq_ignore_ascii_case(wok_filter))
            .map(|p| p.wok.clone())
    });

    match wok {
        Some(wok) => build(
            regional,
            Some(branch),
            Some(wok),
            TerritoryLevel::Wok,
            &in_region,
        ),
        None => build(regional, Some(branch), None, TerritoryLevel::Branch, &in_region),
    }
}

fn build(
    regional: String,
    branch: Option<String>,
    wok: Option<String>,
    level: TerritoryLevel,
    hierarchy: &[&TerritoryPath],
) -> TerritoryScope {
    let mut scope = TerritoryScope {
        regional,
        branch,
        wok,
        level,
        nodes: Vec::new(),
    };
    let row_level = scope.row_level();
    let names: BTreeSet<&str> = hierarchy
        .iter()
        .filter(|p| scope.contains(p))
        .map(|p| p.name_at(row_level))
        .collect();
    scope.nodes = names
        .into_iter()
        .map(|name| TerritoryNode {
            level: row_level,
            name: name.to_string(),
        })
        .collect();
    scope
}

/// Load the region's hierarchy and resolve the request filters against it.
pub fn load_scope(
    conn: &Connection,
    regional: &str,
    filter: &TerritoryFilter,
) -> rusqlite::Result<TerritoryScope> {
    let hierarchy = territories::list_for_region(conn, regional)?;
    let scope = resolve_scope(regional, &hierarchy, filter);
    tracing::debug!(
        level = %scope.level,
        nodes = scope.nodes.len(),
        "Resolved territory scope"
    );
    Ok(scope)
}
