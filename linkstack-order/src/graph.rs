use linkstack_scan::{ArchiveInfo, SymbolTables};
use petgraph::Graph;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("cannot order archives, the dependency graph has a cycle through `{archive}`")]
    CyclicDependency { archive: String },
}

/// Distinct dependent -> dependency pairs implied by the symbol tables.
///
/// Self-references are dropped; an archive satisfying its own members is not
/// an ordering constraint.
fn dependency_pairs(tables: &SymbolTables) -> BTreeSet<(String, String)> {
    tables
        .undefined
        .iter()
        .filter_map(|(symbol, dependent)| {
            let dependency = tables.resolver_of(symbol)?;
            (dependent != dependency)
                .then(|| (dependent.name.clone(), dependency.name.clone()))
        })
        .collect()
}

/// Number of distinct inter-archive dependency edges.
pub fn dependency_edge_count(tables: &SymbolTables) -> usize {
    dependency_pairs(tables).len()
}

/// Order `archives` so that every dependent precedes its dependencies, the
/// order a single-pass static linker needs.
///
/// Ties break toward ascending archive name, so output is deterministic for a
/// given input set.
pub fn resolve_order(
    archives: &[ArchiveInfo],
    tables: &SymbolTables,
) -> Result<Vec<ArchiveInfo>, OrderError> {
    let mut graph = Graph::<ArchiveInfo, ()>::new();
    let mut index_of: HashMap<&str, NodeIndex> = HashMap::new();

    // toposort returns reversed DFS finish order, so reverse-sorted insertion
    // makes unconstrained archives come out name-sorted.
    let mut sorted: Vec<&ArchiveInfo> = archives.iter().collect();
    sorted.sort_by(|a, b| b.name.cmp(&a.name));
    for archive in sorted {
        let index = graph.add_node(archive.clone());
        index_of.insert(archive.name.as_str(), index);
    }

    for (dependent, dependency) in dependency_pairs(tables) {
        let (Some(&from), Some(&to)) = (
            index_of.get(dependent.as_str()),
            index_of.get(dependency.as_str()),
        ) else {
            continue;
        };
        graph.add_edge(from, to, ());
    }
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "dependency graph built"
    );

    let order = toposort(&graph, None).map_err(|cycle| OrderError::CyclicDependency {
        archive: graph[cycle.node_id()].name.clone(),
    })?;

    Ok(order.into_iter().map(|index| graph[index].clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use linkstack_scan::{DefinedSymbol, UndefinedSymbol};
    use pretty_assertions::assert_eq;

    fn archive(name: &str) -> ArchiveInfo {
        ArchiveInfo {
            name: name.to_string(),
            path: Utf8PathBuf::from(format!("/out/{name}")),
        }
    }

    /// `edges`: (dependent, symbol, dependency).
    fn tables(edges: &[(&str, &str, &str)]) -> SymbolTables {
        let mut tables = SymbolTables::default();
        for (dependent, symbol, dependency) in edges {
            tables
                .defined
                .insert(DefinedSymbol::new(*symbol), archive(dependency));
            tables
                .undefined
                .push((UndefinedSymbol::new(*symbol), archive(dependent)));
        }
        tables
    }

    fn names(order: &[ArchiveInfo]) -> Vec<&str> {
        order.iter().map(|a| a.name.as_str()).collect()
    }

    fn position(order: &[ArchiveInfo], name: &str) -> usize {
        order.iter().position(|a| a.name == name).unwrap()
    }

    #[test]
    fn chain_orders_dependents_first() {
        let archives = vec![archive("liba.a"), archive("libb.a"), archive("libc.a")];
        let tables = tables(&[
            ("liba.a", "from_b", "libb.a"),
            ("libb.a", "from_c", "libc.a"),
        ]);

        let order = resolve_order(&archives, &tables).unwrap();
        assert_eq!(names(&order), vec!["liba.a", "libb.a", "libc.a"]);
    }

    #[test]
    fn unconstrained_archives_come_out_name_sorted() {
        let archives = vec![archive("libz.a"), archive("liba.a"), archive("libm.a")];
        let order = resolve_order(&archives, &SymbolTables::default()).unwrap();
        assert_eq!(names(&order), vec!["liba.a", "libm.a", "libz.a"]);
    }

    #[test]
    fn reversed_chain_still_orders_dependents_first() {
        // Dependency direction against name order.
        let archives = vec![archive("liba.a"), archive("libz.a")];
        let tables = tables(&[("libz.a", "from_a", "liba.a")]);

        let order = resolve_order(&archives, &tables).unwrap();
        assert_eq!(names(&order), vec!["libz.a", "liba.a"]);
    }

    #[test]
    fn diamond_respects_every_edge() {
        let archives = vec![
            archive("liba.a"),
            archive("libb.a"),
            archive("libc.a"),
            archive("libd.a"),
        ];
        let tables = tables(&[
            ("liba.a", "b_sym", "libb.a"),
            ("liba.a", "c_sym", "libc.a"),
            ("libb.a", "d_sym1", "libd.a"),
            ("libc.a", "d_sym2", "libd.a"),
        ]);

        let order = resolve_order(&archives, &tables).unwrap();
        assert!(position(&order, "liba.a") < position(&order, "libb.a"));
        assert!(position(&order, "liba.a") < position(&order, "libc.a"));
        assert!(position(&order, "libb.a") < position(&order, "libd.a"));
        assert!(position(&order, "libc.a") < position(&order, "libd.a"));
    }

    #[test]
    fn ordering_is_deterministic() {
        let archives = vec![
            archive("liba.a"),
            archive("libb.a"),
            archive("libc.a"),
            archive("libd.a"),
        ];
        let tables = tables(&[("libc.a", "sym", "libb.a")]);

        let first = resolve_order(&archives, &tables).unwrap();
        let second = resolve_order(&archives, &tables).unwrap();
        assert_eq!(names(&first), names(&second));
    }

    #[test]
    fn self_reference_is_not_a_constraint() {
        let archives = vec![archive("liba.a")];
        let tables = tables(&[("liba.a", "own_sym", "liba.a")]);

        let order = resolve_order(&archives, &tables).unwrap();
        assert_eq!(names(&order), vec!["liba.a"]);
    }

    #[test]
    fn parallel_references_collapse_to_one_edge() {
        let tables = tables(&[
            ("liba.a", "sym_one", "libb.a"),
            ("liba.a", "sym_two", "libb.a"),
        ]);
        assert_eq!(dependency_edge_count(&tables), 1);
    }

    #[test]
    fn cycle_is_rejected() {
        let archives = vec![archive("liba.a"), archive("libb.a")];
        let tables = tables(&[
            ("liba.a", "from_b", "libb.a"),
            ("libb.a", "from_a", "liba.a"),
        ]);

        let err = resolve_order(&archives, &tables).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn references_outside_the_archive_set_are_ignored() {
        // Tables mention libx.a but it was not discovered.
        let archives = vec![archive("liba.a")];
        let tables = tables(&[("libx.a", "sym", "liba.a")]);

        let order = resolve_order(&archives, &tables).unwrap();
        assert_eq!(names(&order), vec!["liba.a"]);
    }
}
