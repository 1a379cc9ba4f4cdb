use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::error::GraphError;
use crate::planner::model::DependencyGraph;
use crate::types::RequestDefinition;

/// Builds and validates the dependency graph for a request set.
///
/// Every `require` entry must name a defined request, and the graph must be
/// acyclic (a self-dependency is a degenerate 1-cycle). Both checks happen
/// here, before anything executes.
pub fn build_graph(
    requests: &BTreeMap<String, RequestDefinition>,
) -> Result<DependencyGraph, GraphError> {
    let names: BTreeSet<String> = requests.keys().cloned().collect();

    let mut depends_on: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, def) in requests {
        let mut deps: Vec<String> = Vec::new();
        for dep in def.requires() {
            if !names.contains(dep) {
                return Err(GraphError::UnknownDependency {
                    request: name.clone(),
                    dependency: dep.clone(),
                });
            }
            if !deps.contains(dep) {
                deps.push(dep.clone());
            }
        }
        deps.sort();
        depends_on.insert(name.clone(), deps);
    }

    let topo_order = topo_sort(&names, &depends_on)?;
    let levels = compute_levels(&topo_order, &depends_on);

    Ok(DependencyGraph {
        depends_on,
        levels,
        topo_order,
    })
}

fn topo_sort(
    nodes: &BTreeSet<String>,
    depends_on: &BTreeMap<String, Vec<String>>,
) -> Result<Vec<String>, GraphError> {
    let mut indeg: BTreeMap<String, usize> = nodes.iter().map(|n| (n.clone(), 0)).collect();
    let mut outgoing: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (n, deps) in depends_on {
        for d in deps {
            *indeg.get_mut(n).unwrap() += 1;
            outgoing.entry(d.clone()).or_default().push(n.clone());
        }
    }

    for v in outgoing.values_mut() {
        v.sort();
    }

    let mut q = VecDeque::new();
    for n in nodes {
        if indeg[n] == 0 {
            q.push_back(n.clone());
        }
    }

    let mut out = Vec::with_capacity(nodes.len());
    while let Some(n) = q.pop_front() {
        out.push(n.clone());
        if let Some(nexts) = outgoing.get(&n) {
            for m in nexts {
                let e = indeg.get_mut(m).unwrap();
                *e -= 1;
                if *e == 0 {
                    q.push_back(m.clone());
                }
            }
        }
    }

    if out.len() != nodes.len() {
        let remaining: BTreeSet<String> = nodes
            .iter()
            .filter(|n| !out.contains(*n))
            .cloned()
            .collect();
        return Err(GraphError::CyclicDependency {
            node: find_cycle_node(&remaining, depends_on),
        });
    }
    Ok(out)
}

/// Walks unresolved dependencies from an arbitrary unresolved node until one
/// repeats; the repeated node lies on a cycle. Every unresolved node keeps at
/// least one unresolved dependency, so the walk never dead-ends.
fn find_cycle_node(
    remaining: &BTreeSet<String>,
    depends_on: &BTreeMap<String, Vec<String>>,
) -> String {
    let mut seen = BTreeSet::new();
    let mut cur = remaining
        .iter()
        .next()
        .expect("cycle reported with no unresolved nodes")
        .clone();
    loop {
        if !seen.insert(cur.clone()) {
            return cur;
        }
        cur = depends_on[&cur]
            .iter()
            .find(|d| remaining.contains(*d))
            .expect("unresolved node with no unresolved dependency")
            .clone();
    }
}

fn compute_levels(topo: &[String], depends_on: &BTreeMap<String, Vec<String>>) -> Vec<Vec<String>> {
    let mut level: BTreeMap<String, usize> = BTreeMap::new();
    for node in topo {
        let deps = depends_on.get(node).map(|v| v.as_slice()).unwrap_or(&[]);
        let l = deps
            .iter()
            .filter_map(|d| level.get(d).copied())
            .max()
            .map(|m| m + 1)
            .unwrap_or(0);
        level.insert(node.clone(), l);
    }

    let max_level = level.values().copied().max().unwrap_or(0);
    let mut levels = vec![Vec::<String>::new(); max_level + 1];
    for node in topo {
        let l = level[node];
        levels[l].push(node.clone());
    }
    levels
}
