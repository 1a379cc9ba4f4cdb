use std::collections::BTreeMap;

/// A validated, acyclic view of the request set's `require` relations.
/// Built once per run, read-only thereafter.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DependencyGraph {
    /// For each request, which requests it depends on.
    pub depends_on: BTreeMap<String, Vec<String>>,
    /// Requests grouped by concurrently-dispatchable "levels": every request
    /// in level N depends only on requests in levels strictly before N.
    pub levels: Vec<Vec<String>>,
    /// A deterministic topological order.
    pub topo_order: Vec<String>,
}

impl DependencyGraph {
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.depends_on.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }
}
