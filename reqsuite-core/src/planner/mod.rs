mod dependency;
mod model;

pub use dependency::build_graph;
pub use model::DependencyGraph;
