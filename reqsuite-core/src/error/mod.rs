use thiserror::Error;

/// Errors produced while validating and layering a request set's dependency
/// graph. These are fatal to the whole run: nothing executes safely on a
/// broken graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("request \"{request}\" requires unknown request \"{dependency}\"")]
    UnknownDependency { request: String, dependency: String },
    #[error("cyclic dependency involving request \"{node}\"")]
    CyclicDependency { node: String },
}

/// Errors produced while resolving `{{name}}` placeholders against the bound
/// environment. Resolution is fail-fast: a request with an unresolved token is
/// never dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("no value bound for placeholder \"{0}\"")]
    UnresolvedPlaceholder(String),
    #[error("unclosed placeholder (missing \"}}}}\")")]
    UnclosedPlaceholder,
}
