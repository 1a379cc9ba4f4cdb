#![forbid(unsafe_code)]

pub mod error;
pub mod planner;
pub mod template;
pub mod types;

pub use crate::error::{GraphError, TemplateError};
pub use crate::planner::{build_graph, DependencyGraph};
pub use crate::template::{resolve_string, resolve_value, Environment};
pub use crate::types::{
    MultipartPart, RequestBody, RequestConfig, RequestDefinition, RequestSet,
};
