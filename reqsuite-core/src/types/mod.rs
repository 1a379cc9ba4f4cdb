mod body;
mod request;

pub use body::{MultipartPart, RequestBody};
pub use request::{RequestConfig, RequestDefinition, RequestSet};
