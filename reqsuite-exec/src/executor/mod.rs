pub mod body;
pub mod concurrency;
pub mod events;
pub mod http;
pub mod request;
mod result;
mod scheduler;
mod types;
pub mod worker;

pub use body::{serialize_body, BodyError, FileReadKind, SerializedBody};
pub use events::{Event, EventSink, NoOpEventSink, TracingEventSink};
pub use http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts, ReqwestHttpClient};
pub use request::BuildError;
pub use result::{
    ExecutionError, ExecutionOutcome, OutcomeError, OutcomeTable, RequestStatus, ResponseSummary,
    RunReport,
};
pub use scheduler::Executor;
pub use types::ExecutorConfig;
pub use worker::Worker;
