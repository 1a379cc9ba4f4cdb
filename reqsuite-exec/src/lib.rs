#![forbid(unsafe_code)]

//! Runtime engine for executing reqsuite request sets.
//!
//! This crate is intentionally thin on the surface: the data model, dependency
//! planner and placeholder resolver live in `reqsuite-core`; parsing request
//! files and rendering reports are the caller's concern.

pub mod executor;
pub mod retry;

pub use crate::executor::Executor;
