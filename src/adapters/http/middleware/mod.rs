//! HTTP middleware.

mod deadline;

pub use deadline::request_deadline;
