//! HTTP layer: router, handlers, extractors, error mapping, envelope format.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
