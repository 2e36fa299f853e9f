//! Export orchestration: request, partitioning, worker pool.

pub(crate) mod pipeline;
pub(crate) mod request;
pub(crate) mod schedule;
