//! Frame serialization: file naming and the PNG writer.

pub(crate) mod naming;
pub(crate) mod png;
