//! CLI library components for the SOCAT sanity checker.

pub mod logging;
pub mod pipeline;
pub mod types;
