//! Orchestration services: the glue between handlers, the pure core,
//! and the repositories.

pub mod notify;
pub mod sales;
