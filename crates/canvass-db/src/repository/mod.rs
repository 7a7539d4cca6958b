//! Repository implementations.
//!
//! Each repository wraps the shared pool and owns the SQL for one
//! collection: sales (+ line items), notifications, users.

pub mod notification;
pub mod sale;
pub mod user;
