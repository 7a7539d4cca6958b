//! Request handlers, one module per resource.

pub mod health;
pub mod leaderboard;
pub mod notifications;
pub mod plans;
pub mod sales;
