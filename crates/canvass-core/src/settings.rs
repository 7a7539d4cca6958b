//! # Sales Settings
//!
//! Workflow configuration threaded explicitly into the sale builder and
//! approval service. Never ambient global state: the portal constructs
//! one `SalesSettings` at startup and passes it down.

use serde::{Deserialize, Serialize};

/// Configuration for the sale submission workflow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SalesSettings {
    /// When set, submitted sales skip the pending state and are created
    /// already approved. Off in production; used by small teams without
    /// a review step.
    pub auto_approve: bool,
}

impl Default for SalesSettings {
    fn default() -> Self {
        SalesSettings {
            auto_approve: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_does_not_auto_approve() {
        assert!(!SalesSettings::default().auto_approve);
    }
}
