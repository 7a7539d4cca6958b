//! # Approval Workflow
//!
//! The sale approval state machine.
//!
//! ## States
//! ```text
//!              ┌──► approved   (terminal)
//!  pending ────┤
//!              └──► rejected   (terminal, reason required)
//!
//!  cancelled: terminal, reachable only via the admin full-record edit,
//!             never through decide().
//! ```
//!
//! This module holds the pure transition rules. The persistent twin is
//! `SaleRepository::decide`, which applies the same guard as a
//! compare-and-set (`WHERE status = 'pending'`) so that two racing
//! decisions on one sale cannot both win.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::types::{Sale, SaleStatus};
use crate::validation::validate_rejection_reason;

// =============================================================================
// Decision
// =============================================================================

/// An approval decision. The only two transitions decide() can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub const fn status(&self) -> SaleStatus {
        match self {
            Decision::Approved => SaleStatus::Approved,
            Decision::Rejected => SaleStatus::Rejected,
        }
    }
}

/// The approving/rejecting actor, from the authenticated session.
#[derive(Debug, Clone)]
pub struct Approver {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Transition
// =============================================================================

/// Applies a decision to a sale in place.
///
/// ## Preconditions
/// - The sale must still be `pending`; any other state is terminal for
///   this workflow and yields `CoreError::InvalidTransition`.
/// - A rejected decision requires a non-empty `rejection_reason`.
///
/// ## Effect
/// Sets `status`, `approved_by`, `approver_name`, `approved_at = now`,
/// `updated_at = now`, and `rejection_reason` (rejections only).
pub fn apply_decision(
    sale: &mut Sale,
    decision: Decision,
    approver: &Approver,
    rejection_reason: Option<&str>,
    now: DateTime<Utc>,
) -> CoreResult<()> {
    if sale.status != SaleStatus::Pending {
        return Err(CoreError::InvalidTransition {
            sale_id: sale.id.clone(),
            current_status: sale.status.to_string(),
        });
    }

    let reason = match decision {
        Decision::Rejected => Some(validate_rejection_reason(rejection_reason)?),
        Decision::Approved => None,
    };

    sale.status = decision.status();
    sale.approved_by = Some(approver.id.clone());
    sale.approver_name = Some(approver.name.clone());
    sale.approved_at = Some(now);
    sale.rejection_reason = reason;
    sale.updated_at = now;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
