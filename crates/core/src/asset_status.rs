//! Asset lifecycle statuses and the transition table.
//!
//! The table is the single source of truth for which status changes the
//! transition engine accepts and which ledger side effect each one carries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of an asset. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Available,
    Assigned,
    InRepair,
    Lost,
    Retired,
    Disposed,
}

/// Every status, in the order used for summaries.
pub const ALL_STATUSES: [AssetStatus; 6] = [
    AssetStatus::Available,
    AssetStatus::Assigned,
    AssetStatus::InRepair,
    AssetStatus::Lost,
    AssetStatus::Retired,
    AssetStatus::Disposed,
];

/// What the assignment ledger must do for a given transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEffect {
    None,
    /// Open a new assignment row for the supplied holder.
    Open,
    /// Close the asset's open assignment row.
    Close,
}

impl AssetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetStatus::Available => "available",
            AssetStatus::Assigned => "assigned",
            AssetStatus::InRepair => "in_repair",
            AssetStatus::Lost => "lost",
            AssetStatus::Retired => "retired",
            AssetStatus::Disposed => "disposed",
        }
    }

    /// Returns the set of statuses this status may transition to.
    ///
    /// - `available` -> `assigned`, `in_repair`, `lost`, `retired`, `disposed`
    /// - `assigned`  -> `available`, `lost`, `retired`, `disposed`
    /// - `in_repair` -> `available`, `retired`, `disposed`
    /// - `lost`, `retired`, `disposed` are terminal
    pub fn valid_transitions(self) -> &'static [AssetStatus] {
        use AssetStatus::*;
        match self {
            Available => &[Assigned, InRepair, Lost, Retired, Disposed],
            Assigned => &[Available, Lost, Retired, Disposed],
            InRepair => &[Available, Retired, Disposed],
            Lost | Retired | Disposed => &[],
        }
    }

    pub fn can_transition(self, to: AssetStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STATUSES
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid asset status '{s}'. Must be one of: available, assigned, \
                     in_repair, lost, retired, disposed"
                ))
            })
    }
}

/// Validate a transition and return the ledger side effect it requires.
///
/// Re-assigning an already assigned asset is a conflict (someone else holds
/// it), not a malformed request, so it is reported separately from the
/// generic invalid-transition case.
pub fn validate_transition(from: AssetStatus, to: AssetStatus) -> Result<LedgerEffect, CoreError> {
    if from == AssetStatus::Assigned && to == AssetStatus::Assigned {
        return Err(CoreError::Conflict(
            "Asset is already assigned; check it in before assigning it again".into(),
        ));
    }

    if !from.can_transition(to) {
        return Err(CoreError::Validation(format!(
            "Invalid transition: cannot move asset from '{from}' to '{to}'. \
             Allowed transitions: {:?}",
            from.valid_transitions()
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
        )));
    }

    Ok(match (from, to) {
        (_, AssetStatus::Assigned) => LedgerEffect::Open,
        (AssetStatus::Assigned, _) => LedgerEffect::Close,
        _ => LedgerEffect::None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
