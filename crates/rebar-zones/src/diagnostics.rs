//! Recoverable conditions met during a run.
//!
//! Every entry is also emitted as a `tracing` warning when recorded, so a
//! subscriber sees them live while the report keeps the complete list.

use serde::Serialize;

use crate::model::{Direction, LoadPointId};
use crate::zone::{Degeneracy, Zone};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Diagnostic {
    /// No catalog option covers the demand; the zone was dropped.
    ZoneInfeasible {
        members: Vec<LoadPointId>,
        direction: Direction,
        demand: f64,
    },
    /// Pricing hit a degenerate input and used zero cost/length for it.
    NumericDegenerate {
        members: Vec<LoadPointId>,
        detail: Degeneracy,
    },
}

/// Append-only diagnostics log owned by one optimizer run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, d: Diagnostic) {
        match &d {
            Diagnostic::ZoneInfeasible {
                members,
                direction,
                demand,
            } => tracing::warn!(?members, %direction, demand, "zone infeasible, dropped"),
            Diagnostic::NumericDegenerate { members, detail } => {
                tracing::warn!(?members, ?detail, "degenerate pricing, zero cost used")
            }
        }
        self.entries.push(d);
    }

    /// Record the degeneracies carried by a zone that entered the active set.
    pub fn record_degeneracies(&mut self, zone: &Zone) {
        if zone.degeneracies().is_empty() {
            return;
        }
        let members = zone.member_ids();
        for detail in zone.degeneracies() {
            self.push(Diagnostic::NumericDegenerate {
                members: members.clone(),
                detail: detail.clone(),
            });
        }
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
