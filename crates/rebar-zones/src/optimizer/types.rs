//! Configuration, cancellation and result types for the zone search.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::geom::GeomCfg;
use crate::model::{Direction, LoadPointId};
use crate::zone::{OpeningDeduction, Zone};

/// Search configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerCfg {
    /// Basic reinforcement per direction; `None` means no basic mesh.
    pub basic_threshold: [Option<f64>; 4],
    /// Number of ranked solutions to return.
    pub max_solutions: usize,
    /// Added to every merge benefit; positive values favor fewer zones.
    pub zone_count_bonus: f64,
    /// Side of the square drawn around a lone point (working units).
    pub expansion_size: f64,
    /// Safety cap on outer iterations.
    pub max_iterations: usize,
    /// A voluntary merge is taken only when its benefit exceeds this.
    pub min_benefit: f64,
    /// Below this many fresh pairs, evaluation stays on the calling thread.
    pub parallel_min_pairs: usize,
    pub opening_deduction: OpeningDeduction,
    pub geom: GeomCfg,
}

impl Default for OptimizerCfg {
    fn default() -> Self {
        Self {
            basic_threshold: [None; 4],
            max_solutions: 5,
            zone_count_bonus: 0.0,
            expansion_size: 0.1,
            max_iterations: 1000,
            min_benefit: 0.0,
            parallel_min_pairs: 256,
            opening_deduction: OpeningDeduction::Ignore,
            geom: GeomCfg::default(),
        }
    }
}

impl OptimizerCfg {
    pub fn with_basic_threshold(mut self, direction: Direction, value: Option<f64>) -> Self {
        self.basic_threshold[direction.index()] = value;
        self
    }

    pub fn with_max_solutions(mut self, n: usize) -> Self {
        self.max_solutions = n;
        self
    }

    pub fn with_zone_count_bonus(mut self, bonus: f64) -> Self {
        self.zone_count_bonus = bonus;
        self
    }

    pub fn with_expansion_size(mut self, side: f64) -> Self {
        self.expansion_size = side;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_min_benefit(mut self, v: f64) -> Self {
        self.min_benefit = v;
        self
    }

    pub fn with_parallel_min_pairs(mut self, n: usize) -> Self {
        self.parallel_min_pairs = n;
        self
    }

    pub fn with_opening_deduction(mut self, d: OpeningDeduction) -> Self {
        self.opening_deduction = d;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(Error::InvalidConfig(msg));
        if self.max_solutions == 0 {
            return bad("max_solutions must be at least 1".into());
        }
        if !(self.expansion_size.is_finite() && self.expansion_size > 0.0) {
            return bad(format!("expansion_size {} must be positive", self.expansion_size));
        }
        if !self.zone_count_bonus.is_finite() {
            return bad("zone_count_bonus must be finite".into());
        }
        if !self.min_benefit.is_finite() {
            return bad("min_benefit must be finite".into());
        }
        if !(self.geom.eps.is_finite() && self.geom.eps > 0.0) {
            return bad(format!("eps {} must be positive", self.geom.eps));
        }
        for d in Direction::ALL {
            if let Some(t) = self.basic_threshold[d.index()] {
                if !t.is_finite() || t < 0.0 {
                    return bad(format!("basic threshold {d} = {t} must be finite and non-negative"));
                }
            }
        }
        Ok(())
    }
}

/// Cooperative stop flag, checked once per outer iteration.
///
/// Clones share state. A token built with `after_polls(n)` answers "not
/// cancelled" to its first `n` checks and trips on the next one.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    polls_left: Option<Arc<AtomicUsize>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after_polls(n: usize) -> Self {
        Self {
            flag: Arc::default(),
            polls_left: Some(Arc::new(AtomicUsize::new(n))),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.flag.load(Ordering::Relaxed) {
            return true;
        }
        let Some(left) = &self.polls_left else {
            return false;
        };
        let spent = left
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_err();
        if spent {
            self.cancel();
        }
        spent
    }
}

/// Snapshot of the active zones after a step. Zones are shared, not copied.
#[derive(Clone, Debug, Serialize)]
pub struct Solution {
    /// History position: 0 is the singleton partition, k follows the k-th merge.
    pub step: usize,
    /// 1-based rank by total cost once ranked.
    pub rank: Option<usize>,
    pub total_cost: f64,
    pub total_length: f64,
    pub zones: Vec<Arc<Zone>>,
}

impl Solution {
    /// Snapshot of feasible zones; totals are summed over them.
    pub fn snapshot(step: usize, zones: &[Arc<Zone>]) -> Self {
        let total_cost = zones.iter().filter_map(|z| z.cost()).sum();
        let total_length = zones.iter().filter_map(|z| z.length()).sum();
        Self {
            step,
            rank: None,
            total_cost,
            total_length,
            zones: zones.to_vec(),
        }
    }

    #[inline]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Member ids over all zones, sorted.
    pub fn covered_points(&self) -> Vec<LoadPointId> {
        let mut ids: Vec<_> = self.zones.iter().flat_map(|z| z.member_ids()).collect();
        ids.sort_unstable();
        ids
    }
}

/// Why the search stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// No remaining pair passes the geometric and pricing checks.
    NoFeasiblePair,
    /// No overlap left and no voluntary merge clears `min_benefit`.
    NoBeneficialMerge,
    IterationLimit,
    Cancelled,
    /// Every load point was individually infeasible.
    NoFeasiblePartition,
}

/// Outcome of one run.
#[derive(Clone, Debug, Serialize)]
pub struct OptimizationReport {
    pub termination: Termination,
    /// Merges committed.
    pub iterations: usize,
    /// Best `max_solutions` snapshots ranked 1..k by total cost.
    pub solutions: Vec<Solution>,
    /// Every snapshot in step order.
    pub history: Vec<Solution>,
    /// Points removed because their singleton zone was infeasible.
    pub dropped: Vec<LoadPointId>,
    pub diagnostics: Vec<Diagnostic>,
}

impl OptimizationReport {
    /// Rank-1 solution, if any.
    pub fn best(&self) -> Option<&Solution> {
        self.solutions.first()
    }
}
