//! Greedy agglomerative zone search.
//!
//! Purpose
//! - Start from one zone per feasible load point and repeatedly merge the best
//!   pair of active zones, recording a snapshot after every merge. Return the
//!   cheapest snapshots ranked by total cost.
//!
//! Algorithm
//! - Each iteration picks, among pairs whose envelope fits on the slab, any
//!   overlapping pair first (smallest id pair), otherwise the pair with the
//!   largest merge benefit `cost(a) + cost(b) − cost(a ∪ b) + zone_count_bonus`.
//! - Stops when no pair is feasible, when no overlap remains and the best
//!   benefit does not exceed `min_benefit`, at `max_iterations`, or on cancel.
//! - Pair verdicts are cached; a merge only evaluates the new zone against the
//!   survivors. Fresh pairs are evaluated on rayon once there are enough of them.
//!
//! Conventions
//! - Zone ids follow creation order: singletons in input order, then merges.
//! - Snapshot totals sum feasible zones only; infeasible singletons are dropped
//!   up front and reported.

mod candidates;
mod types;

pub use types::{CancelToken, OptimizationReport, OptimizerCfg, Solution, Termination};

use std::collections::HashSet;
use std::sync::Arc;

use crate::boundary::RegionBoundary;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result};
use crate::model::{LoadPoint, LoadPointId, RebarCatalog};
use crate::zone::{PricingCtx, Zone, ZoneCost, ZoneId};

use candidates::{Candidate, PairCache};

/// Sort snapshots by total cost (stable, so ties keep step order), keep the
/// first `max_solutions`, and number them from 1.
pub fn rank_solutions(history: &[Solution], max_solutions: usize) -> Vec<Solution> {
    let mut ranked = history.to_vec();
    ranked.sort_by(|a, b| a.total_cost.total_cmp(&b.total_cost));
    ranked.truncate(max_solutions);
    for (k, s) in ranked.iter_mut().enumerate() {
        s.rank = Some(k + 1);
    }
    ranked
}

/// Validated inputs for repeated runs over different load-point sets.
#[derive(Clone, Debug)]
pub struct ZoneOptimizer {
    boundary: RegionBoundary,
    catalog: RebarCatalog,
    cfg: OptimizerCfg,
}

impl ZoneOptimizer {
    pub fn new(boundary: RegionBoundary, catalog: RebarCatalog, cfg: OptimizerCfg) -> Result<Self> {
        cfg.validate()?;
        let boundary = boundary.validated(cfg.geom.eps)?;
        Ok(Self {
            boundary,
            catalog,
            cfg,
        })
    }

    #[inline]
    pub fn cfg(&self) -> &OptimizerCfg {
        &self.cfg
    }

    #[inline]
    pub fn boundary(&self) -> &RegionBoundary {
        &self.boundary
    }

    #[inline]
    pub fn catalog(&self) -> &RebarCatalog {
        &self.catalog
    }

    fn pricing_ctx(&self) -> PricingCtx<'_> {
        PricingCtx {
            catalog: &self.catalog,
            basic_threshold: self.cfg.basic_threshold,
            openings: &self.boundary.holes,
            deduction: self.cfg.opening_deduction,
            eps: self.cfg.geom.eps,
        }
    }

    pub fn run(&self, points: &[LoadPoint]) -> Result<OptimizationReport> {
        self.run_with_cancel(points, &CancelToken::default())
    }

    /// Run the search; `cancel` is polled once per outer iteration and a
    /// cancelled run still returns the snapshots recorded so far.
    pub fn run_with_cancel(&self, points: &[LoadPoint], cancel: &CancelToken) -> Result<OptimizationReport> {
        validate_points(points)?;
        Runner::new(self, cancel).run(points)
    }
}

fn validate_points(points: &[LoadPoint]) -> Result<()> {
    if points.is_empty() {
        return Err(Error::EmptyLoadPoints);
    }
    let mut seen = HashSet::with_capacity(points.len());
    for p in points {
        p.validate()?;
        if !seen.insert(p.id) {
            return Err(Error::DuplicateLoadPoint(p.id));
        }
    }
    Ok(())
}

/// One run's mutable state.
struct Runner<'a> {
    opt: &'a ZoneOptimizer,
    ctx: PricingCtx<'a>,
    cancel: &'a CancelToken,
    next_id: u64,
    active: Vec<Arc<Zone>>,
    cache: PairCache,
    history: Vec<Solution>,
    diagnostics: Diagnostics,
}

impl<'a> Runner<'a> {
    fn new(opt: &'a ZoneOptimizer, cancel: &'a CancelToken) -> Self {
        Self {
            opt,
            ctx: opt.pricing_ctx(),
            cancel,
            next_id: 0,
            active: Vec::new(),
            cache: PairCache::default(),
            history: Vec::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    fn fresh_id(&mut self) -> ZoneId {
        let id = ZoneId(self.next_id);
        self.next_id += 1;
        id
    }

    fn run(mut self, points: &[LoadPoint]) -> Result<OptimizationReport> {
        let cfg = self.opt.cfg;
        let dropped = self.seed_singletons(points);
        if self.active.is_empty() {
            tracing::warn!(points = points.len(), "no load point is individually feasible");
            return Ok(OptimizationReport {
                termination: Termination::NoFeasiblePartition,
                iterations: 0,
                solutions: Vec::new(),
                history: Vec::new(),
                dropped,
                diagnostics: self.diagnostics.into_vec(),
            });
        }
        self.history.push(Solution::snapshot(0, &self.active));

        let mut pending = all_pairs(&self.active);
        let mut iterations = 0;
        let termination = loop {
            if self.cancel.is_cancelled() {
                break Termination::Cancelled;
            }
            if iterations >= cfg.max_iterations {
                break Termination::IterationLimit;
            }
            self.cache.evaluate(
                std::mem::take(&mut pending),
                &self.opt.boundary,
                &self.ctx,
                cfg.zone_count_bonus,
                cfg.parallel_min_pairs,
            );
            let Some(best) = self.cache.best(cfg.parallel_min_pairs) else {
                break Termination::NoFeasiblePair;
            };
            if !best.mandatory && best.benefit <= cfg.min_benefit {
                break Termination::NoBeneficialMerge;
            }
            iterations += 1;
            pending = self.commit(best);
        };

        let solutions = rank_solutions(&self.history, cfg.max_solutions);
        tracing::info!(
            ?termination,
            iterations,
            snapshots = self.history.len(),
            zones = self.active.len(),
            best_cost = ?solutions.first().map(|s| s.total_cost),
            "zone search finished"
        );
        Ok(OptimizationReport {
            termination,
            iterations,
            solutions,
            history: self.history,
            dropped,
            diagnostics: self.diagnostics.into_vec(),
        })
    }

    /// Build one zone per point; infeasible ones are dropped and reported.
    fn seed_singletons(&mut self, points: &[LoadPoint]) -> Vec<LoadPointId> {
        let mut dropped = Vec::new();
        for p in points {
            let id = self.fresh_id();
            let z = Zone::singleton(id, p, self.opt.cfg.expansion_size, &self.ctx);
            match *z.price() {
                ZoneCost::Infeasible { direction, demand } => {
                    self.diagnostics.push(Diagnostic::ZoneInfeasible {
                        members: vec![p.id],
                        direction,
                        demand,
                    });
                    dropped.push(p.id);
                }
                ZoneCost::Feasible { .. } => {
                    self.diagnostics.record_degeneracies(&z);
                    self.active.push(Arc::new(z));
                }
            }
        }
        dropped
    }

    /// Apply the chosen merge. Returns the pairs that still need a verdict.
    fn commit(&mut self, best: Candidate) -> Vec<(Arc<Zone>, Arc<Zone>)> {
        let (ka, kb) = best.pair;
        let (Some(ia), Some(ib)) = (self.position(ka), self.position(kb)) else {
            // stale verdict
            self.cache.reject(best.pair);
            return Vec::new();
        };
        let id = self.fresh_id();
        // Both operands are feasible and capacity does not depend on geometry,
        // so the per-direction max demand always has a qualifying option.
        let merged = self.active[ia].merge(&self.active[ib], id, &self.ctx);
        debug_assert!(merged.is_feasible());
        tracing::debug!(
            left = ka.0,
            right = kb.0,
            merged = id.0,
            mandatory = best.mandatory,
            benefit = best.benefit,
            active = self.active.len() - 1,
            cached_pairs = self.cache.len(),
            "merge"
        );
        self.diagnostics.record_degeneracies(&merged);

        let (lo, hi) = if ia < ib { (ia, ib) } else { (ib, ia) };
        self.active.remove(hi);
        self.active[lo] = Arc::new(merged);
        self.cache.retire(ka);
        self.cache.retire(kb);
        self.history.push(Solution::snapshot(self.history.len(), &self.active));

        let fresh = &self.active[lo];
        self.active
            .iter()
            .filter(|z| z.id() != id)
            .map(|z| (Arc::clone(fresh), Arc::clone(z)))
            .collect()
    }

    fn position(&self, id: ZoneId) -> Option<usize> {
        self.active.iter().position(|z| z.id() == id)
    }
}

fn all_pairs(zones: &[Arc<Zone>]) -> Vec<(Arc<Zone>, Arc<Zone>)> {
    let mut out = Vec::with_capacity(zones.len() * zones.len().saturating_sub(1) / 2);
    for (i, a) in zones.iter().enumerate() {
        for b in &zones[i + 1..] {
            out.push((Arc::clone(a), Arc::clone(b)));
        }
    }
    out
}
