//! Pair evaluations and the best-candidate reduction.
//!
//! A pair's verdict depends only on the two (immutable) zones, so it is computed
//! once per pair and cached until either zone retires. The reduction uses a
//! total order on candidates, which makes parallel and sequential runs agree.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::boundary::RegionBoundary;
use crate::zone::{PricingCtx, Zone, ZoneId};

/// Unordered pair key, smaller id first.
pub(crate) type PairKey = (ZoneId, ZoneId);

#[inline]
pub(crate) fn pair_key(a: ZoneId, b: ZoneId) -> PairKey {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PairEval {
    /// Envelope leaves the slab, or the merged price is infeasible.
    Infeasible,
    /// Rectangles overlap; must merge regardless of benefit.
    Mandatory,
    Voluntary(f64),
}

/// Classify one pair.
pub(crate) fn evaluate_pair(
    a: &Zone,
    b: &Zone,
    boundary: &RegionBoundary,
    ctx: &PricingCtx<'_>,
    zone_count_bonus: f64,
) -> PairEval {
    if !a.is_merge_feasible(b, boundary, ctx.eps) {
        return PairEval::Infeasible;
    }
    if a.overlaps(b, ctx.eps) {
        return PairEval::Mandatory;
    }
    match a.merge_benefit(b, ctx, zone_count_bonus) {
        Some(v) => PairEval::Voluntary(v),
        None => PairEval::Infeasible,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Candidate {
    pub pair: PairKey,
    pub mandatory: bool,
    /// Zero for mandatory candidates; only voluntary ones are ranked by it.
    pub benefit: f64,
}

impl Candidate {
    fn from_eval(pair: PairKey, eval: PairEval) -> Option<Candidate> {
        match eval {
            PairEval::Infeasible => None,
            PairEval::Mandatory => Some(Candidate {
                pair,
                mandatory: true,
                benefit: 0.0,
            }),
            PairEval::Voluntary(benefit) => Some(Candidate {
                pair,
                mandatory: false,
                benefit,
            }),
        }
    }

    /// Total preference order: mandatory before voluntary; among mandatory the
    /// smallest pair key; among voluntary the largest benefit, then the
    /// smallest pair key. `Greater` means `self` is preferred.
    fn preference(&self, other: &Candidate) -> Ordering {
        match (self.mandatory, other.mandatory) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (true, true) => other.pair.cmp(&self.pair),
            (false, false) => self
                .benefit
                .total_cmp(&other.benefit)
                .then_with(|| other.pair.cmp(&self.pair)),
        }
    }
}

/// Associative, commutative choice of the preferred candidate.
pub(crate) fn better(a: Candidate, b: Candidate) -> Candidate {
    if a.preference(&b) == Ordering::Less {
        b
    } else {
        a
    }
}

/// Cached verdicts for every pair of active zones.
#[derive(Debug, Default)]
pub(crate) struct PairCache {
    evals: BTreeMap<PairKey, PairEval>,
}

impl PairCache {
    /// Evaluate `pairs` (on rayon when there are at least `parallel_min` of them)
    /// and store the verdicts.
    pub fn evaluate(
        &mut self,
        pairs: Vec<(Arc<Zone>, Arc<Zone>)>,
        boundary: &RegionBoundary,
        ctx: &PricingCtx<'_>,
        zone_count_bonus: f64,
        parallel_min: usize,
    ) {
        let eval = |(a, b): &(Arc<Zone>, Arc<Zone>)| {
            (
                pair_key(a.id(), b.id()),
                evaluate_pair(a, b, boundary, ctx, zone_count_bonus),
            )
        };
        let fresh: Vec<(PairKey, PairEval)> = if pairs.len() >= parallel_min {
            pairs.par_iter().map(eval).collect()
        } else {
            pairs.iter().map(eval).collect()
        };
        self.evals.extend(fresh);
    }

    /// Preferred candidate over all cached verdicts.
    pub fn best(&self, parallel_min: usize) -> Option<Candidate> {
        if self.evals.len() >= parallel_min {
            self.evals
                .par_iter()
                .filter_map(|(k, e)| Candidate::from_eval(*k, *e))
                .reduce_with(better)
        } else {
            self.evals
                .iter()
                .filter_map(|(k, e)| Candidate::from_eval(*k, *e))
                .reduce(better)
        }
    }

    /// Mark a pair as never mergeable.
    pub fn reject(&mut self, key: PairKey) {
        self.evals.insert(key, PairEval::Infeasible);
    }

    /// Drop every verdict that mentions `id`.
    pub fn retire(&mut self, id: ZoneId) {
        self.evals.retain(|(a, b), _| *a != id && *b != id);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.evals.len()
    }

    #[cfg(test)]
    pub fn get(&self, key: PairKey) -> Option<PairEval> {
        self.evals.get(&key).copied()
    }
}
