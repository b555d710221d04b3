//! Zones: rectangular patches of load points with one rebar choice per direction.
//!
//! A `Zone` is fully priced when built and never changes afterwards; merging
//! produces a new zone. The optimizer shares zones between its active set and the
//! recorded solutions through `Arc`.

mod cost;

pub use cost::{
    clean_area_fraction, price_direction, select_rebar, Degeneracy, DirectionCost,
    OpeningDeduction, PricingCtx, RebarSelection, ZoneCost,
};

use serde::Serialize;

use crate::boundary::RegionBoundary;
use crate::geom::Rect;
use crate::model::{Direction, LoadPoint, LoadPointId, RebarOption};

/// Creation-order identifier; the optimizer's tie-break key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ZoneId(pub u64);

#[derive(Clone, Debug, Serialize)]
pub struct Zone {
    id: ZoneId,
    members: Vec<LoadPoint>,
    bounds: Rect,
    max_demand: [f64; 4],
    selected: [Option<RebarOption>; 4],
    cost: ZoneCost,
    #[serde(skip)]
    degeneracies: Vec<Degeneracy>,
}

/// Per-direction maximum over member demands, ignoring excluded directions.
fn max_demand_of<'a>(points: impl IntoIterator<Item = &'a LoadPoint>) -> [f64; 4] {
    let mut out = [0.0f64; 4];
    for p in points {
        for d in Direction::ALL {
            if let Some(v) = p.demand.get(d) {
                out[d.index()] = out[d.index()].max(v);
            }
        }
    }
    out
}

impl Zone {
    fn priced(id: ZoneId, members: Vec<LoadPoint>, bounds: Rect, max_demand: [f64; 4], ctx: &PricingCtx<'_>) -> Zone {
        let sel = select_rebar(&bounds, &max_demand, ctx);
        Zone {
            id,
            members,
            bounds,
            max_demand,
            selected: sel.selected.map(|o| o.cloned()),
            cost: sel.cost,
            degeneracies: sel.degeneracies,
        }
    }

    /// Zone of one point: a square of side `expansion` centred on it.
    pub fn singleton(id: ZoneId, point: &LoadPoint, expansion: f64, ctx: &PricingCtx<'_>) -> Zone {
        let bounds = Rect::square_around(point.pos, expansion);
        let max_demand = max_demand_of([point]);
        Zone::priced(id, vec![point.clone()], bounds, max_demand, ctx)
    }

    /// Zone over several points: their enclosing rectangle, with any axis thinner
    /// than `eps` widened to `expansion`. A single point gives the singleton square.
    /// `None` for an empty member list.
    pub fn from_points(id: ZoneId, points: Vec<LoadPoint>, expansion: f64, ctx: &PricingCtx<'_>) -> Option<Zone> {
        match points.len() {
            0 => None,
            1 => Some(Zone::singleton(id, &points[0], expansion, ctx)),
            _ => {
                let bounds = Rect::enclosing(points.iter().map(|p| p.pos))?.padded_to(expansion, ctx.eps);
                let max_demand = max_demand_of(&points);
                Some(Zone::priced(id, points, bounds, max_demand, ctx))
            }
        }
    }

    /// Union of members, envelope of bounds, per-direction max demand; repriced.
    pub fn merge(&self, other: &Zone, id: ZoneId, ctx: &PricingCtx<'_>) -> Zone {
        let mut members = Vec::with_capacity(self.members.len() + other.members.len());
        members.extend_from_slice(&self.members);
        members.extend_from_slice(&other.members);
        let bounds = self.bounds.union(&other.bounds);
        let max_demand = std::array::from_fn(|k| self.max_demand[k].max(other.max_demand[k]));
        Zone::priced(id, members, bounds, max_demand, ctx)
    }

    /// The envelope of both zones fits on the slab: corners inside the outer
    /// contour and outside every hole, no envelope edge touching any loop edge.
    /// Symmetric in its operands.
    pub fn is_merge_feasible(&self, other: &Zone, boundary: &RegionBoundary, eps: f64) -> bool {
        boundary.admits_rect(&self.bounds.union(&other.bounds), eps)
    }

    /// `(self.cost + other.cost − merged.cost) + zone_count_bonus`.
    ///
    /// `None` when either operand is infeasible. Two feasible operands always
    /// give a feasible merged price, since catalog capacity is independent of the
    /// rectangle. Only the price of the hypothetical merged zone is computed;
    /// nothing is allocated for members.
    pub fn merge_benefit(&self, other: &Zone, ctx: &PricingCtx<'_>, zone_count_bonus: f64) -> Option<f64> {
        let a = self.cost.cost()?;
        let b = other.cost.cost()?;
        let bounds = self.bounds.union(&other.bounds);
        let max_demand: [f64; 4] = std::array::from_fn(|k| self.max_demand[k].max(other.max_demand[k]));
        let merged = select_rebar(&bounds, &max_demand, ctx).cost.cost()?;
        Some((a + b - merged) + zone_count_bonus)
    }

    #[inline]
    pub fn overlaps(&self, other: &Zone, eps: f64) -> bool {
        self.bounds.overlaps(&other.bounds, eps)
    }

    #[inline]
    pub fn id(&self) -> ZoneId {
        self.id
    }

    #[inline]
    pub fn members(&self) -> &[LoadPoint] {
        &self.members
    }

    pub fn member_ids(&self) -> Vec<LoadPointId> {
        self.members.iter().map(|p| p.id).collect()
    }

    #[inline]
    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    #[inline]
    pub fn max_demand(&self, direction: Direction) -> f64 {
        self.max_demand[direction.index()]
    }

    #[inline]
    pub fn selected(&self, direction: Direction) -> Option<&RebarOption> {
        self.selected[direction.index()].as_ref()
    }

    #[inline]
    pub fn price(&self) -> &ZoneCost {
        &self.cost
    }

    /// Total cost, `None` if infeasible.
    #[inline]
    pub fn cost(&self) -> Option<f64> {
        self.cost.cost()
    }

    /// Total bar length, `None` if infeasible.
    #[inline]
    pub fn length(&self) -> Option<f64> {
        self.cost.length()
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.cost.is_feasible()
    }

    #[inline]
    pub fn degeneracies(&self) -> &[Degeneracy] {
        &self.degeneracies
    }
}
