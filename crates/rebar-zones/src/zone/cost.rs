//! Rebar selection and costing for one zone rectangle.
//!
//! Per direction: `bars = ceil(perp / spacing) + 1`, `raw = bars × parallel`,
//! `length = raw × clean_fraction`, `cost = length × unit_cost`. The ceiling is
//! taken after subtracting `eps` so extents that are an exact multiple of the
//! spacing (up to rounding) do not gain a bar.

use serde::{Deserialize, Serialize};

use crate::geom::{area_inside_rect, Polygon, Rect};
use crate::model::{Direction, RebarCatalog, RebarOption};

/// How openings inside a zone reduce its bar length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpeningDeduction {
    /// Opening area inside a zone is taken as zero, so the clean fraction is 1.
    #[default]
    Ignore,
    /// True area of every opening clipped to the zone rectangle.
    ClippedArea,
}

/// Numeric degeneracy met while pricing; contributes zero cost and length.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Degeneracy {
    NonPositiveSpacing { direction: Direction, option: String },
    ZeroAreaZone { direction: Direction },
}

/// Cost and bar length of one direction.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionCost {
    pub cost: f64,
    pub length: f64,
    pub degenerate: Option<Degeneracy>,
}

impl DirectionCost {
    fn zero(degenerate: Degeneracy) -> Self {
        Self {
            cost: 0.0,
            length: 0.0,
            degenerate: Some(degenerate),
        }
    }
}

/// Tagged zone price. `Infeasible` replaces a reserved "huge cost" value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum ZoneCost {
    Feasible { cost: f64, length: f64 },
    Infeasible { direction: Direction, demand: f64 },
}

impl ZoneCost {
    #[inline]
    pub fn cost(&self) -> Option<f64> {
        match *self {
            ZoneCost::Feasible { cost, .. } => Some(cost),
            ZoneCost::Infeasible { .. } => None,
        }
    }

    #[inline]
    pub fn length(&self) -> Option<f64> {
        match *self {
            ZoneCost::Feasible { length, .. } => Some(length),
            ZoneCost::Infeasible { .. } => None,
        }
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self, ZoneCost::Feasible { .. })
    }
}

/// Everything pricing needs besides the zone itself.
#[derive(Clone, Copy, Debug)]
pub struct PricingCtx<'a> {
    pub catalog: &'a RebarCatalog,
    /// Basic reinforcement per direction; demands at or below it need no extra rebar.
    pub basic_threshold: [Option<f64>; 4],
    pub openings: &'a [Polygon],
    pub deduction: OpeningDeduction,
    pub eps: f64,
}

/// Result of `select_rebar`: per-direction choice plus the tagged total.
#[derive(Clone, Debug)]
pub struct RebarSelection<'c> {
    pub selected: [Option<&'c RebarOption>; 4],
    pub cost: ZoneCost,
    pub degeneracies: Vec<Degeneracy>,
}

/// Share of the zone area not covered by openings, in `[0, 1]`.
pub fn clean_area_fraction(bounds: &Rect, openings: &[Polygon], deduction: OpeningDeduction) -> f64 {
    let area = bounds.area();
    if area <= 0.0 {
        return 0.0;
    }
    let open = match deduction {
        OpeningDeduction::Ignore => 0.0,
        OpeningDeduction::ClippedArea => openings.iter().map(|h| area_inside_rect(h, bounds)).sum(),
    };
    ((area - open) / area).clamp(0.0, 1.0)
}

/// Price `option` laid in `direction` over `bounds`.
pub fn price_direction(
    bounds: &Rect,
    direction: Direction,
    option: &RebarOption,
    clean_fraction: f64,
    eps: f64,
) -> DirectionCost {
    let (parallel, perp) = if direction.runs_along_x() {
        (bounds.width(), bounds.height())
    } else {
        (bounds.height(), bounds.width())
    };
    if parallel <= eps || perp <= eps {
        return DirectionCost::zero(Degeneracy::ZeroAreaZone { direction });
    }
    if option.spacing <= 0.0 {
        return DirectionCost::zero(Degeneracy::NonPositiveSpacing {
            direction,
            option: option.name.clone(),
        });
    }
    let bars = (perp / option.spacing - eps).ceil().max(0.0) + 1.0;
    let length = bars * parallel * clean_fraction;
    DirectionCost {
        cost: length * option.unit_cost,
        length,
        degenerate: None,
    }
}

/// Pick the cheapest feasible option per direction and total the zone price.
///
/// A direction needs rebar when its demand is positive and above the basic
/// threshold (if one is set). The first required direction without any
/// qualifying option makes the whole zone infeasible.
pub fn select_rebar<'c>(bounds: &Rect, max_demand: &[f64; 4], ctx: &PricingCtx<'c>) -> RebarSelection<'c> {
    let clean = clean_area_fraction(bounds, ctx.openings, ctx.deduction);
    let mut selected = [None; 4];
    let mut degeneracies = Vec::new();
    let (mut cost, mut length) = (0.0, 0.0);
    for d in Direction::ALL {
        let demand = max_demand[d.index()];
        let covered_by_basic = ctx.basic_threshold[d.index()].is_some_and(|t| demand <= t);
        if demand <= 0.0 || covered_by_basic {
            continue;
        }
        let found = ctx
            .catalog
            .cheapest_feasible(demand, |o| price_direction(bounds, d, o, clean, ctx.eps));
        match found {
            Some((option, priced)) => {
                selected[d.index()] = Some(option);
                cost += priced.cost;
                length += priced.length;
                degeneracies.extend(priced.degenerate);
            }
            None => {
                return RebarSelection {
                    selected,
                    cost: ZoneCost::Infeasible { direction: d, demand },
                    degeneracies,
                };
            }
        }
    }
    RebarSelection {
        selected,
        cost: ZoneCost::Feasible { cost, length },
        degeneracies,
    }
}
