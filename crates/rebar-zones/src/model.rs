//! Load points and the rebar catalog.
//!
//! Both are passive inputs: load points come from an ingestion step outside the
//! crate, catalog entries from external configuration. The only behavior here is
//! validation and the cheapest-feasible query.

use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::zone::DirectionCost;

/// Identifier of a load point, unique within one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoadPointId(pub u32);

impl fmt::Display for LoadPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reinforcement direction. X directions carry bars running along X.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    As1X,
    As2X,
    As3Y,
    As4Y,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::As1X,
        Direction::As2X,
        Direction::As3Y,
        Direction::As4Y,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Direction::As1X => 0,
            Direction::As2X => 1,
            Direction::As3Y => 2,
            Direction::As4Y => 3,
        }
    }

    #[inline]
    pub fn runs_along_x(self) -> bool {
        matches!(self, Direction::As1X | Direction::As2X)
    }

    /// Case-insensitive parse of `as1x`, `as2x`, `as3y`, `as4y`.
    pub fn parse(s: &str) -> Option<Direction> {
        match s.trim().to_ascii_lowercase().as_str() {
            "as1x" => Some(Direction::As1X),
            "as2x" => Some(Direction::As2X),
            "as3y" => Some(Direction::As3Y),
            "as4y" => Some(Direction::As4Y),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::As1X => "As1X",
            Direction::As2X => "As2X",
            Direction::As3Y => "As3Y",
            Direction::As4Y => "As4Y",
        };
        f.write_str(s)
    }
}

/// Required capacity per direction; `None` marks a direction excluded from design.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Demand(pub [Option<f64>; 4]);

impl Demand {
    #[inline]
    pub fn new(values: [Option<f64>; 4]) -> Self {
        Self(values)
    }

    /// Demand in a single direction, every other direction excluded.
    pub fn only(direction: Direction, value: f64) -> Self {
        let mut v = [None; 4];
        v[direction.index()] = Some(value);
        Self(v)
    }

    #[inline]
    pub fn get(&self, direction: Direction) -> Option<f64> {
        self.0[direction.index()]
    }
}

/// A planar demand sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadPoint {
    pub id: LoadPointId,
    pub pos: Vector2<f64>,
    pub demand: Demand,
}

impl LoadPoint {
    pub fn new(id: u32, x: f64, y: f64, demand: Demand) -> Self {
        Self {
            id: LoadPointId(id),
            pos: Vector2::new(x, y),
            demand,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.pos.x.is_finite() && self.pos.y.is_finite()) {
            return Err(Error::InvalidLoadPoint {
                id: self.id,
                reason: "position is not finite".into(),
            });
        }
        for d in Direction::ALL {
            if let Some(v) = self.demand.get(d) {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::InvalidLoadPoint {
                        id: self.id,
                        reason: format!("demand {d} = {v} must be finite and non-negative"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A reinforcement product: bar diameter laid at a fixed spacing.
///
/// `spacing` is in the same length unit as point coordinates; `unit_cost` is cost
/// per unit bar length; `capacity` is the largest demand the layout supports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RebarOption {
    pub name: String,
    pub diameter: f64,
    pub spacing: f64,
    pub unit_cost: f64,
    pub capacity: f64,
}

impl RebarOption {
    pub fn new(name: impl Into<String>, diameter: f64, spacing: f64, unit_cost: f64, capacity: f64) -> Self {
        Self {
            name: name.into(),
            diameter,
            spacing,
            unit_cost,
            capacity,
        }
    }

    fn validate(&self) -> Result<()> {
        let bad = |reason: &str| Error::InvalidRebarOption {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if ![self.diameter, self.spacing, self.unit_cost, self.capacity]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(bad("fields must be finite"));
        }
        if self.unit_cost < 0.0 {
            return Err(bad("unit cost is negative"));
        }
        if self.capacity < 0.0 {
            return Err(bad("capacity is negative"));
        }
        // Non-positive spacing is tolerated here and priced as degenerate.
        Ok(())
    }
}

/// Ordered, non-empty list of rebar options.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RebarCatalog {
    options: Vec<RebarOption>,
}

impl RebarCatalog {
    pub fn new(options: Vec<RebarOption>) -> Result<Self> {
        if options.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        for o in &options {
            o.validate()?;
        }
        Ok(Self { options })
    }

    #[inline]
    pub fn options(&self) -> &[RebarOption] {
        &self.options
    }

    /// Among options with `capacity >= demand`, the one with the lowest cost as
    /// priced by `cost_of` for the caller's geometry. Ties keep catalog order.
    pub fn cheapest_feasible<F>(&self, demand: f64, mut cost_of: F) -> Option<(&RebarOption, DirectionCost)>
    where
        F: FnMut(&RebarOption) -> DirectionCost,
    {
        let mut best: Option<(&RebarOption, DirectionCost)> = None;
        for o in self.options.iter().filter(|o| o.capacity >= demand) {
            let c = cost_of(o);
            if best.as_ref().map_or(true, |(_, b)| c.cost < b.cost) {
                best = Some((o, c));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_cost(o: &RebarOption) -> DirectionCost {
        DirectionCost {
            cost: o.unit_cost,
            length: 1.0,
            degenerate: None,
        }
    }

    #[test]
    fn cheapest_feasible_filters_by_capacity() {
        let cat = RebarCatalog::new(vec![
            RebarOption::new("d8", 8.0, 0.2, 1.0, 2.0),
            RebarOption::new("d12", 12.0, 0.2, 3.0, 6.0),
            RebarOption::new("d16", 16.0, 0.2, 5.0, 10.0),
        ])
        .unwrap();
        let (o, c) = cat.cheapest_feasible(5.0, flat_cost).unwrap();
        assert_eq!(o.name, "d12");
        assert!((c.cost - 3.0).abs() < 1e-12);
        assert!(cat.cheapest_feasible(10.5, flat_cost).is_none());
        // capacity equal to demand qualifies
        assert_eq!(cat.cheapest_feasible(10.0, flat_cost).unwrap().0.name, "d16");
    }

    #[test]
    fn cheapest_feasible_uses_geometry_price_not_unit_price() {
        // Wider spacing wins despite a higher unit price once bar count is priced in.
        let cat = RebarCatalog::new(vec![
            RebarOption::new("dense", 10.0, 0.1, 1.0, 5.0),
            RebarOption::new("sparse", 14.0, 0.5, 1.5, 5.0),
        ])
        .unwrap();
        let (o, _) = cat
            .cheapest_feasible(1.0, |o| {
                let bars = (2.0 / o.spacing).ceil() + 1.0;
                DirectionCost {
                    cost: bars * o.unit_cost,
                    length: bars,
                    degenerate: None,
                }
            })
            .unwrap();
        assert_eq!(o.name, "sparse");
    }

    #[test]
    fn ties_keep_catalog_order() {
        let cat = RebarCatalog::new(vec![
            RebarOption::new("first", 8.0, 0.2, 2.0, 5.0),
            RebarOption::new("second", 8.0, 0.2, 2.0, 5.0),
        ])
        .unwrap();
        assert_eq!(cat.cheapest_feasible(1.0, flat_cost).unwrap().0.name, "first");
    }

    #[test]
    fn catalog_validation() {
        assert_eq!(RebarCatalog::new(vec![]), Err(Error::EmptyCatalog));
        assert!(matches!(
            RebarCatalog::new(vec![RebarOption::new("x", 8.0, 0.2, -1.0, 5.0)]),
            Err(Error::InvalidRebarOption { .. })
        ));
        assert!(RebarCatalog::new(vec![RebarOption::new("flat", 8.0, 0.0, 1.0, 5.0)]).is_ok());
    }

    #[test]
    fn load_point_validation() {
        assert!(LoadPoint::new(1, 0.0, 0.0, Demand::only(Direction::As1X, 2.0))
            .validate()
            .is_ok());
        assert!(LoadPoint::new(2, f64::NAN, 0.0, Demand::default()).validate().is_err());
        assert!(LoadPoint::new(3, 0.0, 0.0, Demand::only(Direction::As3Y, -0.5))
            .validate()
            .is_err());
    }

    #[test]
    fn direction_parse_and_axes() {
        assert_eq!(Direction::parse(" AS3Y "), Some(Direction::As3Y));
        assert_eq!(Direction::parse("as5"), None);
        assert!(Direction::As2X.runs_along_x());
        assert!(!Direction::As4Y.runs_along_x());
        for (k, d) in Direction::ALL.iter().enumerate() {
            assert_eq!(d.index(), k);
        }
    }
}
