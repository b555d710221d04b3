//! Reinforcement zone clustering for slabs.
//!
//! Groups load points that share a reinforcement requirement into rectangular
//! zones, prices each zone with the cheapest catalog option per direction, and
//! merges zones greedily while that lowers total cost. Every intermediate
//! partition is kept so callers can pick among the cheapest ones.
//!
//! Layout
//! - `geom`: tolerance-aware planar predicates, rectangles and clipping.
//! - `model`, `boundary`: validated inputs (load points, catalog, slab contour).
//! - `zone`: immutable priced zones and the merge/benefit primitives.
//! - `optimizer`: the agglomerative search, its configuration and report.
//! - `diagnostics`: recoverable conditions collected during a run.
//! - `synth`: seeded load-point fields for demos and benches.
//!
//! Units
//! - Coordinates, spacings and the expansion size share one length unit; cost is
//!   per unit bar length in that unit.

pub mod boundary;
pub mod diagnostics;
pub mod error;
pub mod geom;
pub mod model;
pub mod optimizer;
pub mod synth;
pub mod zone;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};

/// Common exports for callers driving a full run.
pub mod prelude {
    pub use crate::boundary::RegionBoundary;
    pub use crate::diagnostics::Diagnostic;
    pub use crate::error::{Error, Result};
    pub use crate::geom::{GeomCfg, Polygon, Rect};
    pub use crate::model::{Demand, Direction, LoadPoint, LoadPointId, RebarCatalog, RebarOption};
    pub use crate::optimizer::{
        rank_solutions, CancelToken, OptimizationReport, OptimizerCfg, Solution, Termination,
        ZoneOptimizer,
    };
    pub use crate::synth::{random_field, FieldCfg};
    pub use crate::zone::{OpeningDeduction, Zone, ZoneCost, ZoneId};
    pub use nalgebra::Vector2 as Vec2;
}
