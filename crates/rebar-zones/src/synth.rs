//! Seeded synthetic load-point fields for demos, benches and tests.
//!
//! Model
//! - Points are uniform in a rectangle shrunk by `margin` on every side, so
//!   singleton squares stay clear of the outer contour.
//! - Each direction's demand is uniform in `[0, demand_max]`, or excluded with
//!   probability `excluded_prob`.
//! - The same `(cfg, seed)` always yields the same field.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::model::{Demand, LoadPoint};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldCfg {
    pub count: usize,
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub demand_max: f64,
    /// Probability in `[0, 1]` that a direction is excluded from design.
    pub excluded_prob: f64,
}

impl Default for FieldCfg {
    fn default() -> Self {
        Self {
            count: 50,
            width: 10.0,
            height: 10.0,
            margin: 0.5,
            demand_max: 8.0,
            excluded_prob: 0.1,
        }
    }
}

/// Generate `cfg.count` load points with ids `1..=count`.
pub fn random_field(cfg: &FieldCfg, seed: u64) -> Vec<LoadPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (x0, x1) = span(cfg.margin, cfg.width - cfg.margin);
    let (y0, y1) = span(cfg.margin, cfg.height - cfg.margin);
    let p_excluded = cfg.excluded_prob.clamp(0.0, 1.0);
    let dmax = cfg.demand_max.max(0.0);
    (0..cfg.count)
        .map(|k| {
            let x = sample(&mut rng, x0, x1);
            let y = sample(&mut rng, y0, y1);
            let demand = Demand::new(std::array::from_fn(|_| {
                if rng.gen_bool(p_excluded) {
                    None
                } else {
                    Some(sample(&mut rng, 0.0, dmax))
                }
            }));
            LoadPoint::new(k as u32 + 1, x, y, demand)
        })
        .collect()
}

fn span(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        let mid = 0.5 * (lo + hi);
        (mid, mid)
    }
}

fn sample(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}
