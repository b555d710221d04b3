//! JSON shape of an optimization report as written by `optimize`.

use rebar_zones::diagnostics::Diagnostic;
use rebar_zones::model::{Direction, LoadPointId};
use rebar_zones::optimizer::{OptimizationReport, Solution, Termination};
use rebar_zones::zone::Zone;
use serde::Serialize;

#[derive(Serialize)]
pub struct ReportOut<'a> {
    pub termination: Termination,
    pub iterations: usize,
    pub snapshots: usize,
    pub dropped: &'a [LoadPointId],
    pub diagnostics: &'a [Diagnostic],
    pub solutions: Vec<SolutionOut>,
}

#[derive(Serialize)]
pub struct SolutionOut {
    pub rank: Option<usize>,
    pub step: usize,
    pub total_cost: f64,
    pub total_length: f64,
    pub zones: Vec<ZoneOut>,
}

#[derive(Serialize)]
pub struct SelectionOut {
    pub direction: Direction,
    pub max_demand: f64,
    pub option: Option<String>,
}

#[derive(Serialize)]
pub struct ZoneOut {
    pub id: u64,
    pub members: Vec<LoadPointId>,
    pub min: [f64; 2],
    pub max: [f64; 2],
    pub cost: Option<f64>,
    pub length: Option<f64>,
    pub selection: Vec<SelectionOut>,
}

impl From<&Zone> for ZoneOut {
    fn from(z: &Zone) -> Self {
        let b = z.bounds();
        ZoneOut {
            id: z.id().0,
            members: z.member_ids(),
            min: [b.min.x, b.min.y],
            max: [b.max.x, b.max.y],
            cost: z.cost(),
            length: z.length(),
            selection: Direction::ALL
                .iter()
                .map(|&d| SelectionOut {
                    direction: d,
                    max_demand: z.max_demand(d),
                    option: z.selected(d).map(|o| o.name.clone()),
                })
                .collect(),
        }
    }
}

impl From<&Solution> for SolutionOut {
    fn from(s: &Solution) -> Self {
        SolutionOut {
            rank: s.rank,
            step: s.step,
            total_cost: s.total_cost,
            total_length: s.total_length,
            zones: s.zones.iter().map(|z| ZoneOut::from(z.as_ref())).collect(),
        }
    }
}

impl<'a> From<&'a OptimizationReport> for ReportOut<'a> {
    fn from(r: &'a OptimizationReport) -> Self {
        ReportOut {
            termination: r.termination,
            iterations: r.iterations,
            snapshots: r.history.len(),
            dropped: &r.dropped,
            diagnostics: &r.diagnostics,
            solutions: r.solutions.iter().map(SolutionOut::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebar_zones::prelude::{
        Demand, LoadPoint, OptimizerCfg, RebarCatalog, RebarOption, RegionBoundary, ZoneOptimizer,
    };
    use serde_json::Value;

    #[test]
    fn report_json_lists_ranked_zones() {
        let opt = ZoneOptimizer::new(
            RegionBoundary::rectangle(10.0, 10.0),
            RebarCatalog::new(vec![RebarOption::new("d10", 10.0, 0.2, 1.0, 5.0)]).unwrap(),
            OptimizerCfg::default().with_expansion_size(0.2),
        )
        .unwrap();
        let pts = vec![
            LoadPoint::new(1, 2.0, 2.0, Demand::only(Direction::As1X, 1.0)),
            LoadPoint::new(2, 7.0, 7.0, Demand::only(Direction::As4Y, 2.0)),
        ];
        let rep = opt.run(&pts).unwrap();
        let v: Value = serde_json::to_value(ReportOut::from(&rep)).unwrap();
        assert_eq!(v["termination"], "NoBeneficialMerge");
        assert_eq!(v["solutions"][0]["rank"], 1);
        let zones = v["solutions"][0]["zones"].as_array().unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0]["members"][0], 1);
        assert_eq!(zones[0]["selection"][0]["option"], "d10");
        assert!(zones[0]["selection"][2]["option"].is_null());
        assert_eq!(zones[1]["selection"][3]["option"], "d10");
    }
}
