mod ingest;
mod output;
mod provenance;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rebar_zones::model::Direction;
use rebar_zones::optimizer::{OptimizerCfg, ZoneOptimizer};
use rebar_zones::synth::{random_field, FieldCfg};
use rebar_zones::zone::OpeningDeduction;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "rebar-cli")]
#[command(about = "Reinforcement zone optimizer")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Cluster load points into priced zones and write the ranked solutions
    Optimize(OptimizeArgs),
    /// Write a seeded synthetic load-point field as CSV
    Synth {
        #[arg(long)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 10.0)]
        width: f64,
        #[arg(long, default_value_t = 10.0)]
        height: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(clap::Args)]
struct OptimizeArgs {
    /// Load points CSV: id,x,y,as1x,as2x,as3y,as4y
    #[arg(long)]
    points: PathBuf,
    /// Rebar catalog CSV: name,diameter,spacing,unit_cost,capacity
    #[arg(long)]
    catalog: PathBuf,
    /// Boundary JSON: {"outer": [[x,y],...], "holes": [...]}
    #[arg(long)]
    boundary: PathBuf,
    #[arg(long)]
    out: PathBuf,
    /// Optimizer config JSON; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    max_solutions: Option<usize>,
    #[arg(long)]
    zone_bonus: Option<f64>,
    /// Side of the square around a lone point
    #[arg(long)]
    expansion: Option<f64>,
    /// Basic reinforcement capacity for the directions in --directions
    #[arg(long)]
    threshold: Option<f64>,
    /// Directions the threshold applies to (default: all)
    #[arg(long, value_delimiter = ',')]
    directions: Vec<String>,
    /// Factor applied to catalog spacings (e.g. 0.001 for mm to m)
    #[arg(long, default_value_t = 1.0)]
    spacing_scale: f64,
    /// Deduct the clipped area of openings from bar lengths
    #[arg(long)]
    clip_openings: bool,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Optimize(args) => optimize(args),
        Action::Synth {
            count,
            seed,
            out,
            width,
            height,
        } => synth(count, seed, &out, width, height),
        Action::Report => report(),
    }
}

fn load_cfg(args: &OptimizeArgs) -> Result<OptimizerCfg> {
    let mut cfg = match &args.config {
        Some(path) => {
            let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => OptimizerCfg::default(),
    };
    if let Some(n) = args.max_solutions {
        cfg = cfg.with_max_solutions(n);
    }
    if let Some(b) = args.zone_bonus {
        cfg = cfg.with_zone_count_bonus(b);
    }
    if let Some(s) = args.expansion {
        cfg = cfg.with_expansion_size(s);
    }
    if let Some(t) = args.threshold {
        let directions = if args.directions.is_empty() {
            Direction::ALL.to_vec()
        } else {
            args.directions
                .iter()
                .map(|s| Direction::parse(s).with_context(|| format!("unknown direction {s:?}")))
                .collect::<Result<Vec<_>>>()?
        };
        cfg.basic_threshold = [None; 4];
        for d in directions {
            cfg = cfg.with_basic_threshold(d, Some(t));
        }
    } else if !args.directions.is_empty() {
        bail!("--directions needs --threshold");
    }
    if args.clip_openings {
        cfg = cfg.with_opening_deduction(OpeningDeduction::ClippedArea);
    }
    Ok(cfg)
}

fn optimize(args: OptimizeArgs) -> Result<()> {
    let cfg = load_cfg(&args)?;
    let points = ingest::read_points(&args.points)?;
    let catalog = ingest::read_catalog(&args.catalog, args.spacing_scale)?;
    let boundary = ingest::read_boundary(&args.boundary)?;
    tracing::info!(points = points.len(), holes = boundary.holes.len(), "optimize");

    let opt = ZoneOptimizer::new(boundary, catalog, cfg).context("setting up optimizer")?;
    let rep = opt.run(&points).context("running optimizer")?;
    if let Some(best) = rep.best() {
        tracing::info!(
            zones = best.zone_count(),
            cost = best.total_cost,
            length = best.total_length,
            "best solution"
        );
    }

    write_parent(&args.out)?;
    let doc = output::ReportOut::from(&rep);
    std::fs::write(&args.out, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", args.out.display()))?;

    let payload = provenance::Payload::new(serde_json::json!({
        "optimizer": cfg,
        "spacing_scale": args.spacing_scale,
    }))
    .with_input(&args.points)
    .with_input(&args.catalog)
    .with_input(&args.boundary);
    provenance::write_sidecar(&args.out, payload)?;
    Ok(())
}

fn synth(count: usize, seed: u64, out: &Path, width: f64, height: f64) -> Result<()> {
    let field = FieldCfg {
        count,
        width,
        height,
        ..FieldCfg::default()
    };
    tracing::info!(count, seed, width, height, "synth");
    let points = random_field(&field, seed);
    ingest::write_points(out, &points)?;
    let payload = provenance::Payload::new(serde_json::json!({ "field": field, "seed": seed }));
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

fn report() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&provenance::header())?);
    Ok(())
}

fn write_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args() -> OptimizeArgs {
        OptimizeArgs {
            points: PathBuf::from("p.csv"),
            catalog: PathBuf::from("c.csv"),
            boundary: PathBuf::from("b.json"),
            out: PathBuf::from("o.json"),
            config: None,
            max_solutions: None,
            zone_bonus: None,
            expansion: None,
            threshold: None,
            directions: Vec::new(),
            spacing_scale: 1.0,
            clip_openings: false,
        }
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"max_solutions": 9, "zone_count_bonus": 0.5}"#).unwrap();
        let mut a = args();
        a.config = Some(path);
        a.zone_bonus = Some(2.0);
        a.threshold = Some(1.5);
        a.directions = vec!["as1x".into(), "AS3Y".into()];
        let cfg = load_cfg(&a).unwrap();
        assert_eq!(cfg.max_solutions, 9);
        assert!((cfg.zone_count_bonus - 2.0).abs() < 1e-12);
        assert_eq!(cfg.basic_threshold, [Some(1.5), None, Some(1.5), None]);
        assert_eq!(cfg.opening_deduction, OpeningDeduction::Ignore);
        assert_eq!(cfg.max_iterations, OptimizerCfg::default().max_iterations);
    }

    #[test]
    fn bad_direction_flags_are_rejected() {
        let mut a = args();
        a.threshold = Some(1.0);
        a.directions = vec!["as9z".into()];
        assert!(load_cfg(&a).is_err());
        let mut b = args();
        b.directions = vec!["as1x".into()];
        assert!(load_cfg(&b).is_err());
    }

    #[test]
    fn optimize_end_to_end() {
        let dir = tempdir().unwrap();
        let p = |name: &str| dir.path().join(name);
        std::fs::write(
            p("points.csv"),
            "id,x,y,as1x,as2x,as3y,as4y\n1,2,2,1,-1,-1,-1\n2,2.05,2,1,-1,-1,-1\n3,8,8,-1,-1,2,-1\n",
        )
        .unwrap();
        std::fs::write(
            p("catalog.csv"),
            "name,diameter,spacing,unit_cost,capacity\nd10-200,10,200,1,5\n",
        )
        .unwrap();
        std::fs::write(p("slab.json"), r#"{"outer": [[0,0],[10,0],[10,10],[0,10]]}"#).unwrap();
        let mut a = args();
        a.points = p("points.csv");
        a.catalog = p("catalog.csv");
        a.boundary = p("slab.json");
        a.out = p("out/solutions.json");
        a.spacing_scale = 0.001;
        optimize(a).unwrap();
        let v: serde_json::Value =
            serde_json::from_slice(&std::fs::read(p("out/solutions.json")).unwrap()).unwrap();
        // the two overlapping squares around points 1 and 2 are merged
        assert_eq!(v["snapshots"], 2);
        assert!(p("out/solutions.provenance.json").exists());
    }
}
