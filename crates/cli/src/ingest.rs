//! File formats: load points and catalog as CSV (polars), boundary as JSON.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use polars::prelude::*;
use rebar_zones::boundary::RegionBoundary;
use rebar_zones::geom::Polygon;
use rebar_zones::model::{Demand, LoadPoint, RebarCatalog, RebarOption};
use serde::Deserialize;

/// Demand value the upstream exports use for "direction excluded".
const EXCLUDED: f64 = -1.0;

const DEMAND_COLUMNS: [&str; 4] = ["as1x", "as2x", "as3y", "as4y"];

fn read_csv(path: &Path) -> Result<DataFrame> {
    LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading {}", path.display()))
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let s = df
        .column(name)
        .with_context(|| format!("missing column {name:?}"))?
        .cast(&DataType::Float64)
        .with_context(|| format!("column {name:?} is not numeric"))?;
    Ok(s.f64()?.into_iter().collect())
}

fn required(values: Vec<Option<f64>>, name: &str) -> Result<Vec<f64>> {
    values
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.ok_or_else(|| anyhow!("row {row}: {name} is empty")))
        .collect()
}

fn demand_value(v: Option<f64>) -> Option<f64> {
    v.filter(|x| (x - EXCLUDED).abs() > 1e-12)
}

/// Points CSV: `id,x,y,as1x,as2x,as3y,as4y`; empty or `-1` demand cells are excluded.
pub fn read_points(path: &Path) -> Result<Vec<LoadPoint>> {
    let df = read_csv(path)?;
    let ids = required(f64_column(&df, "id")?, "id")?;
    let xs = required(f64_column(&df, "x")?, "x")?;
    let ys = required(f64_column(&df, "y")?, "y")?;
    let demands = DEMAND_COLUMNS
        .iter()
        .map(|c| f64_column(&df, c))
        .collect::<Result<Vec<_>>>()?;

    let mut out = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let id = ids[row];
        if id.fract() != 0.0 || id < 0.0 || id > u32::MAX as f64 {
            bail!("row {row}: id {id} is not a valid point id");
        }
        let demand = Demand::new(std::array::from_fn(|k| demand_value(demands[k][row])));
        out.push(LoadPoint::new(id as u32, xs[row], ys[row], demand));
    }
    tracing::info!(points = out.len(), path = %path.display(), "load points read");
    Ok(out)
}

/// Catalog CSV: `name,diameter,spacing,unit_cost,capacity`. Spacing is multiplied
/// by `spacing_scale` to bring it into coordinate units.
pub fn read_catalog(path: &Path, spacing_scale: f64) -> Result<RebarCatalog> {
    let df = read_csv(path)?;
    let names: Vec<Option<String>> = df
        .column("name")
        .context("missing column \"name\"")?
        .cast(&DataType::String)?
        .str()?
        .into_iter()
        .map(|s| s.map(str::to_string))
        .collect();
    let diameter = required(f64_column(&df, "diameter")?, "diameter")?;
    let spacing = required(f64_column(&df, "spacing")?, "spacing")?;
    let unit_cost = required(f64_column(&df, "unit_cost")?, "unit_cost")?;
    let capacity = required(f64_column(&df, "capacity")?, "capacity")?;

    let options = names
        .into_iter()
        .enumerate()
        .map(|(row, name)| {
            RebarOption::new(
                name.unwrap_or_else(|| format!("option-{row}")),
                diameter[row],
                spacing[row] * spacing_scale,
                unit_cost[row],
                capacity[row],
            )
        })
        .collect();
    let catalog = RebarCatalog::new(options).with_context(|| format!("catalog {}", path.display()))?;
    tracing::info!(options = catalog.options().len(), "rebar catalog read");
    Ok(catalog)
}

#[derive(Deserialize)]
struct BoundaryFile {
    outer: Vec<[f64; 2]>,
    #[serde(default)]
    holes: Vec<Vec<[f64; 2]>>,
}

fn to_polygon(vertices: &[[f64; 2]]) -> Polygon {
    let xy: Vec<(f64, f64)> = vertices.iter().map(|&[x, y]| (x, y)).collect();
    Polygon::from_xy(&xy)
}

/// Boundary JSON: `{"outer": [[x, y], ...], "holes": [[[x, y], ...], ...]}`.
pub fn read_boundary(path: &Path) -> Result<RegionBoundary> {
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file: BoundaryFile =
        serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(RegionBoundary::new(
        to_polygon(&file.outer),
        file.holes.iter().map(|h| to_polygon(h)).collect(),
    ))
}

/// Write points in the format `read_points` accepts.
pub fn write_points(path: &Path, points: &[LoadPoint]) -> Result<()> {
    let demand_col = |k: usize| -> Vec<f64> {
        points
            .iter()
            .map(|p| p.demand.0[k].unwrap_or(EXCLUDED))
            .collect()
    };
    let mut df = df!(
        "id" => points.iter().map(|p| p.id.0).collect::<Vec<_>>(),
        "x" => points.iter().map(|p| p.pos.x).collect::<Vec<_>>(),
        "y" => points.iter().map(|p| p.pos.y).collect::<Vec<_>>(),
        DEMAND_COLUMNS[0] => demand_col(0),
        DEMAND_COLUMNS[1] => demand_col(1),
        DEMAND_COLUMNS[2] => demand_col(2),
        DEMAND_COLUMNS[3] => demand_col(3),
    )?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
