//! Point files: JSON arrays (serde) or CSV/Parquet tables (polars).
//!
//! Tables need `id`, `lat`, `lng` columns; `title` is optional.

use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use serde::Deserialize;
use trifield::geo::{Point, PointRef};

#[derive(Deserialize)]
struct PointRow {
    id: String,
    lat: f64,
    lng: f64,
    #[serde(default, alias = "label")]
    title: String,
}

pub fn load_points(path: &Path) -> Result<Vec<PointRef>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let points = match ext.as_str() {
        "csv" => {
            let lf = LazyCsvReader::new(path)
                .with_infer_schema_length(Some(100))
                .finish()?;
            frame_to_points(lf.collect()?)?
        }
        "parquet" => {
            let lf = LazyFrame::scan_parquet(path, ScanArgsParquet::default())?;
            frame_to_points(lf.collect()?)?
        }
        _ => {
            let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            let rows: Vec<PointRow> = serde_json::from_slice(&raw)
                .with_context(|| format!("parsing {} as a JSON point array", path.display()))?;
            rows.into_iter()
                .map(|r| PointRef::new(r.id, Point::new(r.lat, r.lng), r.title))
                .collect()
        }
    };
    tracing::info!(path = %path.display(), count = points.len(), "points_loaded");
    Ok(points)
}

fn frame_to_points(df: DataFrame) -> Result<Vec<PointRef>> {
    let ids = df.column("id")?.cast(&DataType::String)?;
    let lats = df.column("lat")?.cast(&DataType::Float64)?;
    let lngs = df.column("lng")?.cast(&DataType::Float64)?;
    let titles = match df.column("title") {
        Ok(s) => Some(s.cast(&DataType::String)?),
        Err(_) => None,
    };
    let ids = ids.str()?;
    let lats = lats.f64()?;
    let lngs = lngs.f64()?;
    let titles = titles.as_ref().map(|s| s.str()).transpose()?;

    let mut out = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let (Some(id), Some(lat), Some(lng)) = (ids.get(i), lats.get(i), lngs.get(i)) else {
            bail!("row {i}: id, lat and lng are required");
        };
        let title = titles.and_then(|t| t.get(i)).unwrap_or_default();
        out.push(PointRef::new(id, Point::new(lat, lng), title));
    }
    Ok(out)
}
