use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use trifield::finder::FinderSession;
use trifield::geo::rand::{scatter_points, ReplayToken, ScatterCfg};
use trifield::geo::{Bounds, Point};
use trifield::helper::{HelperSession, Slot};
use trifield::search::ResultList;
use trifield::score::ScoreMethod;
use trifield::settings::{save_settings, SearchSettings};
use trifield::universe::{PointCatalog, PointUniverse};

mod points;
mod provenance;
mod store;

use provenance::{InputRef, RunRecord};
use store::JsonFileStore;

#[derive(Parser)]
#[command(name = "trifield")]
#[command(about = "Find near-equilateral portal triangles")]
struct Cmd {
    /// Key-value settings store (JSON); created on first save
    #[arg(long, default_value = "trifield-settings.json")]
    settings: PathBuf,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    /// Relative side spread in %, lower is better
    Spread,
    /// Heron area ratio in %, higher is better
    Area,
}

impl From<MethodArg> for ScoreMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Spread => ScoreMethod::RelativeSpread,
            MethodArg::Area => ScoreMethod::AreaRatio,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Rank triangles among the points in view, optionally around 1-2 pivots
    Search {
        #[arg(long)]
        points: PathBuf,
        /// Viewport as south,west,north,east (degrees); whole file if omitted
        #[arg(long)]
        bounds: Option<String>,
        /// Pivot point id (repeat for two)
        #[arg(long = "pivot")]
        pivots: Vec<String>,
        #[arg(long, value_enum)]
        method: Option<MethodArg>,
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        max_results: Option<usize>,
        /// Proceed even when the candidate count exceeds maxPortals
        #[arg(long)]
        yes: bool,
        /// Persist the effective settings
        #[arg(long)]
        save: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Construct both apexes on base a-b and list points that complete it
    Apex {
        #[arg(long)]
        points: PathBuf,
        #[arg(long)]
        a: String,
        #[arg(long)]
        b: String,
        #[arg(long, default_value_t = trifield::geo::cfg::DEFAULT_MAX_DEVIATION)]
        tolerance: f64,
        #[arg(long)]
        bounds: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the stored settings, or update them from raw values
    Settings {
        #[arg(long, requires = "max_results")]
        threshold: Option<String>,
        #[arg(long, requires = "threshold")]
        max_results: Option<String>,
    },
    /// Write a seeded synthetic point cloud as JSON
    Demo {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 60)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 35.6812)]
        lat: f64,
        #[arg(long, default_value_t = 139.7671)]
        lng: f64,
        #[arg(long, default_value_t = 2_000.0)]
        radius: f64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let mut store = JsonFileStore::open(&cmd.settings)?;
    match cmd.action {
        Action::Search {
            points,
            bounds,
            pivots,
            method,
            threshold,
            max_results,
            yes,
            save,
            out,
        } => {
            let mut session = FinderSession::from_store(&store);
            let mut settings = session.settings().clone();
            if let Some(m) = method {
                let m = ScoreMethod::from(m);
                if m != settings.method {
                    settings = SearchSettings {
                        max_results: settings.max_results,
                        max_portals: settings.max_portals,
                        ..SearchSettings::for_method(m)
                    };
                }
            }
            if let Some(t) = threshold {
                settings.threshold = t;
            }
            if let Some(n) = max_results {
                settings.max_results = n;
            }
            session.set_settings(settings)?;
            if save {
                save_settings(&mut store, session.settings());
                store.flush()?;
            }
            let catalog: PointCatalog = points::load_points(&points)?.into_iter().collect();
            let view = parse_bounds(bounds.as_deref())?;
            for id in &pivots {
                if !session.pin_by_id(&catalog, &id.as_str().into())? {
                    bail!("pivot '{id}' is not in {}", points.display());
                }
            }
            let candidates = session.visible_candidates(&catalog, &view);
            if session.needs_confirmation(candidates.len()) && !yes {
                bail!(
                    "{} points in view exceed maxPortals={}; pass --yes to search anyway",
                    candidates.len(),
                    session.settings().max_portals
                );
            }
            tracing::info!(candidates = candidates.len(), pivots = pivots.len(), "search");
            let effective = session.settings().clone();
            let list = session.run(&candidates, None).await?;
            print_results(list);
            if let Some(out) = out {
                write_json(&out, list)?;
                let input = InputRef {
                    path: points,
                    points: catalog.len(),
                };
                RunRecord::new(
                    "search",
                    input,
                    json!({
                        "pivots": pivots,
                        "settings": effective,
                        "candidates": candidates.len(),
                    }),
                )
                .with_summary(json!({
                    "evaluated": list.evaluated,
                    "qualified": list.qualified,
                    "kept": list.len(),
                }))
                .write_beside(&out)?;
            }
            Ok(())
        }
        Action::Apex {
            points,
            a,
            b,
            tolerance,
            bounds,
            out,
        } => {
            let catalog: PointCatalog = points::load_points(&points)?.into_iter().collect();
            let view = parse_bounds(bounds.as_deref())?;
            let visible = catalog.query_visible(&view);
            let mut helper = HelperSession::new(tolerance)?;
            for (slot, id) in [(Slot::First, &a), (Slot::Second, &b)] {
                let p = catalog
                    .lookup(&id.as_str().into())
                    .with_context(|| format!("point '{id}' is not in {}", points.display()))?;
                helper.highlight(Some(p));
                helper.assign(slot, &visible);
            }
            let Some(c) = helper.construction() else {
                bail!("'{a}' and '{b}' are too close to construct a triangle");
            };
            println!(
                "base {} m, apexes ({:.6}, {:.6}) and ({:.6}, {:.6}), radius {:.1} m",
                c.base_distance_m.round(),
                c.apexes[0].lat,
                c.apexes[0].lng,
                c.apexes[1].lat,
                c.apexes[1].lng,
                c.search_radius_m
            );
            for m in &c.matches {
                println!(
                    "- {} deviation {:.2}% ({} m from apex {})",
                    m.point.display_label(),
                    m.deviation * 100.0,
                    m.apex_distance_m.round(),
                    m.nearest_apex + 1
                );
            }
            if let Some(out) = out {
                write_json(&out, c)?;
                let input = InputRef {
                    path: points,
                    points: catalog.len(),
                };
                RunRecord::new("apex", input, json!({ "a": a, "b": b, "tolerance": tolerance }))
                    .with_summary(json!({ "visible": visible.len(), "matches": c.matches.len() }))
                    .write_beside(&out)?;
            }
            Ok(())
        }
        Action::Settings {
            threshold,
            max_results,
        } => {
            let mut session = FinderSession::from_store(&store);
            if let (Some(t), Some(n)) = (threshold, max_results) {
                session.apply_inputs(&t, &n, &mut store)?;
                store.flush()?;
            }
            println!("{}", serde_json::to_string_pretty(session.settings())?);
            Ok(())
        }
        Action::Demo {
            out,
            count,
            seed,
            lat,
            lng,
            radius,
        } => {
            let pts = scatter_points(
                Point::new(lat, lng),
                ScatterCfg {
                    count,
                    radius_m: radius,
                },
                ReplayToken { seed, index: 0 },
            );
            let rows: Vec<_> = pts
                .iter()
                .map(|p| json!({"id": p.id, "lat": p.point.lat, "lng": p.point.lng, "title": p.label}))
                .collect();
            write_json(&out, &rows)?;
            tracing::info!(count, out = %out.display(), "demo_points_written");
            Ok(())
        }
    }
}

/// `south,west,north,east` in degrees; `None` means the whole globe.
fn parse_bounds(raw: Option<&str>) -> Result<Bounds> {
    let Some(raw) = raw else {
        return Ok(Bounds::world());
    };
    let parts: Vec<f64> = raw
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("bounds '{raw}' must be four numbers"))?;
    let [s, w, n, e] = parts[..] else {
        bail!("bounds '{raw}' must be south,west,north,east");
    };
    Ok(Bounds::from_corners(Point::new(s, w), Point::new(n, e)))
}

fn format_distance(m: f64) -> String {
    if m > 1000.0 {
        format!("{:.2} km", m / 1000.0)
    } else {
        format!("{} m", m.round())
    }
}

fn print_results(list: &ResultList) {
    if list.is_empty() {
        println!("no matching triangles");
        return;
    }
    for (i, t) in list.iter().enumerate() {
        println!(
            "{}. {}: {:.2}% (side ~{})",
            i + 1,
            list.method.label(),
            t.score,
            format_distance(t.mean_side_m)
        );
        for (v, p) in t.vertices.iter().zip(t.polygon()) {
            println!("   - {} ({:.6}, {:.6})", v.display_label(), p.lat, p.lng);
        }
    }
}

fn write_json<T: Serialize + ?Sized>(out: &Path, value: &T) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_parsing() {
        assert_eq!(parse_bounds(None).unwrap(), Bounds::world());
        let b = parse_bounds(Some("35.6, 139.7, 35.7, 139.8")).unwrap();
        assert!(b.contains(Point::new(35.65, 139.75)));
        assert!(parse_bounds(Some("1,2,3")).is_err());
        assert!(parse_bounds(Some("a,b,c,d")).is_err());
    }

    #[test]
    fn distance_formatting() {
        assert_eq!(format_distance(850.4), "850 m");
        assert_eq!(format_distance(1234.0), "1.23 km");
    }

    #[test]
    fn cli_parses_search_flags() {
        let cmd = Cmd::try_parse_from([
            "trifield", "search", "--points", "p.json", "--pivot", "a", "--pivot", "b",
            "--method", "spread", "--yes",
        ])
        .unwrap();
        match cmd.action {
            Action::Search {
                pivots, method, yes, ..
            } => {
                assert_eq!(pivots, ["a", "b"]);
                assert!(matches!(method, Some(MethodArg::Spread)));
                assert!(yes);
            }
            _ => panic!("expected search"),
        }
    }
}
