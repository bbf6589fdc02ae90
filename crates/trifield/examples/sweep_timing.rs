//! Sweep timing probe at the confirmation limit.
//!
//! Purpose
//! - Measure how long an unpivoted sweep takes at the default `maxPortals`
//!   (300 candidates, ~4.5M triples) so the confirmation limit can be judged
//!   against real numbers.
//! - Compare with the 1- and 2-pivot sweeps and one apex scan on the same cloud.

use std::time::Instant;

use trifield::geo::rand::{scatter_points, ReplayToken, ScatterCfg};
use trifield::geo::Point;
use trifield::helper::construct_candidates;
use trifield::search::{search, PivotSet};
use trifield::settings::SearchSettings;

fn main() {
    let settings = SearchSettings::default();
    let pts = scatter_points(
        Point::new(35.6812, 139.7671),
        ScatterCfg {
            count: settings.max_portals + 2,
            radius_m: 4_000.0,
        },
        ReplayToken { seed: 2025, index: 0 },
    );
    let (pivots, cands) = pts.split_at(2);

    for p in 0..=2 {
        let set = PivotSet::new(pivots[..p].to_vec()).expect("distinct pivots");
        let start = Instant::now();
        let list = search(cands, &set, &settings).expect("search succeeds");
        let ms = start.elapsed().as_secs_f64() * 1e3;
        println!(
            "pivots={p} candidates={} evaluated={} qualified={} kept={} time_ms={ms:.3}",
            cands.len(),
            list.evaluated,
            list.qualified,
            list.len()
        );
    }

    let start = Instant::now();
    let c = construct_candidates(&pivots[0], &pivots[1], 0.05, cands).expect("base is long enough");
    let ms = start.elapsed().as_secs_f64() * 1e3;
    println!(
        "apex base_m={:.1} matches={} time_ms={ms:.3}",
        c.base_distance_m,
        c.matches.len()
    );
}
