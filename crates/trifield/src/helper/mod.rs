//! Pivot helper: complete a fixed base pair to an equilateral triangle.
//!
//! Purpose
//! - Given two fixed points A, B, construct the two apex positions of the
//!   perfect equilateral triangles on AB and report which visible points lie
//!   within a deviation tolerance of completing one.
//! - Model the interactive two-slot selection as an explicit session object.
//!
//! Construction
//! - `d = |AB|`, altitude `h = d·√3/2`, apexes at `h` from the great-circle
//!   midpoint along bearings `β ± 90°`, with `β` the bearing midpoint → B.
//! - Acceptance is the deviation test on side lengths, not distance to an apex;
//!   `search_radius_m = d · tolerance · 2` only sizes the drawn acceptance disc.
//!
//! Code cross-refs: `crate::geo::{distance_m, midpoint, destination}`

mod construct;
mod session;

pub use construct::{apexes, construct_candidates, deviation, ApexMatch, Construction};
pub use session::{HelperSession, HelperState, Slot};
