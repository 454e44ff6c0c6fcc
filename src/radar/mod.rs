// airguardian-radar/src/radar/mod.rs
// Radar endpoint: token -> OpenSky fetch -> transformed aircraft list

pub mod service;
pub mod transform;

pub use service::{router, RadarService};
pub use transform::transform;
