// airguardian-radar/src/grid/mod.rs
// Military grid reference (MGRS) encoding of geographic positions

pub mod mgrs;

pub use mgrs::encode;
