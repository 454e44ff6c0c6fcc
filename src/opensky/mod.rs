// airguardian-radar/src/opensky/mod.rs
// Authenticated access to the OpenSky state vector API

pub mod client;

pub use client::{OpenSkyClient, StateSource};
