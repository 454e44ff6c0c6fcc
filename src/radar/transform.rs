// airguardian-radar/src/radar/transform.rs
// Raw state vectors -> sorted, classified aircraft records

use tracing::debug;

use crate::grid;
use crate::types::{AircraftRecord, AircraftState, AltitudeClass, SpeedClass};

/// MGRS digits per axis for the reported position (10km squares)
pub const GRID_PRECISION: usize = 1;

const FAST_SPEED: f64 = 140.0;
const SUPERSONIC_SPEED: f64 = 280.0;
const LOW_ALTITUDE: f64 = 300.0;
const HIGH_ALTITUDE: f64 = 3000.0;

impl SpeedClass {
    pub fn from_ground_speed(speed: f64) -> Self {
        if speed < FAST_SPEED {
            SpeedClass::Slow
        } else if speed < SUPERSONIC_SPEED {
            SpeedClass::Fast
        } else {
            SpeedClass::Supersonic
        }
    }
}

impl AltitudeClass {
    pub fn from_baro_altitude(altitude: f64) -> Self {
        if altitude < LOW_ALTITUDE {
            AltitudeClass::Surface
        } else if altitude < HIGH_ALTITUDE {
            AltitudeClass::Low
        } else {
            AltitudeClass::High
        }
    }
}

/// Airborne aircraft only, sorted by aircraft id. The sort is stable for equal ids.
pub fn transform(states: &[AircraftState]) -> Vec<AircraftRecord> {
    let mut records: Vec<AircraftRecord> = states
        .iter()
        .filter(|state| !state.on_ground)
        .filter_map(to_record)
        .collect();

    records.sort_by(|a, b| a.aircraft_id.cmp(&b.aircraft_id));
    records
}

fn to_record(state: &AircraftState) -> Option<AircraftRecord> {
    let (Some(lon), Some(lat)) = (state.longitude, state.latitude) else {
        debug!("Dropping {} without position", state.icao24);
        return None;
    };

    let position = match grid::encode(lon, lat, GRID_PRECISION) {
        Ok(position) => position,
        Err(e) => {
            debug!("Dropping {}: {}", state.icao24, e);
            return None;
        }
    };

    Some(AircraftRecord {
        id: 0,
        aircraft_id: state.callsign.as_deref().unwrap_or_default().trim().to_string(),
        position,
        speed: SpeedClass::from_ground_speed(state.velocity.unwrap_or(0.0)),
        direction: direction(state.true_track.unwrap_or(0.0)),
        altitude: AltitudeClass::from_baro_altitude(state.baro_altitude.unwrap_or(0.0)),
        details: state.origin_country.clone(),
    })
}

// halves round up, 359.5 becomes 360
fn direction(true_track: f64) -> i32 {
    (true_track + 0.5).floor() as i32
}
