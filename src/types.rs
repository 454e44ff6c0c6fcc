use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// One OpenSky state vector. Upstream sends it as a positional JSON array, which the
/// derived `Deserialize` maps onto the fields in declaration order.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AircraftState {
    pub icao24: String,
    pub callsign: Option<String>,
    pub origin_country: String,
    pub time_position: Option<i64>,
    pub last_contact: i64,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub baro_altitude: Option<f64>,
    pub on_ground: bool,
    pub velocity: Option<f64>,
    pub true_track: Option<f64>,
    pub vertical_rate: Option<f64>,
    pub sensors: Option<Vec<i64>>,
    pub geo_altitude: Option<f64>,
    pub squawk: Option<String>,
    pub spi: bool,
    pub position_source: u8,

    // only present for `extended=1` requests
    #[serde(default)]
    pub category: Option<u8>,
}

/// Body of `GET /api/states/all`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub time: i64,

    #[serde(default, deserialize_with = "lenient_states")]
    pub states: Vec<AircraftState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedClass {
    Slow,
    Fast,
    Supersonic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AltitudeClass {
    Surface,
    Low,
    High,
}

/// What `/radar/aircraft` reports per airborne aircraft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AircraftRecord {
    pub id: u32, // always 0, kept for client compatibility
    pub aircraft_id: String,
    pub position: String,
    pub speed: SpeedClass,
    pub direction: i32,
    pub altitude: AltitudeClass,
    pub details: String,
}

// `states` is null when nothing is in the box. Entries that don't match the tuple layout are dropped
fn lenient_states<'de, D>(deserializer: D) -> Result<Vec<AircraftState>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::Array(entries)) = value else {
        return Ok(Vec::new());
    };

    let states = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<AircraftState>(entry) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("⚠️  Skipping malformed state vector: {}", e);
                None
            }
        })
        .collect();

    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_from_positional_array() {
        let state: AircraftState = serde_json::from_value(json!([
            "4601f5", "FIN6HT  ", "Finland", 1698500000, 1698500100,
            24.93, 60.17, 3500.0, false, 210.5, 45.6, -2.1,
            null, 3600.0, "1200", false, 0, 3
        ]))
        .unwrap();

        assert_eq!(state.icao24, "4601f5");
        assert_eq!(state.callsign.as_deref(), Some("FIN6HT  "));
        assert_eq!(state.longitude, Some(24.93));
        assert_eq!(state.baro_altitude, Some(3500.0));
        assert!(!state.on_ground);
        assert_eq!(state.sensors, None);
        assert_eq!(state.category, Some(3));
    }

    #[test]
    fn test_category_is_optional() {
        let state: AircraftState = serde_json::from_value(json!([
            "4601f5", null, "Finland", null, 1698500100,
            null, null, null, true, null, null, null,
            [1, 2], null, null, false, 0
        ]))
        .unwrap();

        assert_eq!(state.category, None);
        assert_eq!(state.callsign, None);
        assert_eq!(state.sensors, Some(vec![1, 2]));
    }

    #[test]
    fn test_null_or_missing_states_are_empty() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"time": 1698500000, "states": null}"#).unwrap();
        assert_eq!(snapshot.time, 1698500000);
        assert!(snapshot.states.is_empty());

        let snapshot: Snapshot = serde_json::from_str(r#"{"time": 1698500000}"#).unwrap();
        assert!(snapshot.states.is_empty());

        let snapshot: Snapshot = serde_json::from_str(r#"{"time": 1, "states": "nope"}"#).unwrap();
        assert!(snapshot.states.is_empty());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "time": 1698500000,
            "states": [
                ["4601f5", "FIN1", "Finland", 1, 2, 24.9, 60.2, 500.0, false, 150.0, 45.6, 0.0, null, 510.0, null, false, 0],
                ["broken"],
                42
            ]
        }))
        .unwrap();

        assert_eq!(snapshot.states.len(), 1);
        assert_eq!(snapshot.states[0].icao24, "4601f5");
    }

    #[test]
    fn test_record_json_shape() {
        let record = AircraftRecord {
            id: 0,
            aircraft_id: "FIN6HT".to_string(),
            position: "35VLG87".to_string(),
            speed: SpeedClass::Supersonic,
            direction: 46,
            altitude: AltitudeClass::High,
            details: "Finland".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "id": 0,
                "aircraftId": "FIN6HT",
                "position": "35VLG87",
                "speed": "supersonic",
                "direction": 46,
                "altitude": "high",
                "details": "Finland"
            })
        );
    }
}
