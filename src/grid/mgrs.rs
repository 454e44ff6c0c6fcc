// airguardian-radar/src/grid/mgrs.rs
// WGS84 -> UTM projection and MGRS formatting

use thiserror::Error;

const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
const ECC_SQUARED: f64 = 0.00669438;
const SCALE_FACTOR: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

const MAX_PRECISION: usize = 5;

// 8 degree bands from 80S, no 'I' or 'O'. X is stretched to 84N
const LAT_BANDS: &[u8; 20] = b"CDEFGHJKLMNPQRSTUVWX";

// 100km square column letters repeat every three zones
const COLUMN_SETS: [&[u8; 8]; 3] = [b"STUVWXYZ", b"ABCDEFGH", b"JKLMNPQR"];
const ROW_LETTERS: &[u8; 20] = b"ABCDEFGHJKLMNPQRSTUV";

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("position ({lon}, {lat}) is not encodable")]
    OutOfRange { lon: f64, lat: f64 },

    #[error("precision {0} exceeds 5 digits")]
    Precision(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmPosition {
    pub zone: u8,
    pub band: char,
    pub easting: f64,
    pub northing: f64,
}

impl UtmPosition {
    pub fn from_lon_lat(lon: f64, lat: f64) -> Result<Self, GridError> {
        if !lon.is_finite() || !lat.is_finite() || !(-80.0..=84.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(GridError::OutOfRange { lon, lat });
        }

        let zone = utm_zone(lon, lat);
        let central_meridian = (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0;

        let ecc_prime_squared = ECC_SQUARED / (1.0 - ECC_SQUARED);
        let e4 = ECC_SQUARED * ECC_SQUARED;
        let e6 = e4 * ECC_SQUARED;

        let φ = lat.to_radians();
        let (sin_φ, cos_φ, tan_φ) = (φ.sin(), φ.cos(), φ.tan());

        let n = SEMI_MAJOR_AXIS / (1.0 - ECC_SQUARED * sin_φ * sin_φ).sqrt();
        let t = tan_φ * tan_φ;
        let c = ecc_prime_squared * cos_φ * cos_φ;
        let a = cos_φ * (lon.to_radians() - central_meridian.to_radians());

        let m = SEMI_MAJOR_AXIS
            * ((1.0 - ECC_SQUARED / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * φ
                - (3.0 * ECC_SQUARED / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * φ).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * φ).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * φ).sin());

        let easting = SCALE_FACTOR
            * n
            * (a + (1.0 - t + c) * a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ecc_prime_squared) * a.powi(5) / 120.0)
            + FALSE_EASTING;

        let mut northing = SCALE_FACTOR
            * (m + n * tan_φ
                * (a * a / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ecc_prime_squared) * a.powi(6) / 720.0));
        if lat < 0.0 {
            northing += FALSE_NORTHING_SOUTH;
        }

        Ok(UtmPosition { zone, band: lat_band(lat), easting, northing })
    }

    /// two letter identifier of the 100km square this position falls into
    pub fn square_id(&self) -> String {
        let easting = self.easting.trunc() as u64;
        let northing = self.northing.trunc() as u64;

        let columns = COLUMN_SETS[self.zone as usize % 3];
        let column = columns[((easting / 100_000) as usize).saturating_sub(1).min(7)];

        let row_offset = if self.zone % 2 == 0 { 5 } else { 0 };
        let row = ROW_LETTERS[((northing / 100_000) as usize + row_offset) % 20];

        format!("{}{}", column as char, row as char)
    }
}

/// Encode a position as an MGRS reference with `precision` digits each for easting and northing
/// (1 -> 10km, 5 -> 1m). The result has the fixed form `ZZBSS` followed by the digits, e.g. `35VLG87`.
pub fn encode(lon: f64, lat: f64, precision: usize) -> Result<String, GridError> {
    if precision > MAX_PRECISION {
        return Err(GridError::Precision(precision));
    }

    let utm = UtmPosition::from_lon_lat(lon, lat)?;
    let easting = format!("{:05}", utm.easting.trunc() as u64 % 100_000);
    let northing = format!("{:05}", utm.northing.trunc() as u64 % 100_000);

    Ok(format!(
        "{:02}{}{}{}{}",
        utm.zone,
        utm.band,
        utm.square_id(),
        &easting[..precision],
        &northing[..precision]
    ))
}

fn utm_zone(lon: f64, lat: f64) -> u8 {
    if lon >= 180.0 {
        return 60;
    }

    // Norway
    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return 32;
    }

    // Svalbard
    if (72.0..84.0).contains(&lat) {
        if (0.0..9.0).contains(&lon) {
            return 31;
        } else if (9.0..21.0).contains(&lon) {
            return 33;
        } else if (21.0..33.0).contains(&lon) {
            return 35;
        } else if (33.0..42.0).contains(&lon) {
            return 37;
        }
    }

    ((lon + 180.0) / 6.0).floor() as u8 + 1
}

fn lat_band(lat: f64) -> char {
    let idx = (((lat + 80.0) / 8.0).floor() as usize).min(LAT_BANDS.len() - 1);
    LAT_BANDS[idx] as char
}
