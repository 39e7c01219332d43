//! Polyline representation for route geometries.
//!
//! This module provides a type for working with polylines as decoded
//! coordinate sequences. Encoding/decoding happens at the boundary
//! (when receiving from OSRM or writing overlay output).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::haversine::haversine_m;

/// Coordinate precision of the encoded polyline format used by OSRM.
pub const DEFAULT_PRECISION: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolylineError {
    #[error("invalid character {0:?} at byte {1}")]
    InvalidCharacter(char, usize),
    #[error("truncated polyline")]
    Truncated,
    #[error("coordinate overflow")]
    Overflow,
}

/// A polyline representing a route geometry as decoded coordinates.
///
/// Stores latitude/longitude points directly. Encoding to/from the compact
/// polyline format should happen at API boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    ///
    /// Each point is a (latitude, longitude) tuple.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    /// Great-circle length in meters, summed over consecutive points.
    pub fn length_m(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine_m(pair[0], pair[1]))
            .sum()
    }

    /// Decodes an encoded polyline string.
    pub fn decode(encoded: &str, precision: u32) -> Result<Self, PolylineError> {
        let factor = 10f64.powi(precision as i32);
        let bytes = encoded.as_bytes();
        let mut index = 0;
        let mut lat: i64 = 0;
        let mut lng: i64 = 0;
        let mut points = Vec::new();

        while index < bytes.len() {
            lat = lat
                .checked_add(decode_value(bytes, &mut index)?)
                .ok_or(PolylineError::Overflow)?;
            if index >= bytes.len() {
                return Err(PolylineError::Truncated);
            }
            lng = lng
                .checked_add(decode_value(bytes, &mut index)?)
                .ok_or(PolylineError::Overflow)?;
            points.push((lat as f64 / factor, lng as f64 / factor));
        }

        Ok(Self { points })
    }

    /// Encodes the points into the compact polyline format.
    pub fn encode(&self, precision: u32) -> String {
        let factor = 10f64.powi(precision as i32);
        let mut out = String::new();
        let mut prev = (0i64, 0i64);

        for &(lat, lng) in &self.points {
            let lat = (lat * factor).round() as i64;
            let lng = (lng * factor).round() as i64;
            encode_value(lat - prev.0, &mut out);
            encode_value(lng - prev.1, &mut out);
            prev = (lat, lng);
        }

        out
    }
}

fn decode_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Truncated);
        };
        if !(63..127).contains(&byte) || shift > 60 {
            return Err(PolylineError::InvalidCharacter(byte as char, *index));
        }
        *index += 1;

        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 != 0 { !(result >> 1) } else { result >> 1 })
}

fn encode_value(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= 0x20 {
        out.push((((value & 0x1f) | 0x20) as u8 + 63) as char);
        value >>= 5;
    }
    out.push((value as u8 + 63) as char);
}
