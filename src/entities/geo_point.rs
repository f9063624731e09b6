use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const WGS84_SRID: i32 = 4326;

/// A WGS-84 point. `x` is longitude and `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum PointParseError {
    #[error("unrecognized point format")]
    Format,
    #[error("unsupported srid {0}")]
    Srid(i32),
    #[error("coordinates out of range")]
    OutOfRange,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, PointParseError> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(PointParseError::Format);
        }
        if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
            return Err(PointParseError::OutOfRange);
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Accepts `POINT(x y)`, `SRID=4326;POINT(x y)` or a GeoJSON point object.
    pub fn parse(text: &str) -> Result<Self, PointParseError> {
        let trimmed = text.trim();
        if trimmed.starts_with('{') {
            return Self::parse_geojson(trimmed);
        }
        Self::parse_wkt(trimmed)
    }

    fn parse_wkt(text: &str) -> Result<Self, PointParseError> {
        let mut body = text;
        if let Some((prefix, rest)) = text.split_once(';') {
            let srid = prefix
                .trim()
                .strip_prefix("SRID=")
                .or_else(|| prefix.trim().strip_prefix("srid="))
                .ok_or(PointParseError::Format)?
                .trim()
                .parse::<i32>()
                .map_err(|_| PointParseError::Format)?;
            if srid != WGS84_SRID {
                return Err(PointParseError::Srid(srid));
            }
            body = rest.trim();
        }

        let head = body.get(..5).ok_or(PointParseError::Format)?;
        if !head.eq_ignore_ascii_case("POINT") {
            return Err(PointParseError::Format);
        }
        let inner = body[5..]
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(PointParseError::Format)?;

        let coordinates = inner
            .split_whitespace()
            .map(f64::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| PointParseError::Format)?;

        match coordinates.as_slice() {
            [x, y] => Self::new(*x, *y),
            _ => Err(PointParseError::Format),
        }
    }

    fn parse_geojson(text: &str) -> Result<Self, PointParseError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|_| PointParseError::Format)?;
        Self::from_geojson(&value)
    }

    pub fn from_geojson(value: &serde_json::Value) -> Result<Self, PointParseError> {
        let is_point = value
            .get("type")
            .and_then(|kind| kind.as_str())
            .map(|kind| kind.eq_ignore_ascii_case("Point"))
            .unwrap_or(false);
        if !is_point {
            return Err(PointParseError::Format);
        }

        let coordinates = value
            .get("coordinates")
            .and_then(|coords| coords.as_array())
            .ok_or(PointParseError::Format)?;

        match coordinates.as_slice() {
            [x, y] => {
                let x = x.as_f64().ok_or(PointParseError::Format)?;
                let y = y.as_f64().ok_or(PointParseError::Format)?;
                Self::new(x, y)
            }
            _ => Err(PointParseError::Format),
        }
    }

    pub fn to_wkt(&self) -> String {
        format!("POINT({} {})", self.longitude, self.latitude)
    }

    /// `SRID=4326;POINT (x y)`, the form responses carry.
    pub fn to_ewkt(&self) -> String {
        format!("SRID={};POINT ({} {})", WGS84_SRID, self.longitude, self.latitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wkt())
    }
}

impl FromStr for GeoPoint {
    type Err = PointParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_ewkt())
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let parsed = match &value {
            serde_json::Value::String(text) => GeoPoint::parse(text),
            other => GeoPoint::from_geojson(other),
        };
        parsed.map_err(de::Error::custom)
    }
}
