//! Core camera types
//!
//! - `Camera`: a normalized camera record, immutable once loaded
//! - `GeoPoint`: a WGS84 position in degrees
//! - `RawCamera`: the record shape found in `webcams.json`

use serde::{Deserialize, Deserializer, Serialize};

use super::regions::region_name;

/// A single weather camera
///
/// Identity is `id` (the `file` field of the source list).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Camera {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Region code, see [`crate::catalog::REGIONS`]
    pub region: String,
    /// Altitude in metres above sea level
    pub altitude: Option<i32>,
}

impl Camera {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lon,
            region: String::new(),
            altitude: None,
        }
    }

    /// Builder method: set region code
    pub fn region(mut self, code: impl Into<String>) -> Self {
        self.region = code.into();
        self
    }

    /// Builder method: set altitude
    pub fn altitude(mut self, metres: i32) -> Self {
        self.altitude = Some(metres);
        self
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// Full region name, falling back to the raw code
    pub fn region_name(&self) -> &str {
        region_name(&self.region)
    }

    /// Short description line: "Region • 612 m n. m."
    pub fn details(&self) -> String {
        match self.altitude {
            Some(alt) => format!("{} • {} m n. m.", self.region_name(), alt),
            None => self.region_name().to_string(),
        }
    }
}

/// A position in degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Parse "lat,lon"
    pub fn parse(s: &str) -> Option<Self> {
        let (lat, lon) = s.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lon: f64 = lon.trim().parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self { lat, lon })
    }
}

/// Camera record as published in the source list
#[derive(Debug, Clone, Deserialize)]
pub struct RawCamera {
    pub file: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    #[serde(default)]
    pub kraj: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub vyska: Option<f64>,
}

impl RawCamera {
    /// Normalize into a [`Camera`]. Records without usable coordinates yield `None`.
    pub fn normalize(self) -> Option<Camera> {
        let lat = self.lat.filter(|v| v.is_finite())?;
        let lon = self.lon.filter(|v| v.is_finite())?;

        Some(Camera {
            id: self.file,
            name: self.name,
            lat,
            lon,
            region: self.kraj.unwrap_or_default(),
            altitude: self.vyska.filter(|v| v.is_finite()).map(|v| v.round() as i32),
        })
    }
}

/// Accepts a JSON number or a numeric string ("49.75")
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_camera_string_fields() {
        let raw: RawCamera = serde_json::from_str(
            r#"{"file": "snezka", "name": "Sněžka", "lat": "50.7360", "lon": "15.7399", "kraj": "H", "vyska": "1603"}"#,
        )
        .unwrap();

        let cam = raw.normalize().unwrap();
        assert_eq!(cam.id, "snezka");
        assert_eq!(cam.region_name(), "Královéhradecký kraj");
        assert_eq!(cam.altitude, Some(1603));
        assert!((cam.lat - 50.736).abs() < 1e-9);
    }

    #[test]
    fn test_raw_camera_numeric_fields() {
        let raw: RawCamera = serde_json::from_str(
            r#"{"file": "praha", "name": "Praha", "lat": 50.08, "lon": 14.42, "kraj": "A", "vyska": 245.6}"#,
        )
        .unwrap();

        let cam = raw.normalize().unwrap();
        assert_eq!(cam.altitude, Some(246));
        assert_eq!(cam.details(), "Hlavní město Praha • 246 m n. m.");
    }

    #[test]
    fn test_raw_camera_without_coordinates() {
        let raw: RawCamera =
            serde_json::from_str(r#"{"file": "x", "name": "X", "lat": "n/a"}"#).unwrap();
        assert!(raw.normalize().is_none());
    }

    #[test]
    fn test_geo_point_parse() {
        assert_eq!(GeoPoint::parse("49.75, 15.3"), Some(GeoPoint::new(49.75, 15.3)));
        assert_eq!(GeoPoint::parse("91,0"), None);
        assert_eq!(GeoPoint::parse("abc"), None);
    }
}
