use std::str::FromStr;

use crate::codec::FixedCoord;
use crate::error::{Error, Result};

/// A caller-supplied position in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Query {
    pub lat: f64,
    pub lon: f64,
}

impl Query {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn to_fixed(&self) -> Result<FixedCoord> {
        FixedCoord::from_degrees(self.lat, self.lon)
    }
}

impl FromStr for Query {
    type Err = Error;

    /// Parses `"latitude,longitude"`. Range and finiteness are left to the codec.
    fn from_str(input: &str) -> Result<Self> {
        let format_err = |reason: &str| Error::InputFormat {
            input: input.to_string(),
            reason: reason.to_string(),
        };
        let mut parts = input.split(',');
        let (lat, lon) = match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lon), None) => (lat.trim(), lon.trim()),
            _ => return Err(format_err("expected latitude,longitude")),
        };
        let lat: f64 = lat
            .parse()
            .map_err(|_| format_err("latitude is not a number"))?;
        let lon: f64 = lon
            .parse()
            .map_err(|_| format_err("longitude is not a number"))?;
        Ok(Query { lat, lon })
    }
}
