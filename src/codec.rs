//! Conversion between floating-point degrees and fixed-point nanodegrees.
//!
//! Every coordinate that enters the crate, whether typed by a user or read
//! from a dataset, goes through [`FixedCoord::from_degrees`] or
//! [`FixedCoord::from_nanodegrees`], so both paths share one validated
//! representation.

use std::fmt;

use crate::error::{Error, Result};

/// 1 degree = 10^9 nanodegrees.
pub const NANOS_PER_DEGREE: i64 = 1_000_000_000;
const NANOS_PER_DEGREE_F: f64 = NANOS_PER_DEGREE as f64;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Inclusive bound in degrees.
    pub fn max_degrees(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    pub fn min_degrees(self) -> f64 {
        -self.max_degrees()
    }

    fn max_nanos(self) -> i64 {
        match self {
            Axis::Latitude => 90 * NANOS_PER_DEGREE,
            Axis::Longitude => 180 * NANOS_PER_DEGREE,
        }
    }

    fn out_of_range(self, value: f64) -> Error {
        Error::OutOfRangeCoordinate {
            axis: self,
            value,
            min: self.min_degrees(),
            max: self.max_degrees(),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

/// Degrees to nanodegrees, rounded to the nearest integer.
pub fn encode(degrees: f64, axis: Axis) -> Result<i64> {
    if !degrees.is_finite() {
        return Err(Error::InvalidCoordinate { axis, value: degrees });
    }
    if !(axis.min_degrees()..=axis.max_degrees()).contains(&degrees) {
        return Err(axis.out_of_range(degrees));
    }
    Ok((degrees * NANOS_PER_DEGREE_F).round() as i64)
}

/// Nanodegrees to degrees.
pub fn decode(nanos: i64) -> f64 {
    nanos as f64 / NANOS_PER_DEGREE_F
}

/// A validated coordinate in nanodegrees.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FixedCoord {
    pub lat: i64,
    pub lon: i64,
}

impl FixedCoord {
    pub fn from_degrees(lat: f64, lon: f64) -> Result<Self> {
        Ok(Self {
            lat: encode(lat, Axis::Latitude)?,
            lon: encode(lon, Axis::Longitude)?,
        })
    }

    /// Accepts coordinates that are already fixed-point, checking the same bounds
    /// that [`encode`] enforces on degrees.
    pub fn from_nanodegrees(lat: i64, lon: i64) -> Result<Self> {
        for (axis, value) in [(Axis::Latitude, lat), (Axis::Longitude, lon)] {
            let max = axis.max_nanos();
            if !(-max..=max).contains(&value) {
                return Err(axis.out_of_range(decode(value)));
            }
        }
        Ok(Self { lat, lon })
    }

    pub fn lat_degrees(&self) -> f64 {
        decode(self.lat)
    }

    pub fn lon_degrees(&self) -> f64 {
        decode(self.lon)
    }
}

impl fmt::Display for FixedCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat_degrees(), self.lon_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_whole_degrees_exactly() {
        assert_eq!(encode(40.0, Axis::Latitude).unwrap(), 40_000_000_000);
        assert_eq!(encode(-73.0, Axis::Longitude).unwrap(), -73_000_000_000);
        assert_eq!(encode(-0.0, Axis::Longitude).unwrap(), 0);
    }

    #[test]
    fn rounds_to_nearest_nanodegree() {
        assert_eq!(encode(40.9150000004, Axis::Latitude).unwrap(), 40_915_000_000);
        assert_eq!(encode(40.9150000006, Axis::Latitude).unwrap(), 40_915_000_001);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(encode(90.0, Axis::Latitude).unwrap(), 90 * NANOS_PER_DEGREE);
        assert_eq!(encode(-180.0, Axis::Longitude).unwrap(), -180 * NANOS_PER_DEGREE);
    }

    #[test]
    fn rejects_non_finite() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = encode(value, Axis::Longitude).unwrap_err();
            assert!(matches!(err, Error::InvalidCoordinate { axis: Axis::Longitude, .. }));
        }
    }

    #[test]
    fn rejects_out_of_range_with_bound() {
        let err = encode(90.5, Axis::Latitude).unwrap_err();
        match err {
            Error::OutOfRangeCoordinate { axis, value, min, max } => {
                assert_eq!(axis, Axis::Latitude);
                assert_eq!(value, 90.5);
                assert_eq!((min, max), (-90.0, 90.0));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(encode(180.01, Axis::Longitude).is_err());
        // Legal longitude, illegal latitude.
        assert!(FixedCoord::from_degrees(120.0, 40.0).is_err());
    }

    #[test]
    fn stored_coordinates_share_the_bounds() {
        assert!(FixedCoord::from_nanodegrees(90 * NANOS_PER_DEGREE, 0).is_ok());
        let err = FixedCoord::from_nanodegrees(0, 180 * NANOS_PER_DEGREE + 1).unwrap_err();
        assert!(matches!(err, Error::OutOfRangeCoordinate { axis: Axis::Longitude, .. }));
    }

    #[test]
    fn integer_extremes_are_out_of_range() {
        let err = FixedCoord::from_nanodegrees(i64::MIN, 0).unwrap_err();
        assert!(matches!(err, Error::OutOfRangeCoordinate { axis: Axis::Latitude, .. }));
        let err = FixedCoord::from_nanodegrees(0, i64::MAX).unwrap_err();
        assert!(matches!(err, Error::OutOfRangeCoordinate { axis: Axis::Longitude, .. }));
    }

    #[test]
    fn decode_divides() {
        assert_eq!(decode(40_000_000_000), 40.0);
        assert_eq!(decode(-73_115_500_000), -73.1155);
    }

    proptest! {
        #[test]
        fn round_trip_within_a_nanodegree(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let coord = FixedCoord::from_degrees(lat, lon).unwrap();
            prop_assert!((coord.lat_degrees() - lat).abs() <= 1e-9);
            prop_assert!((coord.lon_degrees() - lon).abs() <= 1e-9);
        }
    }
}
