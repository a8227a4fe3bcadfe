use crate::codec::FixedCoord;

/// Squared planar distance in nanodegrees², used only to rank candidates.
///
/// Treats latitude and longitude as a flat grid, which holds over a campus but
/// not beyond a few kilometers. Computed in 128 bits: a full-range difference
/// (360e9) squared does not fit in 64.
#[inline]
pub fn squared_distance(a: &FixedCoord, b: &FixedCoord) -> u128 {
    let dlon = (a.lon as i128 - b.lon as i128).unsigned_abs();
    let dlat = (a.lat as i128 - b.lat as i128).unsigned_abs();
    dlon * dlon + dlat * dlat
}

/// Great-circle distance using the haversine formula, in meters.
pub fn haversine_meters(a: &FixedCoord, b: &FixedCoord) -> f64 {
    let r = 6_371_000.0_f64; // Earth radius in meters
    let (lat1, lon1, lat2, lon2) = (
        a.lat_degrees().to_radians(),
        a.lon_degrees().to_radians(),
        b.lat_degrees().to_radians(),
        b.lon_degrees().to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * r * h.sqrt().atan2((1.0 - h).sqrt())
}
