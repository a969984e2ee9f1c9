/// Service level → one-sided standard normal quantile.
pub const Z_TABLE: [(f64, f64); 12] = [
    (0.90, 1.28),
    (0.91, 1.34),
    (0.92, 1.41),
    (0.93, 1.48),
    (0.94, 1.55),
    (0.95, 1.65),
    (0.96, 1.75),
    (0.97, 1.88),
    (0.98, 2.05),
    (0.99, 2.33),
    (0.995, 2.58),
    (0.999, 3.09),
];

const Z_FLOOR: f64 = 1.28;
const Z_CEILING: f64 = 3.09;

/// Z-score for `service_level`, linearly interpolated between table points.
///
/// Below 0.90 (or NaN) yields 1.28; 0.999 and above yields 3.09.
pub fn z_score(service_level: f64) -> f64 {
    if service_level.is_nan() || service_level < Z_TABLE[0].0 {
        return Z_FLOOR;
    }
    if service_level >= Z_TABLE[Z_TABLE.len() - 1].0 {
        return Z_CEILING;
    }
    Z_TABLE
        .windows(2)
        .find(|w| service_level >= w[0].0 && service_level < w[1].0)
        .map_or(Z_CEILING, |w| {
            let (l0, z0) = w[0];
            let (l1, z1) = w[1];
            z0 + (service_level - l0) / (l1 - l0) * (z1 - z0)
        })
}
