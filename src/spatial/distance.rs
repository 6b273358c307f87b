use crate::star::StarRecord;

/// Cosines this close to 1 are treated as a shared line of sight.
const COLLINEAR_TOLERANCE: f64 = 1e-12;

/// True separation in parsecs between two stars given by (ra, dec, dist).
///
/// The angle between the two lines of sight comes from the spherical law of
/// cosines; the separation then follows from the planar law of cosines in
/// the triangle (origin, a, b). When both stars lie on practically the same
/// line of sight the difference of their distances is returned instead.
pub fn distance(a: &StarRecord, b: &StarRecord) -> f64 {
    separation(a.ra, a.dec, a.dist, b.ra, b.dec, b.dist)
}

/// [`distance`] on raw coordinates (degrees, degrees, parsecs).
pub fn separation(ra_a: f64, dec_a: f64, d_a: f64, ra_b: f64, dec_b: f64, d_b: f64) -> f64 {
    let dec_a = dec_a.to_radians();
    let dec_b = dec_b.to_radians();
    let ra_a = ra_a.to_radians();
    let ra_b = ra_b.to_radians();

    let cos_c = (dec_a.sin() * dec_b.sin() + dec_a.cos() * dec_b.cos() * (ra_a - ra_b).cos())
        .clamp(-1.0, 1.0);

    if (cos_c - 1.0).abs() < COLLINEAR_TOLERANCE {
        return (d_a - d_b).abs();
    }

    // rounding can push the radicand a hair below zero for near-identical points
    (d_a * d_a + d_b * d_b - 2.0 * d_a * d_b * cos_c).max(0.0).sqrt()
}
