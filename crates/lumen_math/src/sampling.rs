//! Random direction sampling.
//!
//! Every function takes the generator explicitly so that each render worker
//! can own an independently seeded stream.

use std::f32::consts::TAU;

use rand::Rng;

use crate::Vec3;

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let r0: f32 = rng.gen();
    let r1: f32 = rng.gen();
    let theta = TAU * r0;
    let z = 2.0 * r1 - 1.0;
    let radius = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(radius * theta.cos(), radius * theta.sin(), z)
}

/// Direction biased towards the unit vector `v`.
///
/// The cosine to `v` is `z = 1 - r^exponent * offset` for a uniform `r`,
/// and the azimuth around `v` is uniform. With `offset = 1` and
/// `exponent = 1` this covers the hemisphere around `v` uniformly; larger
/// exponents pull samples into a tighter cone. `z` is clamped to [-1, 1].
pub fn random_in_direction<R: Rng + ?Sized>(v: Vec3, offset: f32, exponent: f32, rng: &mut R) -> Vec3 {
    let r0: f32 = rng.gen();
    let r1: f32 = rng.gen();
    let theta = TAU * r0;
    let z = (1.0 - r1.powf(exponent) * offset).clamp(-1.0, 1.0);

    let a = v.any_orthonormal_vector();
    let b = v.cross(a);
    let around = a * theta.cos() + b * theta.sin();
    around * (1.0 - z * z).sqrt() + v * z
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_random_unit_vector_covers_sphere() {
        let mut rng = StdRng::seed_from_u64(11);
        let mean = (0..20_000)
            .map(|_| random_unit_vector(&mut rng))
            .fold(Vec3::ZERO, |acc, v| acc + v)
            / 20_000.0;
        assert!(mean.length() < 0.05, "mean direction {mean:?} should be near zero");
    }

    #[test]
    fn test_random_in_direction_stays_in_hemisphere() {
        let mut rng = StdRng::seed_from_u64(42);
        let normal = Vec3::new(0.3, -0.5, 0.8).normalize();
        for _ in 0..1000 {
            let d = random_in_direction(normal, 1.0, 1.0, &mut rng);
            assert!((d.length() - 1.0).abs() < 1e-4);
            assert!(d.dot(normal) >= -1e-5);
        }
    }

    #[test]
    fn test_random_in_direction_exponent_tightens_cone() {
        let mut rng = StdRng::seed_from_u64(3);
        let axis = Vec3::Y;
        let mean_cos = |exponent: f32, rng: &mut StdRng| {
            (0..5000)
                .map(|_| random_in_direction(axis, 1.0, exponent, rng).dot(axis))
                .sum::<f32>()
                / 5000.0
        };

        let wide = mean_cos(1.0, &mut rng);
        let tight = mean_cos(50.0, &mut rng);
        // E[1 - r] = 1/2 and E[1 - r^50] = 50/51
        assert!((wide - 0.5).abs() < 0.03);
        assert!(tight > 0.95);
    }

    #[test]
    fn test_random_in_direction_diagonal_axis() {
        // (1, 1, 1) is a degenerate choice for some "any perpendicular" tricks
        let mut rng = StdRng::seed_from_u64(5);
        let axis = Vec3::ONE.normalize();
        for _ in 0..100 {
            let d = random_in_direction(axis, 1.0, 1.0, &mut rng);
            assert!(d.is_finite());
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_random_in_direction_large_offset_is_clamped() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let d = random_in_direction(Vec3::Z, 3.0, 1.0, &mut rng);
            assert!(d.is_finite());
        }
    }
}
