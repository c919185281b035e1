//! Vector algebra on top of `glam::DVec3`.
//!
//! glam supplies arithmetic, dot, cross and length. The operations the
//! light-transport code needs beyond that live on [`VecExt`].

use glam::DVec3;

/// A 3-component f64 vector.
pub type Vec3 = DVec3;

/// A point in world space.
pub type Point3 = DVec3;

/// Linear RGB color (values typically 0-1).
pub type Color = DVec3;

/// Threshold below which every component counts as zero.
const NEAR_ZERO: f64 = 1e-8;

/// Extension operations used by scattering and camera code.
pub trait VecExt {
    /// Divide by the length. Degenerate (zero) vectors yield NaN components.
    fn unit_vector(self) -> Self;

    /// True if every component is below `1e-8` in magnitude.
    fn near_zero(self) -> bool;

    /// Mirror `self` about the normal `n`: `v - 2·dot(v,n)·n`.
    fn reflect(self, n: Self) -> Self;

    /// Refract the unit vector `self` through a surface with normal `n`.
    ///
    /// `etai_over_etat` is the ratio of refractive indices across the
    /// interface. The result is the sum of the components perpendicular and
    /// parallel to `n` given by Snell's law.
    fn refract(self, n: Self, etai_over_etat: f64) -> Self;
}

impl VecExt for DVec3 {
    #[inline]
    fn unit_vector(self) -> Self {
        self / self.length()
    }

    #[inline]
    fn near_zero(self) -> bool {
        self.x.abs() < NEAR_ZERO && self.y.abs() < NEAR_ZERO && self.z.abs() < NEAR_ZERO
    }

    #[inline]
    fn reflect(self, n: Self) -> Self {
        self - 2.0 * self.dot(n) * n
    }

    #[inline]
    fn refract(self, n: Self, etai_over_etat: f64) -> Self {
        let cos_theta = (-self).dot(n).min(1.0);
        let r_out_perp = etai_over_etat * (self + cos_theta * n);
        let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
        r_out_perp + r_out_parallel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_unit(rng: &mut StdRng) -> Vec3 {
        loop {
            let v = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            let len_sq = v.length_squared();
            if len_sq > 1e-6 && len_sq <= 1.0 {
                return v.unit_vector();
            }
        }
    }

    #[test]
    fn test_unit_vector() {
        let v = Vec3::new(3.0, 0.0, 4.0).unit_vector();
        assert_eq!(v, Vec3::new(0.6, 0.0, 0.8));
        assert!((v.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_near_zero() {
        assert!(Vec3::ZERO.near_zero());
        assert!(Vec3::splat(9e-9).near_zero());
        assert!(Vec3::new(-9e-9, 0.0, 9e-9).near_zero());
        assert!(!Vec3::new(0.0, 1e-8, 0.0).near_zero());
        assert!(!Vec3::new(0.0, 0.0, -1.0).near_zero());
    }

    #[test]
    fn test_reflect_axis_aligned() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let n = Vec3::Y;
        assert_eq!(v.reflect(n), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_reflect_preserves_length_and_flips_normal_component() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let d = random_unit(&mut rng);
            let n = random_unit(&mut rng);
            let r = d.reflect(n);
            assert!((r.length() - d.length()).abs() < 1e-12);
            assert!((r.dot(n) + d.dot(n)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_refract_unit_ratio_passes_straight_through() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let n = random_unit(&mut rng);
            let mut d = random_unit(&mut rng);
            if d.dot(n) > 0.0 {
                d = -d;
            }
            let r = d.refract(n, 1.0);
            assert!((r - d).length() < 1e-6, "{r:?} != {d:?}");
        }
    }

    #[test]
    fn test_refract_bends_towards_normal_entering_denser_medium() {
        // 45 degrees incidence into glass
        let d = Vec3::new(1.0, -1.0, 0.0).unit_vector();
        let n = Vec3::Y;
        let r = d.refract(n, 1.0 / 1.5);

        // Snell: sin(theta_t) = sin(45) / 1.5
        let sin_t = (0.5f64).sqrt() / 1.5;
        assert!((r.x - sin_t).abs() < 1e-12);
        assert!(r.y < 0.0);
        assert!((r.length() - 1.0).abs() < 1e-12);
    }
}
