//! The softened pairwise gravity kernel shared by every evaluation strategy.
//!
//! Everything here is single precision and evaluated in one fixed order so
//! that the only divergence between strategies comes from how the per-body
//! sums are associated.

use std::ops::{Add, AddAssign};

/// Softening added to every squared distance.
pub const DEFAULT_EPS2: f32 = 1e-6;

/// Potential and acceleration accumulated for one target body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Contribution {
    pub potential: f32,
    pub accel_x: f32,
    pub accel_y: f32,
}

impl Contribution {
    pub fn new(potential: f32, accel_x: f32, accel_y: f32) -> Self {
        Contribution { potential, accel_x, accel_y }
    }
}

impl Add for Contribution {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Contribution {
            potential: self.potential + other.potential,
            accel_x: self.accel_x + other.accel_x,
            accel_y: self.accel_y + other.accel_y,
        }
    }
}

impl AddAssign for Contribution {
    fn add_assign(&mut self, other: Self) {
        self.potential += other.potential;
        self.accel_x += other.accel_x;
        self.accel_y += other.accel_y;
    }
}

/// Read-only constants captured by the kernel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelParams {
    pub eps2: f32,
}

impl Default for KernelParams {
    fn default() -> Self {
        KernelParams { eps2: DEFAULT_EPS2 }
    }
}

impl KernelParams {
    pub fn new(eps2: f32) -> Self {
        KernelParams { eps2 }
    }

    /// `dx² + dy² + eps2`, strictly positive even when both points coincide.
    #[inline(always)]
    pub fn softened_r2(&self, dx: f32, dy: f32) -> f32 {
        dx * dx + dy * dy + self.eps2
    }

    /// Contribution of source body `j` at `(xj, yj)` with mass `mj` on the
    /// target at `(xi, yi)`.
    #[inline(always)]
    pub fn pair(&self, xi: f32, yi: f32, xj: f32, yj: f32, mj: f32) -> Contribution {
        let dx = xj - xi;
        let dy = yj - yi;
        let r2 = self.softened_r2(dx, dy);
        let inv_r = 1.0f32 / r2.sqrt();
        let inv_r3 = mj * inv_r * inv_r * inv_r;
        Contribution {
            potential: mj * inv_r,
            accel_x: dx * inv_r3,
            accel_y: dy * inv_r3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_pair_uses_only_softening() {
        let params = KernelParams::default();
        assert_eq!(params.softened_r2(0.0, 0.0), params.eps2);

        let c = params.pair(0.3, 0.7, 0.3, 0.7, 0.5);
        assert!(c.potential.is_finite());
        assert_eq!(c.accel_x, 0.0);
        assert_eq!(c.accel_y, 0.0);
        let expected = 0.5 / params.eps2.sqrt();
        assert!((c.potential - expected).abs() <= expected * 1e-6);
    }

    #[test]
    fn acceleration_points_at_source() {
        let params = KernelParams::default();
        let c = params.pair(0.0, 0.0, -2.0, 3.0, 1.0);
        assert!(c.accel_x < 0.0);
        assert!(c.accel_y > 0.0);
        assert!(c.potential > 0.0);
    }

    #[test]
    fn unit_distance_with_zero_softening() {
        let params = KernelParams::new(0.0);
        let c = params.pair(0.0, 0.0, 1.0, 0.0, 2.0);
        assert_eq!(c, Contribution::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn contributions_add_componentwise() {
        let mut a = Contribution::new(1.0, 2.0, 3.0);
        a += Contribution::new(0.5, -1.0, 1.0);
        assert_eq!(a, Contribution::new(1.5, 1.0, 4.0));
        assert_eq!(a + Contribution::default(), a);
    }
}
