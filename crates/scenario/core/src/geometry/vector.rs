use core::fmt;
use core::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Vector in 3D space.
///
/// Fields follow a right-handed, Z-up coordinate system:
/// Right = X, Forward = Y, Up = Z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3D {
    /// Position along the right axis.
    pub right: f32,
    /// Position along the forward axis.
    pub forward: f32,
    /// Position along the up axis.
    pub up: f32,
}

impl Vector3D {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    pub const FORWARD: Self = Self::new(0.0, 1.0, 0.0);
    pub const UP: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(right: f32, forward: f32, up: f32) -> Self {
        Self { right, forward, up }
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.right * other.right + self.forward * other.forward + self.up * other.up
    }

    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.forward * other.up - self.up * other.forward,
            self.up * other.right - self.right * other.up,
            self.right * other.forward - self.forward * other.right,
        )
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Returns the unit vector and the original length.
    ///
    /// A (near) zero vector is returned unchanged with length 0.
    pub fn normalize_with_length(self) -> (Self, f32) {
        let len = self.length();
        if len <= f32::EPSILON {
            (self, 0.0)
        } else {
            (self * (1.0 / len), len)
        }
    }

    /// Component-wise multiplication.
    #[inline]
    pub fn scaled_by(self, other: Self) -> Self {
        Self::new(
            self.right * other.right,
            self.forward * other.forward,
            self.up * other.up,
        )
    }

    /// Linear interpolation; `t = 0` yields `self`, `t = 1` yields `other`.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    pub fn is_finite(self) -> bool {
        self.right.is_finite() && self.forward.is_finite() && self.up.is_finite()
    }

    pub fn approx_eq(self, other: Self, eps: f32) -> bool {
        (self.right - other.right).abs() <= eps
            && (self.forward - other.forward).abs() <= eps
            && (self.up - other.up).abs() <= eps
    }
}

impl Add for Vector3D {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.right + rhs.right,
            self.forward + rhs.forward,
            self.up + rhs.up,
        )
    }
}

impl AddAssign for Vector3D {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3D {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.right - rhs.right,
            self.forward - rhs.forward,
            self.up - rhs.up,
        )
    }
}

impl Mul<f32> for Vector3D {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.right * rhs, self.forward * rhs, self.up * rhs)
    }
}

impl Neg for Vector3D {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.right, -self.forward, -self.up)
    }
}

impl fmt::Display for Vector3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.right, self.forward, self.up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_follows_right_handed_z_up() {
        assert_eq!(Vector3D::RIGHT.cross(Vector3D::FORWARD), Vector3D::UP);
        assert_eq!(Vector3D::FORWARD.cross(Vector3D::UP), Vector3D::RIGHT);
    }

    #[test]
    fn normalize_zero_vector_is_safe() {
        let (v, len) = Vector3D::ZERO.normalize_with_length();
        assert_eq!(v, Vector3D::ZERO);
        assert_eq!(len, 0.0);

        let (v, len) = Vector3D::new(0.0, 3.0, 4.0).normalize_with_length();
        assert!(v.approx_eq(Vector3D::new(0.0, 0.6, 0.8), 1e-6));
        assert!((len - 5.0).abs() < 1e-6);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Vector3D::new(1.0, 2.0, 3.0);
        let b = Vector3D::new(3.0, 2.0, -1.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Vector3D::new(2.0, 2.0, 1.0));
    }
}
