//! Translation types in two and three dimensions.

use std::ops::{Add, Div, Mul, Neg, Sub};

use nalgebra::Vector3;
use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::{Rotation2d, Rotation3d};
use crate::core::math::lerp;

/// A displacement or point in the plane, in meters.
///
/// The group operation is vector addition; rotating by a [`Rotation2d`]
/// applies the standard 2x2 rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation2d {
    /// X component in meters
    pub x: f64,
    /// Y component in meters
    pub y: f64,
}

impl Translation2d {
    /// Zero translation.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new translation.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create from a polar coordinate (distance along `angle`).
    #[inline]
    pub fn from_polar(distance: f64, angle: Rotation2d) -> Self {
        Self::new(distance * angle.cos(), distance * angle.sin())
    }

    /// Euclidean norm in meters.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another translation in meters.
    #[inline]
    pub fn distance(&self, other: &Translation2d) -> f64 {
        (*other - *self).norm()
    }

    /// Direction of this translation from the origin.
    #[inline]
    pub fn angle(&self) -> Rotation2d {
        Rotation2d::from_components(self.x, self.y)
    }

    /// Rotate about the origin.
    ///
    /// ```text
    /// [x']   [cos θ  -sin θ][x]
    /// [y'] = [sin θ   cos θ][y]
    /// ```
    #[inline]
    pub fn rotate_by(&self, rotation: &Rotation2d) -> Translation2d {
        Translation2d::new(
            self.x * rotation.cos() - self.y * rotation.sin(),
            self.x * rotation.sin() + self.y * rotation.cos(),
        )
    }

    /// Linear interpolation toward `end`; `t` is clamped to [0, 1].
    #[inline]
    pub fn interpolate(&self, end: &Translation2d, t: f64) -> Translation2d {
        Translation2d::new(lerp(self.x, end.x, t), lerp(self.y, end.y, t))
    }
}

impl Add for Translation2d {
    type Output = Translation2d;

    #[inline]
    fn add(self, rhs: Translation2d) -> Translation2d {
        Translation2d::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Translation2d {
    type Output = Translation2d;

    #[inline]
    fn sub(self, rhs: Translation2d) -> Translation2d {
        Translation2d::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Translation2d {
    type Output = Translation2d;

    #[inline]
    fn neg(self) -> Translation2d {
        Translation2d::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Translation2d {
    type Output = Translation2d;

    #[inline]
    fn mul(self, scalar: f64) -> Translation2d {
        Translation2d::new(self.x * scalar, self.y * scalar)
    }
}

impl Div<f64> for Translation2d {
    type Output = Translation2d;

    #[inline]
    fn div(self, scalar: f64) -> Translation2d {
        Translation2d::new(self.x / scalar, self.y / scalar)
    }
}

impl AbsDiffEq for Translation2d {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

impl RelativeEq for Translation2d {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
    }
}

/// A displacement or point in 3D space, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation3d {
    /// X component in meters
    pub x: f64,
    /// Y component in meters
    pub y: f64,
    /// Z component in meters
    pub z: f64,
}

impl Translation3d {
    /// Zero translation.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new translation.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm in meters.
    #[inline]
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Distance to another translation in meters.
    #[inline]
    pub fn distance(&self, other: &Translation3d) -> f64 {
        (*other - *self).norm()
    }

    /// Rotate about the origin by a 3D rotation.
    #[inline]
    pub fn rotate_by(&self, rotation: &Rotation3d) -> Translation3d {
        let rotated = rotation.quaternion() * Vector3::new(self.x, self.y, self.z);
        Translation3d::new(rotated.x, rotated.y, rotated.z)
    }

    /// Project onto the X-Y plane.
    #[inline]
    pub fn to_translation2d(&self) -> Translation2d {
        Translation2d::new(self.x, self.y)
    }

    /// Linear interpolation toward `end`; `t` is clamped to [0, 1].
    #[inline]
    pub fn interpolate(&self, end: &Translation3d, t: f64) -> Translation3d {
        Translation3d::new(
            lerp(self.x, end.x, t),
            lerp(self.y, end.y, t),
            lerp(self.z, end.z, t),
        )
    }
}

impl From<Translation2d> for Translation3d {
    #[inline]
    fn from(translation: Translation2d) -> Self {
        Self::new(translation.x, translation.y, 0.0)
    }
}

impl Add for Translation3d {
    type Output = Translation3d;

    #[inline]
    fn add(self, rhs: Translation3d) -> Translation3d {
        Translation3d::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Translation3d {
    type Output = Translation3d;

    #[inline]
    fn sub(self, rhs: Translation3d) -> Translation3d {
        Translation3d::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Translation3d {
    type Output = Translation3d;

    #[inline]
    fn neg(self) -> Translation3d {
        Translation3d::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Translation3d {
    type Output = Translation3d;

    #[inline]
    fn mul(self, scalar: f64) -> Translation3d {
        Translation3d::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Div<f64> for Translation3d {
    type Output = Translation3d;

    #[inline]
    fn div(self, scalar: f64) -> Translation3d {
        Translation3d::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl AbsDiffEq for Translation3d {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Translation3d {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}
