//! Rotation types in two and three dimensions.
//!
//! [`Rotation2d`] stores a heading as a unit complex number and [`Rotation3d`]
//! stores an orientation as a unit quaternion. Neither keeps a bare angle, so
//! composing thousands of small increments (one per control cycle) does not
//! accumulate the rounding error that raw radian sums would.

use std::ops::{Add, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::core::math::angle_lerp;

/// A rotation in the plane, stored as (cos θ, sin θ).
///
/// Positive angles are counter-clockwise. `+` composes rotations, `-`
/// composes with the inverse; both are group operations, not scalar
/// arithmetic on angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation2d {
    cos: f64,
    sin: f64,
}

impl Rotation2d {
    /// The identity rotation (0 radians).
    pub const IDENTITY: Self = Self { cos: 1.0, sin: 0.0 };

    /// Create from an angle in radians.
    #[inline]
    pub fn new(radians: f64) -> Self {
        Self {
            cos: radians.cos(),
            sin: radians.sin(),
        }
    }

    /// Create from an angle in degrees.
    #[inline]
    pub fn from_degrees(degrees: f64) -> Self {
        Self::new(degrees.to_radians())
    }

    /// Create from an (x, y) direction, normalizing to unit magnitude.
    ///
    /// Falls back to the identity when the magnitude is below 1e-6; a
    /// near-zero vector carries no usable direction.
    #[inline]
    pub fn from_components(x: f64, y: f64) -> Self {
        let magnitude = x.hypot(y);
        if magnitude > 1e-6 {
            Self {
                cos: x / magnitude,
                sin: y / magnitude,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Cosine of the rotation.
    #[inline]
    pub fn cos(&self) -> f64 {
        self.cos
    }

    /// Sine of the rotation.
    #[inline]
    pub fn sin(&self) -> f64 {
        self.sin
    }

    /// Tangent of the rotation.
    #[inline]
    pub fn tan(&self) -> f64 {
        self.sin / self.cos
    }

    /// The angle in radians, in [-π, π].
    #[inline]
    pub fn radians(&self) -> f64 {
        self.sin.atan2(self.cos)
    }

    /// The angle in degrees, in [-180, 180].
    #[inline]
    pub fn degrees(&self) -> f64 {
        self.radians().to_degrees()
    }

    /// Compose with another rotation.
    ///
    /// Unit complex multiplication:
    /// ```text
    /// cos' = cos a · cos b − sin a · sin b
    /// sin' = cos a · sin b + sin a · cos b
    /// ```
    /// The result is renormalized to keep the unit-magnitude invariant under
    /// long chains of composition.
    #[inline]
    pub fn rotate_by(&self, other: &Rotation2d) -> Rotation2d {
        Rotation2d::from_components(
            self.cos * other.cos - self.sin * other.sin,
            self.cos * other.sin + self.sin * other.cos,
        )
    }

    /// Interpolate toward `end` along the shortest path; `t` clamped to [0, 1].
    #[inline]
    pub fn interpolate(&self, end: &Rotation2d, t: f64) -> Rotation2d {
        Rotation2d::new(angle_lerp(self.radians(), end.radians(), t.clamp(0.0, 1.0)))
    }
}

impl Default for Rotation2d {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Add for Rotation2d {
    type Output = Rotation2d;

    #[inline]
    fn add(self, rhs: Rotation2d) -> Rotation2d {
        self.rotate_by(&rhs)
    }
}

impl Sub for Rotation2d {
    type Output = Rotation2d;

    #[inline]
    fn sub(self, rhs: Rotation2d) -> Rotation2d {
        self.rotate_by(&-rhs)
    }
}

impl Neg for Rotation2d {
    type Output = Rotation2d;

    #[inline]
    fn neg(self) -> Rotation2d {
        Rotation2d {
            cos: self.cos,
            sin: -self.sin,
        }
    }
}

impl AbsDiffEq for Rotation2d {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.cos.abs_diff_eq(&other.cos, epsilon) && self.sin.abs_diff_eq(&other.sin, epsilon)
    }
}

impl RelativeEq for Rotation2d {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.cos.relative_eq(&other.cos, epsilon, max_relative)
            && self.sin.relative_eq(&other.sin, epsilon, max_relative)
    }
}

/// An orientation in 3D space, stored as a unit quaternion.
///
/// The `+`/`-`/unary-`-` operators follow the same group-operation
/// conventions as [`Rotation2d`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation3d {
    q: UnitQuaternion<f64>,
}

impl Rotation3d {
    /// The identity rotation.
    pub fn identity() -> Self {
        Self {
            q: UnitQuaternion::identity(),
        }
    }

    /// Create from a unit quaternion.
    #[inline]
    pub fn from_quaternion(q: UnitQuaternion<f64>) -> Self {
        Self { q }
    }

    /// Create from extrinsic roll (x), pitch (y), yaw (z) angles in radians,
    /// applied in that order.
    #[inline]
    pub fn from_euler(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            q: UnitQuaternion::from_euler_angles(roll, pitch, yaw),
        }
    }

    /// Create from a rotation axis and an angle in radians.
    ///
    /// A zero-magnitude axis yields the identity rotation.
    #[inline]
    pub fn from_axis_angle(axis: Vector3<f64>, angle: f64) -> Self {
        match nalgebra::Unit::try_new(axis, 1e-9) {
            Some(unit_axis) => Self {
                q: UnitQuaternion::from_axis_angle(&unit_axis, angle),
            },
            None => Self::identity(),
        }
    }

    /// Create from a rotation vector (axis scaled by angle in radians).
    #[inline]
    pub fn from_rotation_vector(rvec: Vector3<f64>) -> Self {
        Self {
            q: UnitQuaternion::from_scaled_axis(rvec),
        }
    }

    /// The underlying unit quaternion.
    #[inline]
    pub fn quaternion(&self) -> &UnitQuaternion<f64> {
        &self.q
    }

    /// Rotation about the x-axis in radians (extrinsic roll).
    #[inline]
    pub fn roll(&self) -> f64 {
        self.q.euler_angles().0
    }

    /// Rotation about the y-axis in radians (extrinsic pitch).
    #[inline]
    pub fn pitch(&self) -> f64 {
        self.q.euler_angles().1
    }

    /// Rotation about the z-axis in radians (extrinsic yaw).
    #[inline]
    pub fn yaw(&self) -> f64 {
        self.q.euler_angles().2
    }

    /// Rotation angle in radians, in [0, π].
    #[inline]
    pub fn angle(&self) -> f64 {
        self.q.angle()
    }

    /// Rotation axis as a unit vector; zero vector for the identity.
    #[inline]
    pub fn axis(&self) -> Vector3<f64> {
        self.q.axis().map_or_else(Vector3::zeros, |a| a.into_inner())
    }

    /// The rotation vector (axis scaled by angle), the quaternion logarithm.
    #[inline]
    pub fn to_rotation_vector(&self) -> Vector3<f64> {
        self.q.scaled_axis()
    }

    /// Project to the planar heading (yaw only).
    #[inline]
    pub fn to_rotation2d(&self) -> Rotation2d {
        Rotation2d::new(self.yaw())
    }

    /// Compose with another rotation (`other` applied after `self`).
    #[inline]
    pub fn rotate_by(&self, other: &Rotation3d) -> Rotation3d {
        Rotation3d {
            q: other.q * self.q,
        }
    }

    /// Spherical linear interpolation toward `end`; `t` clamped to [0, 1].
    #[inline]
    pub fn interpolate(&self, end: &Rotation3d, t: f64) -> Rotation3d {
        Rotation3d {
            q: self.q.slerp(&end.q, t.clamp(0.0, 1.0)),
        }
    }
}

impl Default for Rotation3d {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Rotation2d> for Rotation3d {
    #[inline]
    fn from(rotation: Rotation2d) -> Self {
        Self::from_euler(0.0, 0.0, rotation.radians())
    }
}

impl Add for Rotation3d {
    type Output = Rotation3d;

    #[inline]
    fn add(self, rhs: Rotation3d) -> Rotation3d {
        self.rotate_by(&rhs)
    }
}

impl Sub for Rotation3d {
    type Output = Rotation3d;

    #[inline]
    fn sub(self, rhs: Rotation3d) -> Rotation3d {
        self.rotate_by(&-rhs)
    }
}

impl Neg for Rotation3d {
    type Output = Rotation3d;

    #[inline]
    fn neg(self) -> Rotation3d {
        Rotation3d {
            q: self.q.inverse(),
        }
    }
}

impl AbsDiffEq for Rotation3d {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        // q and -q encode the same rotation
        (*other - *self).angle().abs_diff_eq(&0.0, epsilon)
    }
}

impl RelativeEq for Rotation3d {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, _max_relative: f64) -> bool {
        self.abs_diff_eq(other, epsilon)
    }
}
