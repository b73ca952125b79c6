//! Chassis acceleration type.

use std::ops::{Add, Div, Mul, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use crate::core::geometry::{Rotation2d, Translation2d};
use crate::core::math::lerp;

/// Robot or field frame acceleration: (ax, ay, α).
///
/// Units are meters per second squared and radians per second squared, with
/// the same axis conventions as [`ChassisSpeeds`](super::ChassisSpeeds).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChassisAccelerations {
    /// Linear acceleration along x in m/s²
    pub ax: f64,
    /// Linear acceleration along y in m/s²
    pub ay: f64,
    /// Angular acceleration in rad/s², counter-clockwise positive
    pub alpha: f64,
}

impl ChassisAccelerations {
    /// Create a new acceleration triple.
    #[inline]
    pub const fn new(ax: f64, ay: f64, alpha: f64) -> Self {
        Self { ax, ay, alpha }
    }

    /// Convert field-relative accelerations to robot-relative accelerations.
    #[inline]
    pub fn to_robot_relative(&self, robot_angle: &Rotation2d) -> ChassisAccelerations {
        let rotated = Translation2d::new(self.ax, self.ay).rotate_by(&-*robot_angle);
        ChassisAccelerations::new(rotated.x, rotated.y, self.alpha)
    }

    /// Convert robot-relative accelerations to field-relative accelerations.
    #[inline]
    pub fn to_field_relative(&self, robot_angle: &Rotation2d) -> ChassisAccelerations {
        let rotated = Translation2d::new(self.ax, self.ay).rotate_by(robot_angle);
        ChassisAccelerations::new(rotated.x, rotated.y, self.alpha)
    }

    /// Component-wise interpolation toward `end`; `t` clamped to [0, 1].
    #[inline]
    pub fn interpolate(&self, end: &ChassisAccelerations, t: f64) -> ChassisAccelerations {
        ChassisAccelerations::new(
            lerp(self.ax, end.ax, t),
            lerp(self.ay, end.ay, t),
            lerp(self.alpha, end.alpha, t),
        )
    }
}

impl Add for ChassisAccelerations {
    type Output = ChassisAccelerations;

    #[inline]
    fn add(self, rhs: ChassisAccelerations) -> ChassisAccelerations {
        ChassisAccelerations::new(self.ax + rhs.ax, self.ay + rhs.ay, self.alpha + rhs.alpha)
    }
}

impl Sub for ChassisAccelerations {
    type Output = ChassisAccelerations;

    #[inline]
    fn sub(self, rhs: ChassisAccelerations) -> ChassisAccelerations {
        ChassisAccelerations::new(self.ax - rhs.ax, self.ay - rhs.ay, self.alpha - rhs.alpha)
    }
}

impl Neg for ChassisAccelerations {
    type Output = ChassisAccelerations;

    #[inline]
    fn neg(self) -> ChassisAccelerations {
        ChassisAccelerations::new(-self.ax, -self.ay, -self.alpha)
    }
}

impl Mul<f64> for ChassisAccelerations {
    type Output = ChassisAccelerations;

    #[inline]
    fn mul(self, scalar: f64) -> ChassisAccelerations {
        ChassisAccelerations::new(self.ax * scalar, self.ay * scalar, self.alpha * scalar)
    }
}

impl Div<f64> for ChassisAccelerations {
    type Output = ChassisAccelerations;

    #[inline]
    fn div(self, scalar: f64) -> ChassisAccelerations {
        ChassisAccelerations::new(self.ax / scalar, self.ay / scalar, self.alpha / scalar)
    }
}

impl AbsDiffEq for ChassisAccelerations {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.ax.abs_diff_eq(&other.ax, epsilon)
            && self.ay.abs_diff_eq(&other.ay, epsilon)
            && self.alpha.abs_diff_eq(&other.alpha, epsilon)
    }
}

impl RelativeEq for ChassisAccelerations {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.ax.relative_eq(&other.ax, epsilon, max_relative)
            && self.ay.relative_eq(&other.ay, epsilon, max_relative)
            && self.alpha.relative_eq(&other.alpha, epsilon, max_relative)
    }
}
