//! Chassis velocity type and the continuous-to-discrete correction.

use std::ops::{Add, Div, Mul, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use crate::core::geometry::{Pose2d, Rotation2d, Translation2d, Twist2d};
use crate::core::math::lerp;

/// Robot or field frame velocity: (vx, vy, ω).
///
/// Units are meters per second and radians per second. Positive vx is
/// forward (or field +x), positive vy is left (or field +y), positive ω is
/// counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChassisSpeeds {
    /// Linear velocity along x in m/s
    pub vx: f64,
    /// Linear velocity along y in m/s
    pub vy: f64,
    /// Angular velocity in rad/s, counter-clockwise positive
    pub omega: f64,
}

impl ChassisSpeeds {
    /// Create a new velocity triple.
    #[inline]
    pub const fn new(vx: f64, vy: f64, omega: f64) -> Self {
        Self { vx, vy, omega }
    }

    /// Build a chassis velocity from a twist accumulated over `dt` seconds.
    #[inline]
    pub fn from_twist(twist: &Twist2d, dt: f64) -> Self {
        Self::new(twist.dx / dt, twist.dy / dt, twist.dtheta / dt)
    }

    /// Convert field-relative speeds to robot-relative speeds.
    ///
    /// `robot_angle` is the robot's field-relative heading (as reported by
    /// the gyro).
    #[inline]
    pub fn to_robot_relative(&self, robot_angle: &Rotation2d) -> ChassisSpeeds {
        let rotated = Translation2d::new(self.vx, self.vy).rotate_by(&-*robot_angle);
        ChassisSpeeds::new(rotated.x, rotated.y, self.omega)
    }

    /// Convert robot-relative speeds to field-relative speeds.
    #[inline]
    pub fn to_field_relative(&self, robot_angle: &Rotation2d) -> ChassisSpeeds {
        let rotated = Translation2d::new(self.vx, self.vy).rotate_by(robot_angle);
        ChassisSpeeds::new(rotated.x, rotated.y, self.omega)
    }

    /// Compensate for translational skew when a continuous velocity is held
    /// constant over a discrete timestep.
    ///
    /// Integrating vx, vy, ω independently over `dt` is wrong for holonomic
    /// drives: translation and rotation are coupled on SE(2), so the chassis
    /// drifts off the intended straight-line path while it rotates. This
    /// builds the pose the caller actually wants after `dt` (translation and
    /// rotation applied independently), takes the exact twist that reaches
    /// that pose through [`Pose2d::exp`], and divides it back into a
    /// velocity.
    ///
    /// Scaling the returned speeds afterwards (e.g. desaturation) reintroduces
    /// a different skew that this correction cannot see; discretize as the
    /// last step before inverse kinematics where possible.
    pub fn discretize(&self, dt: f64) -> ChassisSpeeds {
        let desired_delta_pose = Pose2d::from_xy(
            self.vx * dt,
            self.vy * dt,
            Rotation2d::new(self.omega * dt),
        );
        let twist = Pose2d::IDENTITY.log(&desired_delta_pose);
        ChassisSpeeds::from_twist(&twist, dt)
    }

    /// Component-wise interpolation toward `end`; `t` clamped to [0, 1].
    #[inline]
    pub fn interpolate(&self, end: &ChassisSpeeds, t: f64) -> ChassisSpeeds {
        ChassisSpeeds::new(
            lerp(self.vx, end.vx, t),
            lerp(self.vy, end.vy, t),
            lerp(self.omega, end.omega, t),
        )
    }
}

impl Add for ChassisSpeeds {
    type Output = ChassisSpeeds;

    #[inline]
    fn add(self, rhs: ChassisSpeeds) -> ChassisSpeeds {
        ChassisSpeeds::new(self.vx + rhs.vx, self.vy + rhs.vy, self.omega + rhs.omega)
    }
}

impl Sub for ChassisSpeeds {
    type Output = ChassisSpeeds;

    #[inline]
    fn sub(self, rhs: ChassisSpeeds) -> ChassisSpeeds {
        ChassisSpeeds::new(self.vx - rhs.vx, self.vy - rhs.vy, self.omega - rhs.omega)
    }
}

impl Neg for ChassisSpeeds {
    type Output = ChassisSpeeds;

    #[inline]
    fn neg(self) -> ChassisSpeeds {
        ChassisSpeeds::new(-self.vx, -self.vy, -self.omega)
    }
}

impl Mul<f64> for ChassisSpeeds {
    type Output = ChassisSpeeds;

    #[inline]
    fn mul(self, scalar: f64) -> ChassisSpeeds {
        ChassisSpeeds::new(self.vx * scalar, self.vy * scalar, self.omega * scalar)
    }
}

impl Div<f64> for ChassisSpeeds {
    type Output = ChassisSpeeds;

    #[inline]
    fn div(self, scalar: f64) -> ChassisSpeeds {
        ChassisSpeeds::new(self.vx / scalar, self.vy / scalar, self.omega / scalar)
    }
}

impl AbsDiffEq for ChassisSpeeds {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.vx.abs_diff_eq(&other.vx, epsilon)
            && self.vy.abs_diff_eq(&other.vy, epsilon)
            && self.omega.abs_diff_eq(&other.omega, epsilon)
    }
}

impl RelativeEq for ChassisSpeeds {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.vx.relative_eq(&other.vx, epsilon, max_relative)
            && self.vy.relative_eq(&other.vy, epsilon, max_relative)
            && self.omega.relative_eq(&other.omega, epsilon, max_relative)
    }
}
