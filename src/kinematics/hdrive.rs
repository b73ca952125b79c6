//! H-drive kinematics: a differential drive plus a lateral roller axis.
//!
//! The lateral (strafe) wheel rides on omni rollers perpendicular to the main
//! drive wheels, giving the chassis a vy degree of freedom that is fully
//! decoupled from vx and ω.

use std::ops::{Add, Div, Mul, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::{Kinematics, WheelPositions};
use crate::chassis::ChassisSpeeds;
use crate::core::geometry::Twist2d;
use crate::core::math::lerp;

/// Kinematics for an H-drive: left/right drive wheels and one lateral wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HDriveKinematics {
    /// Distance between left and right wheel centers in meters.
    pub track_width: f64,
}

impl HDriveKinematics {
    /// Create kinematics for the given track width in meters.
    #[inline]
    pub const fn new(track_width: f64) -> Self {
        Self { track_width }
    }
}

impl Kinematics for HDriveKinematics {
    type WheelSpeeds = HDriveWheelSpeeds;
    type WheelPositions = HDriveWheelPositions;

    /// The differential solution for left/right, with `lateral = vy` passed
    /// straight through.
    fn to_wheel_speeds(&mut self, speeds: &ChassisSpeeds) -> HDriveWheelSpeeds {
        let half_omega = speeds.omega * self.track_width / 2.0;
        HDriveWheelSpeeds::new(
            speeds.vx - half_omega,
            speeds.vx + half_omega,
            speeds.vy,
        )
    }

    fn to_chassis_speeds(&self, speeds: &HDriveWheelSpeeds) -> ChassisSpeeds {
        ChassisSpeeds::new(
            (speeds.left + speeds.right) / 2.0,
            speeds.lateral,
            (speeds.right - speeds.left) / self.track_width,
        )
    }

    fn to_twist2d(&self, start: &HDriveWheelPositions, end: &HDriveWheelPositions) -> Twist2d {
        let delta = start.delta_to(end);
        Twist2d::new(
            (delta.left + delta.right) / 2.0,
            delta.lateral,
            (delta.right - delta.left) / self.track_width,
        )
    }
}

/// Left, right, and lateral wheel speeds in m/s.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HDriveWheelSpeeds {
    /// Left wheel speed in m/s
    pub left: f64,
    /// Right wheel speed in m/s
    pub right: f64,
    /// Lateral wheel speed in m/s, leftward positive
    pub lateral: f64,
}

impl HDriveWheelSpeeds {
    /// Create a new wheel speed triple.
    #[inline]
    pub const fn new(left: f64, right: f64, lateral: f64) -> Self {
        Self {
            left,
            right,
            lateral,
        }
    }

    /// Uniformly scale all three speeds down so none exceeds
    /// `attainable_max_speed`, preserving their ratios. No-op when already
    /// within the limit.
    pub fn desaturate(&mut self, attainable_max_speed: f64) {
        let real_max = self
            .left
            .abs()
            .max(self.right.abs())
            .max(self.lateral.abs());
        if real_max > attainable_max_speed {
            let scale = attainable_max_speed / real_max;
            self.left *= scale;
            self.right *= scale;
            self.lateral *= scale;
        }
    }
}

impl Add for HDriveWheelSpeeds {
    type Output = HDriveWheelSpeeds;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.left + rhs.left,
            self.right + rhs.right,
            self.lateral + rhs.lateral,
        )
    }
}

impl Sub for HDriveWheelSpeeds {
    type Output = HDriveWheelSpeeds;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.left - rhs.left,
            self.right - rhs.right,
            self.lateral - rhs.lateral,
        )
    }
}

impl Neg for HDriveWheelSpeeds {
    type Output = HDriveWheelSpeeds;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.left, -self.right, -self.lateral)
    }
}

impl Mul<f64> for HDriveWheelSpeeds {
    type Output = HDriveWheelSpeeds;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self::new(
            self.left * scalar,
            self.right * scalar,
            self.lateral * scalar,
        )
    }
}

impl Div<f64> for HDriveWheelSpeeds {
    type Output = HDriveWheelSpeeds;

    #[inline]
    fn div(self, scalar: f64) -> Self {
        Self::new(
            self.left / scalar,
            self.right / scalar,
            self.lateral / scalar,
        )
    }
}

/// Accumulated left, right, and lateral wheel distances in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HDriveWheelPositions {
    /// Accumulated left wheel distance in meters
    pub left: f64,
    /// Accumulated right wheel distance in meters
    pub right: f64,
    /// Accumulated lateral wheel distance in meters
    pub lateral: f64,
}

impl HDriveWheelPositions {
    /// Create a new wheel position triple.
    #[inline]
    pub const fn new(left: f64, right: f64, lateral: f64) -> Self {
        Self {
            left,
            right,
            lateral,
        }
    }
}

impl WheelPositions for HDriveWheelPositions {
    fn delta_to(&self, end: &Self) -> Self {
        Self::new(
            end.left - self.left,
            end.right - self.right,
            end.lateral - self.lateral,
        )
    }

    fn interpolate(&self, end: &Self, t: f64) -> Self {
        Self::new(
            lerp(self.left, end.left, t),
            lerp(self.right, end.right, t),
            lerp(self.lateral, end.lateral, t),
        )
    }
}

impl AbsDiffEq for HDriveWheelPositions {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.left.abs_diff_eq(&other.left, epsilon)
            && self.right.abs_diff_eq(&other.right, epsilon)
            && self.lateral.abs_diff_eq(&other.lateral, epsilon)
    }
}

impl RelativeEq for HDriveWheelPositions {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.left.relative_eq(&other.left, epsilon, max_relative)
            && self.right.relative_eq(&other.right, epsilon, max_relative)
            && self.lateral.relative_eq(&other.lateral, epsilon, max_relative)
    }
}
