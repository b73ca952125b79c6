//! Per-module value types for swerve drivetrains.

use std::f64::consts::{FRAC_PI_2, PI};

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use crate::core::geometry::Rotation2d;
use crate::core::math::lerp;

/// Commanded or measured state of one swerve module: drive speed plus
/// steering angle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SwerveModuleState {
    /// Drive wheel speed in m/s
    pub speed: f64,
    /// Steering angle of the module
    pub angle: Rotation2d,
}

impl SwerveModuleState {
    /// Create a new module state.
    #[inline]
    pub const fn new(speed: f64, angle: Rotation2d) -> Self {
        Self { speed, angle }
    }

    /// Flip the command so the module never steers through more than 90°.
    ///
    /// If the shortest rotation from `current_angle` to the target exceeds
    /// 90°, steer to the diametrically opposite angle and negate the speed
    /// instead. Only sound when the steering controller treats angle as
    /// continuous (wrapping at ±180°); without continuous-input control the
    /// flipped command can make the module take the long way around.
    pub fn optimize(&mut self, current_angle: &Rotation2d) {
        let delta = self.angle - *current_angle;
        if delta.radians().abs() > FRAC_PI_2 {
            self.speed = -self.speed;
            self.angle = self.angle + Rotation2d::new(PI);
        }
    }

    /// Scale the speed by the cosine of the steering error.
    ///
    /// While the module is still rotating toward its target angle, the
    /// projection of its velocity onto the target direction is what actually
    /// moves the robot; scaling by the cosine trims the skidding component
    /// and smooths the transient.
    pub fn cosine_scale(&mut self, current_angle: &Rotation2d) {
        self.speed *= (self.angle - *current_angle).cos();
    }
}

impl AbsDiffEq for SwerveModuleState {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.speed.abs_diff_eq(&other.speed, epsilon)
            && self.angle.abs_diff_eq(&other.angle, epsilon)
    }
}

impl RelativeEq for SwerveModuleState {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.speed.relative_eq(&other.speed, epsilon, max_relative)
            && self.angle.relative_eq(&other.angle, epsilon, max_relative)
    }
}

/// Accumulated drive distance and steering angle of one swerve module.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SwerveModulePosition {
    /// Accumulated drive wheel distance in meters
    pub distance: f64,
    /// Steering angle of the module
    pub angle: Rotation2d,
}

impl SwerveModulePosition {
    /// Create a new module position.
    #[inline]
    pub const fn new(distance: f64, angle: Rotation2d) -> Self {
        Self { distance, angle }
    }

    /// Interpolate toward `end`: distance linearly, angle along the shortest
    /// path; `t` clamped to [0, 1].
    #[inline]
    pub fn interpolate(&self, end: &SwerveModulePosition, t: f64) -> SwerveModulePosition {
        SwerveModulePosition::new(
            lerp(self.distance, end.distance, t),
            self.angle.interpolate(&end.angle, t),
        )
    }
}

impl AbsDiffEq for SwerveModulePosition {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.distance.abs_diff_eq(&other.distance, epsilon)
            && self.angle.abs_diff_eq(&other.angle, epsilon)
    }
}

impl RelativeEq for SwerveModulePosition {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.distance
            .relative_eq(&other.distance, epsilon, max_relative)
            && self.angle.relative_eq(&other.angle, epsilon, max_relative)
    }
}

/// Commanded or measured acceleration of one swerve module.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SwerveModuleAcceleration {
    /// Drive wheel acceleration in m/s²
    pub acceleration: f64,
    /// Direction of the acceleration vector
    pub angle: Rotation2d,
}

impl SwerveModuleAcceleration {
    /// Create a new module acceleration.
    #[inline]
    pub const fn new(acceleration: f64, angle: Rotation2d) -> Self {
        Self {
            acceleration,
            angle,
        }
    }
}

impl AbsDiffEq for SwerveModuleAcceleration {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.acceleration.abs_diff_eq(&other.acceleration, epsilon)
            && self.angle.abs_diff_eq(&other.angle, epsilon)
    }
}
