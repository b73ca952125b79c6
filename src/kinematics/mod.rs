//! Drivetrain kinematics: chassis motion ⇄ wheel motion.
//!
//! One shared contract, four topologies:
//!
//! | Topology | Wheels → DOF | Forward kinematics |
//! |----------|--------------|--------------------|
//! | [`DifferentialDriveKinematics`] | 2 → (vx, ω) | closed form |
//! | [`HDriveKinematics`] | 2 + lateral → (vx, vy, ω) | closed form |
//! | [`MecanumDriveKinematics`] | 4 → (vx, vy, ω) | least-squares pseudoinverse |
//! | [`SwerveDriveKinematics`] | N ≥ 2 modules → (vx, vy, ω) | least-squares pseudoinverse |
//!
//! Inverse kinematics ([`Kinematics::to_wheel_speeds`]) turns a desired
//! [`ChassisSpeeds`] into per-wheel setpoints; forward kinematics
//! ([`Kinematics::to_chassis_speeds`]) inverts measured wheel motion back to
//! chassis motion; [`Kinematics::to_twist2d`] is the position-domain forward
//! solve preferred by odometry, since distance counters do not carry the
//! quantization noise of a differentiated rate signal.
//!
//! # Threading
//!
//! The matrix-based implementations own small caches (a center-of-rotation-
//! keyed inverse matrix, and for swerve the per-module heading memory), which
//! is why `to_wheel_speeds` takes `&mut self`. A kinematics instance is a
//! single-thread object; the value types it produces are freely shareable.

mod differential;
mod hdrive;
mod mecanum;
mod swerve;

pub use differential::{
    DifferentialDriveKinematics, DifferentialDriveWheelPositions, DifferentialDriveWheelSpeeds,
};
pub use hdrive::{HDriveKinematics, HDriveWheelPositions, HDriveWheelSpeeds};
pub use mecanum::{MecanumDriveKinematics, MecanumDriveWheelPositions, MecanumDriveWheelSpeeds};
pub use swerve::{
    desaturate_wheel_speeds, desaturate_wheel_speeds_with_limits, SwerveDriveKinematics,
    SwerveModuleAcceleration, SwerveModulePosition, SwerveModuleState,
};

use crate::chassis::ChassisSpeeds;
use crate::core::geometry::Twist2d;

/// Accumulated wheel-distance readings for one drivetrain topology.
///
/// Positions are monotonically-increasing floating measurements, so equality
/// comparisons should go through the `approx` traits (all implementors use a
/// 1e-9 absolute tolerance) rather than exact `==`.
pub trait WheelPositions: Clone + std::fmt::Debug {
    /// Per-wheel delta from `self` to `end` (`end − self` distances).
    fn delta_to(&self, end: &Self) -> Self;

    /// Per-wheel interpolation toward `end`; `t` clamped to [0, 1].
    fn interpolate(&self, end: &Self, t: f64) -> Self;
}

/// Conversion between chassis-frame motion and per-wheel motion for one
/// drivetrain topology.
pub trait Kinematics {
    /// Per-wheel velocity setpoints/measurements.
    type WheelSpeeds;
    /// Per-wheel accumulated distance measurements.
    type WheelPositions: WheelPositions;

    /// Inverse kinematics: chassis velocity to wheel speeds, about the
    /// robot's geometric center.
    ///
    /// Takes `&mut self` because matrix-based implementations memoize the
    /// inverse-kinematics matrix (and swerve additionally updates its held
    /// module headings).
    fn to_wheel_speeds(&mut self, speeds: &ChassisSpeeds) -> Self::WheelSpeeds;

    /// Forward kinematics: measured wheel speeds to chassis velocity.
    ///
    /// For overdetermined topologies this is the least-squares solution
    /// through the Moore-Penrose pseudoinverse.
    fn to_chassis_speeds(&self, speeds: &Self::WheelSpeeds) -> ChassisSpeeds;

    /// Position-domain forward kinematics: the chassis twist implied by the
    /// change between two wheel-position readings.
    fn to_twist2d(&self, start: &Self::WheelPositions, end: &Self::WheelPositions) -> Twist2d;
}
