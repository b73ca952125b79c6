//! Dead-reckoning pose integration from wheel and gyro readings.
//!
//! [`Odometry`] tracks a field-relative [`Pose2d`](crate::core::geometry::Pose2d),
//! [`Odometry3d`] a full [`Pose3d`](crate::core::geometry::Pose3d). Both are
//! generic over a [`Kinematics`](crate::kinematics::Kinematics) instance and
//! follow the same cycle: wheel-position deltas become a chassis twist, the
//! gyro overrides the twist's rotation (wheel-derived rotation is
//! systematically biased by scrub and slip), and the pose integrates the
//! twist through the exact exponential map.
//!
//! An odometry instance is created once per drivetrain at startup and must be
//! confined to the single task that calls `update` each control cycle.
//! Concurrent or reentrant calls on one instance are undefined; the produced
//! pose values are plain `Copy` data and safe to hand to other threads.

mod planar;
mod spatial;

pub use planar::Odometry;
pub use spatial::Odometry3d;

use crate::kinematics::{
    DifferentialDriveKinematics, HDriveKinematics, MecanumDriveKinematics, SwerveDriveKinematics,
};

/// Planar odometry for a differential drive.
pub type DifferentialDriveOdometry = Odometry<DifferentialDriveKinematics>;
/// Planar odometry for an H-drive.
pub type HDriveOdometry = Odometry<HDriveKinematics>;
/// Planar odometry for a mecanum drive.
pub type MecanumDriveOdometry = Odometry<MecanumDriveKinematics>;
/// Planar odometry for a swerve drive with `N` modules.
pub type SwerveDriveOdometry<const N: usize> = Odometry<SwerveDriveKinematics<N>>;

/// Spatial odometry for a differential drive.
pub type DifferentialDriveOdometry3d = Odometry3d<DifferentialDriveKinematics>;
/// Spatial odometry for an H-drive.
pub type HDriveOdometry3d = Odometry3d<HDriveKinematics>;
/// Spatial odometry for a mecanum drive.
pub type MecanumDriveOdometry3d = Odometry3d<MecanumDriveKinematics>;
/// Spatial odometry for a swerve drive with `N` modules.
pub type SwerveDriveOdometry3d<const N: usize> = Odometry3d<SwerveDriveKinematics<N>>;
