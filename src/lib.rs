//! GatiKinematics - drivetrain kinematics and odometry for wheeled mobile robots
//!
//! # Architecture
//!
//! The crate is organized into 4 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   odometry/                         │  ← Pose integration
//! │              (Odometry, Odometry3d)                 │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                  kinematics/                        │  ← Chassis ⇄ wheels
//! │    (differential, H-drive, mecanum, swerve)         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   chassis/                          │  ← Motion triples
//! │        (ChassisSpeeds, ChassisAccelerations)        │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                (geometry, math)                     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Data flow
//!
//! Per control cycle the data moves one way in each direction:
//!
//! - **Sensing**: wheel/gyro readings → [`Kinematics::to_twist2d`] →
//!   [`Odometry::update`] → pose consumed by controllers.
//! - **Actuation**: desired [`ChassisSpeeds`] → [`Kinematics::to_wheel_speeds`]
//!   → desaturation → setpoints consumed by motor controllers.
//!
//! Sensor acquisition, telemetry, feedback control, trajectory generation,
//! and scheduling all live outside this crate; the boundary is plain value
//! types in SI units (meters, radians, seconds).
//!
//! # Example
//!
//! ```
//! use gati_kinematics::{
//!     ChassisSpeeds, DifferentialDriveKinematics, DifferentialDriveWheelPositions, Kinematics,
//!     Odometry, Pose2d, Rotation2d,
//! };
//!
//! let mut kinematics = DifferentialDriveKinematics::new(0.5);
//!
//! // Inverse kinematics: chassis command to wheel setpoints
//! let mut wheel_speeds = kinematics.to_wheel_speeds(&ChassisSpeeds::new(1.5, 0.0, 0.2));
//! wheel_speeds.desaturate(2.0);
//!
//! // Odometry: integrate wheel and gyro readings into a field pose
//! let mut odometry = Odometry::new(
//!     kinematics,
//!     Rotation2d::IDENTITY,
//!     DifferentialDriveWheelPositions::default(),
//!     Pose2d::IDENTITY,
//! );
//! let pose = odometry.update(
//!     Rotation2d::IDENTITY,
//!     &DifferentialDriveWheelPositions::new(0.02, 0.02),
//! );
//! assert!((pose.translation.x - 0.02).abs() < 1e-9);
//! ```

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Chassis motion types (depends on core)
// ============================================================================
pub mod chassis;

// ============================================================================
// Layer 3: Kinematics (depends on core, chassis)
// ============================================================================
pub mod kinematics;

// ============================================================================
// Layer 4: Odometry (depends on all layers)
// ============================================================================
pub mod odometry;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use core::geometry::{Pose2d, Pose3d, Rotation2d, Rotation3d};
pub use core::geometry::{Translation2d, Translation3d, Twist2d, Twist3d};
pub use core::math;

// Chassis motion
pub use chassis::{ChassisAccelerations, ChassisSpeeds};

// Kinematics
pub use kinematics::{
    desaturate_wheel_speeds, desaturate_wheel_speeds_with_limits, Kinematics, WheelPositions,
};
pub use kinematics::{
    DifferentialDriveKinematics, DifferentialDriveWheelPositions, DifferentialDriveWheelSpeeds,
    HDriveKinematics, HDriveWheelPositions, HDriveWheelSpeeds, MecanumDriveKinematics,
    MecanumDriveWheelPositions, MecanumDriveWheelSpeeds, SwerveDriveKinematics,
    SwerveModuleAcceleration, SwerveModulePosition, SwerveModuleState,
};

// Odometry
pub use odometry::{
    DifferentialDriveOdometry, DifferentialDriveOdometry3d, HDriveOdometry, HDriveOdometry3d,
    MecanumDriveOdometry, MecanumDriveOdometry3d, Odometry, Odometry3d, SwerveDriveOdometry,
    SwerveDriveOdometry3d,
};
