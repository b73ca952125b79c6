//! Chassis-frame motion types.
//!
//! - [`ChassisSpeeds`]: (vx, vy, ω) velocity triple
//! - [`ChassisAccelerations`]: (ax, ay, α) acceleration triple
//!
//! Both are frame-agnostic values: whether a given instance is robot-relative
//! or field-relative is tracked by the caller, with the
//! `to_robot_relative` / `to_field_relative` conversions moving between the
//! two. Non-holonomic drivetrains conventionally keep `vy = 0`, but that is a
//! usage convention, not an enforced invariant.

mod accelerations;
mod speeds;

pub use accelerations::ChassisAccelerations;
pub use speeds::ChassisSpeeds;
