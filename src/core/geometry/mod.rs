//! Geometry value types for pose math on SE(2) and SE(3).
//!
//! - [`Translation2d`] / [`Translation3d`]: points / displacements in meters
//! - [`Rotation2d`]: heading stored as a unit complex number (cos θ, sin θ)
//! - [`Rotation3d`]: orientation stored as a unit quaternion
//! - [`Pose2d`] / [`Pose3d`]: translation + rotation group elements
//! - [`Twist2d`] / [`Twist3d`]: tangent-space motion along a constant-curvature
//!   arc, used by [`Pose2d::exp`] / [`Pose3d::exp`] for exact integration
//!
//! Rotations are never stored as bare angles, so repeated composition stays
//! numerically stable over arbitrarily many control cycles.

mod pose;
mod rotation;
mod translation;
mod twist;

pub use pose::{Pose2d, Pose3d};
pub use rotation::{Rotation2d, Rotation3d};
pub use translation::{Translation2d, Translation3d};
pub use twist::{Twist2d, Twist3d};
