//! Tangent-space motion types.
//!
//! A twist describes motion along a constant-curvature arc in the frame the
//! robot occupied at the start of the motion. It is not a pose difference:
//! [`Pose2d::exp`](super::Pose2d::exp) integrates a twist exactly along the
//! arc, and [`Pose2d::log`](super::Pose2d::log) recovers it.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

/// Planar twist: (dx, dy, dθ) in meters and radians.
///
/// Interpreted either as an incremental displacement over one control cycle
/// or, divided by the cycle time, as an instantaneous velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Twist2d {
    /// Forward displacement in meters
    pub dx: f64,
    /// Leftward displacement in meters
    pub dy: f64,
    /// Counter-clockwise rotation in radians
    pub dtheta: f64,
}

impl Twist2d {
    /// Create a new twist.
    #[inline]
    pub const fn new(dx: f64, dy: f64, dtheta: f64) -> Self {
        Self { dx, dy, dtheta }
    }
}

impl AbsDiffEq for Twist2d {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.dx.abs_diff_eq(&other.dx, epsilon)
            && self.dy.abs_diff_eq(&other.dy, epsilon)
            && self.dtheta.abs_diff_eq(&other.dtheta, epsilon)
    }
}

impl RelativeEq for Twist2d {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.dx.relative_eq(&other.dx, epsilon, max_relative)
            && self.dy.relative_eq(&other.dy, epsilon, max_relative)
            && self.dtheta.relative_eq(&other.dtheta, epsilon, max_relative)
    }
}

/// Spatial twist: (dx, dy, dz) translation plus an (rx, ry, rz) rotation
/// vector, both in the starting body frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Twist3d {
    /// X displacement in meters
    pub dx: f64,
    /// Y displacement in meters
    pub dy: f64,
    /// Z displacement in meters
    pub dz: f64,
    /// Rotation vector x component in radians
    pub rx: f64,
    /// Rotation vector y component in radians
    pub ry: f64,
    /// Rotation vector z component in radians
    pub rz: f64,
}

impl Twist3d {
    /// Create a new twist.
    #[inline]
    pub const fn new(dx: f64, dy: f64, dz: f64, rx: f64, ry: f64, rz: f64) -> Self {
        Self {
            dx,
            dy,
            dz,
            rx,
            ry,
            rz,
        }
    }

    /// Lift a planar twist into 3D (zero z translation, yaw-only rotation).
    #[inline]
    pub fn from_twist2d(twist: Twist2d) -> Self {
        Self::new(twist.dx, twist.dy, 0.0, 0.0, 0.0, twist.dtheta)
    }
}

impl AbsDiffEq for Twist3d {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.dx.abs_diff_eq(&other.dx, epsilon)
            && self.dy.abs_diff_eq(&other.dy, epsilon)
            && self.dz.abs_diff_eq(&other.dz, epsilon)
            && self.rx.abs_diff_eq(&other.rx, epsilon)
            && self.ry.abs_diff_eq(&other.ry, epsilon)
            && self.rz.abs_diff_eq(&other.rz, epsilon)
    }
}

impl RelativeEq for Twist3d {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.dx.relative_eq(&other.dx, epsilon, max_relative)
            && self.dy.relative_eq(&other.dy, epsilon, max_relative)
            && self.dz.relative_eq(&other.dz, epsilon, max_relative)
            && self.rx.relative_eq(&other.rx, epsilon, max_relative)
            && self.ry.relative_eq(&other.ry, epsilon, max_relative)
            && self.rz.relative_eq(&other.rz, epsilon, max_relative)
    }
}
