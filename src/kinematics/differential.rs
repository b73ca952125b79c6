//! Differential (tank) drive kinematics.

use std::ops::{Add, Div, Mul, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::{Kinematics, WheelPositions};
use crate::chassis::ChassisSpeeds;
use crate::core::geometry::Twist2d;
use crate::core::math::lerp;

/// Kinematics for a two-wheeled differential drive.
///
/// The only geometric parameter is the track width: the distance between the
/// left and right wheel centers. Empirically measured track widths (driving
/// the robot in a circle and solving for the width) tend to beat the CAD
/// value, since wheel scrub acts like a wider track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifferentialDriveKinematics {
    /// Distance between left and right wheel centers in meters.
    pub track_width: f64,
}

impl DifferentialDriveKinematics {
    /// Create kinematics for the given track width in meters.
    #[inline]
    pub const fn new(track_width: f64) -> Self {
        Self { track_width }
    }

    /// Twist implied by a pair of wheel-distance deltas.
    ///
    /// Convenience for callers that track distances as bare scalars instead
    /// of [`DifferentialDriveWheelPositions`].
    #[inline]
    pub fn twist_from_distances(&self, left: f64, right: f64) -> Twist2d {
        Twist2d::new(
            (left + right) / 2.0,
            0.0,
            (right - left) / self.track_width,
        )
    }
}

impl Kinematics for DifferentialDriveKinematics {
    type WheelSpeeds = DifferentialDriveWheelSpeeds;
    type WheelPositions = DifferentialDriveWheelPositions;

    /// `left = vx − ω·track/2`, `right = vx + ω·track/2`. The vy component
    /// is unrealizable on a differential drive and is ignored.
    fn to_wheel_speeds(&mut self, speeds: &ChassisSpeeds) -> DifferentialDriveWheelSpeeds {
        let half_omega = speeds.omega * self.track_width / 2.0;
        DifferentialDriveWheelSpeeds::new(speeds.vx - half_omega, speeds.vx + half_omega)
    }

    fn to_chassis_speeds(&self, speeds: &DifferentialDriveWheelSpeeds) -> ChassisSpeeds {
        ChassisSpeeds::new(
            (speeds.left + speeds.right) / 2.0,
            0.0,
            (speeds.right - speeds.left) / self.track_width,
        )
    }

    fn to_twist2d(
        &self,
        start: &DifferentialDriveWheelPositions,
        end: &DifferentialDriveWheelPositions,
    ) -> Twist2d {
        let delta = start.delta_to(end);
        self.twist_from_distances(delta.left, delta.right)
    }
}

/// Left and right wheel speeds in m/s.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DifferentialDriveWheelSpeeds {
    /// Left wheel speed in m/s
    pub left: f64,
    /// Right wheel speed in m/s
    pub right: f64,
}

impl DifferentialDriveWheelSpeeds {
    /// Create a new wheel speed pair.
    #[inline]
    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Uniformly scale both speeds down so neither exceeds
    /// `attainable_max_speed`, preserving their ratio (and therefore the
    /// commanded curvature). No-op when already within the limit.
    pub fn desaturate(&mut self, attainable_max_speed: f64) {
        let real_max = self.left.abs().max(self.right.abs());
        if real_max > attainable_max_speed {
            let scale = attainable_max_speed / real_max;
            self.left *= scale;
            self.right *= scale;
        }
    }
}

impl Add for DifferentialDriveWheelSpeeds {
    type Output = DifferentialDriveWheelSpeeds;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.left + rhs.left, self.right + rhs.right)
    }
}

impl Sub for DifferentialDriveWheelSpeeds {
    type Output = DifferentialDriveWheelSpeeds;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.left - rhs.left, self.right - rhs.right)
    }
}

impl Neg for DifferentialDriveWheelSpeeds {
    type Output = DifferentialDriveWheelSpeeds;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.left, -self.right)
    }
}

impl Mul<f64> for DifferentialDriveWheelSpeeds {
    type Output = DifferentialDriveWheelSpeeds;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self::new(self.left * scalar, self.right * scalar)
    }
}

impl Div<f64> for DifferentialDriveWheelSpeeds {
    type Output = DifferentialDriveWheelSpeeds;

    #[inline]
    fn div(self, scalar: f64) -> Self {
        Self::new(self.left / scalar, self.right / scalar)
    }
}

/// Accumulated left and right wheel distances in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DifferentialDriveWheelPositions {
    /// Accumulated left wheel distance in meters
    pub left: f64,
    /// Accumulated right wheel distance in meters
    pub right: f64,
}

impl DifferentialDriveWheelPositions {
    /// Create a new wheel position pair.
    #[inline]
    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }
}

impl WheelPositions for DifferentialDriveWheelPositions {
    fn delta_to(&self, end: &Self) -> Self {
        Self::new(end.left - self.left, end.right - self.right)
    }

    fn interpolate(&self, end: &Self, t: f64) -> Self {
        Self::new(lerp(self.left, end.left, t), lerp(self.right, end.right, t))
    }
}

impl AbsDiffEq for DifferentialDriveWheelPositions {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.left.abs_diff_eq(&other.left, epsilon)
            && self.right.abs_diff_eq(&other.right, epsilon)
    }
}

impl RelativeEq for DifferentialDriveWheelPositions {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.left.relative_eq(&other.left, epsilon, max_relative)
            && self.right.relative_eq(&other.right, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn kinematics() -> DifferentialDriveKinematics {
        DifferentialDriveKinematics::new(0.5)
    }

    #[test]
    fn test_straight_line_inverse() {
        let speeds = kinematics().to_wheel_speeds(&ChassisSpeeds::new(3.0, 0.0, 0.0));
        assert_relative_eq!(speeds.left, 3.0);
        assert_relative_eq!(speeds.right, 3.0);
    }

    #[test]
    fn test_turn_in_place_inverse() {
        // ω = 2 rad/s over a 0.5 m track: each wheel at 0.5 m/s, opposite signs
        let speeds = kinematics().to_wheel_speeds(&ChassisSpeeds::new(0.0, 0.0, 2.0));
        assert_relative_eq!(speeds.left, -0.5);
        assert_relative_eq!(speeds.right, 0.5);
    }

    #[test]
    fn test_vy_is_ignored() {
        let speeds = kinematics().to_wheel_speeds(&ChassisSpeeds::new(1.0, 5.0, 0.0));
        assert_relative_eq!(speeds.left, 1.0);
        assert_relative_eq!(speeds.right, 1.0);
    }

    #[test]
    fn test_forward_kinematics() {
        let chassis =
            kinematics().to_chassis_speeds(&DifferentialDriveWheelSpeeds::new(1.0, 2.0));
        assert_relative_eq!(chassis.vx, 1.5);
        assert_relative_eq!(chassis.vy, 0.0);
        assert_relative_eq!(chassis.omega, 2.0);
    }

    #[test]
    fn test_roundtrip() {
        let mut kin = kinematics();
        let original = ChassisSpeeds::new(1.2, 0.0, -0.8);
        let wheel_speeds = kin.to_wheel_speeds(&original);
        let roundtrip = kin.to_chassis_speeds(&wheel_speeds);
        assert_abs_diff_eq!(roundtrip, original, epsilon = 1e-9);
    }

    #[test]
    fn test_twist_from_positions() {
        let start = DifferentialDriveWheelPositions::new(1.0, 1.0);
        let end = DifferentialDriveWheelPositions::new(2.0, 2.0);
        let twist = kinematics().to_twist2d(&start, &end);
        assert_abs_diff_eq!(twist, Twist2d::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_twist_turn_in_place() {
        let start = DifferentialDriveWheelPositions::default();
        let end = DifferentialDriveWheelPositions::new(-0.25, 0.25);
        let twist = kinematics().to_twist2d(&start, &end);
        assert_relative_eq!(twist.dx, 0.0);
        assert_relative_eq!(twist.dtheta, 1.0);
    }

    #[test]
    fn test_desaturate_scales_uniformly() {
        let mut speeds = DifferentialDriveWheelSpeeds::new(4.0, -2.0);
        speeds.desaturate(2.0);
        assert_relative_eq!(speeds.left, 2.0);
        assert_relative_eq!(speeds.right, -1.0);
    }

    #[test]
    fn test_desaturate_is_noop_within_limit() {
        let mut speeds = DifferentialDriveWheelSpeeds::new(1.0, -1.5);
        speeds.desaturate(2.0);
        assert_relative_eq!(speeds.left, 1.0);
        assert_relative_eq!(speeds.right, -1.5);
    }

    #[test]
    fn test_desaturate_idempotent() {
        let mut once = DifferentialDriveWheelSpeeds::new(5.0, 3.0);
        once.desaturate(2.0);
        let mut twice = once;
        twice.desaturate(2.0);
        assert_relative_eq!(once.left, twice.left);
        assert_relative_eq!(once.right, twice.right);
    }

    #[test]
    fn test_positions_interpolate() {
        let a = DifferentialDriveWheelPositions::new(0.0, 0.0);
        let b = DifferentialDriveWheelPositions::new(2.0, 4.0);
        let mid = a.interpolate(&b, 0.5);
        assert_relative_eq!(mid.left, 1.0);
        assert_relative_eq!(mid.right, 2.0);
    }
}
