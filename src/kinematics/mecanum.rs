//! Mecanum drive kinematics.
//!
//! Four 45-degree-roller wheels give the chassis all three planar degrees of
//! freedom. The wheel-speed system is overdetermined (4 equations, 3
//! unknowns), so forward kinematics goes through the Moore-Penrose
//! pseudoinverse and returns the least-squares chassis motion.

use std::ops::{Add, Div, Mul, Neg, Sub};

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{Matrix3x4, Matrix4x3, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use super::{Kinematics, WheelPositions};
use crate::chassis::ChassisSpeeds;
use crate::core::geometry::{Translation2d, Twist2d};
use crate::core::math::lerp;

/// Kinematics for a four-wheel mecanum drive.
///
/// Wheel offsets are measured from the robot's geometric center; the
/// conventional signs put front-left at (+x, +y), front-right at (+x, −y),
/// rear-left at (−x, +y), rear-right at (−x, −y).
///
/// Collinear wheel offsets make the inverse-kinematics matrix singular. That
/// is not an error: the pseudoinverse then returns a least-squares solution
/// with the unobservable velocity component silently folded in.
#[derive(Debug, Clone)]
pub struct MecanumDriveKinematics {
    front_left: Translation2d,
    front_right: Translation2d,
    rear_left: Translation2d,
    rear_right: Translation2d,

    /// 4x3 inverse-kinematics matrix for the most recently used center of
    /// rotation.
    inverse_kinematics: Matrix4x3<f64>,
    /// Pseudoinverse of the origin-CoR matrix; fixed at construction so
    /// forward kinematics always reports motion about the robot center.
    forward_kinematics: Matrix3x4<f64>,
    prev_cor: Translation2d,
}

impl MecanumDriveKinematics {
    /// Create kinematics from the four wheel offsets (meters from the robot
    /// center), in front-left, front-right, rear-left, rear-right order.
    pub fn new(
        front_left: Translation2d,
        front_right: Translation2d,
        rear_left: Translation2d,
        rear_right: Translation2d,
    ) -> Self {
        let inverse_kinematics =
            Self::build_inverse_kinematics(front_left, front_right, rear_left, rear_right);
        let forward_kinematics = pseudo_inverse_4x3(&inverse_kinematics);
        Self {
            front_left,
            front_right,
            rear_left,
            rear_right,
            inverse_kinematics,
            forward_kinematics,
            prev_cor: Translation2d::ZERO,
        }
    }

    /// Inverse kinematics about an arbitrary center of rotation.
    ///
    /// The 4x3 matrix is rebuilt only when `center_of_rotation` differs from
    /// the previous call, so steady-state solves stay a single matrix-vector
    /// product.
    pub fn to_wheel_speeds_about(
        &mut self,
        speeds: &ChassisSpeeds,
        center_of_rotation: Translation2d,
    ) -> MecanumDriveWheelSpeeds {
        if center_of_rotation != self.prev_cor {
            self.inverse_kinematics = Self::build_inverse_kinematics(
                self.front_left - center_of_rotation,
                self.front_right - center_of_rotation,
                self.rear_left - center_of_rotation,
                self.rear_right - center_of_rotation,
            );
            self.prev_cor = center_of_rotation;
        }

        let chassis = Vector3::new(speeds.vx, speeds.vy, speeds.omega);
        let wheels = self.inverse_kinematics * chassis;
        MecanumDriveWheelSpeeds::new(wheels[0], wheels[1], wheels[2], wheels[3])
    }

    /// Row pattern for 45-degree rollers, one (x, y) offset per wheel:
    ///
    /// ```text
    /// fl: [1, −1, −(x + y)]
    /// fr: [1,  1,   x − y ]
    /// rl: [1,  1,   x − y ]
    /// rr: [1, −1, −(x + y)]
    /// ```
    fn build_inverse_kinematics(
        fl: Translation2d,
        fr: Translation2d,
        rl: Translation2d,
        rr: Translation2d,
    ) -> Matrix4x3<f64> {
        #[rustfmt::skip]
        let matrix = Matrix4x3::new(
            1.0, -1.0, -(fl.x + fl.y),
            1.0,  1.0,   fr.x - fr.y,
            1.0,  1.0,   rl.x - rl.y,
            1.0, -1.0, -(rr.x + rr.y),
        );
        matrix
    }
}

impl Kinematics for MecanumDriveKinematics {
    type WheelSpeeds = MecanumDriveWheelSpeeds;
    type WheelPositions = MecanumDriveWheelPositions;

    fn to_wheel_speeds(&mut self, speeds: &ChassisSpeeds) -> MecanumDriveWheelSpeeds {
        self.to_wheel_speeds_about(speeds, Translation2d::ZERO)
    }

    fn to_chassis_speeds(&self, speeds: &MecanumDriveWheelSpeeds) -> ChassisSpeeds {
        let wheels = Vector4::new(
            speeds.front_left,
            speeds.front_right,
            speeds.rear_left,
            speeds.rear_right,
        );
        let chassis = self.forward_kinematics * wheels;
        ChassisSpeeds::new(chassis[0], chassis[1], chassis[2])
    }

    fn to_twist2d(
        &self,
        start: &MecanumDriveWheelPositions,
        end: &MecanumDriveWheelPositions,
    ) -> Twist2d {
        let delta = start.delta_to(end);
        let wheels = Vector4::new(
            delta.front_left,
            delta.front_right,
            delta.rear_left,
            delta.rear_right,
        );
        let chassis = self.forward_kinematics * wheels;
        Twist2d::new(chassis[0], chassis[1], chassis[2])
    }
}

/// SVD pseudoinverse of the inverse-kinematics matrix.
///
/// `pseudo_inverse` can only fail on a negative epsilon, which we never pass;
/// the fallback keeps the "singular geometry is not an error" contract by
/// degrading to a zero matrix instead of panicking.
fn pseudo_inverse_4x3(matrix: &Matrix4x3<f64>) -> Matrix3x4<f64> {
    matrix.pseudo_inverse(f64::EPSILON).unwrap_or_else(|_| {
        log::warn!("mecanum pseudoinverse failed; forward kinematics disabled");
        Matrix3x4::zeros()
    })
}

/// Wheel surface speeds in m/s, front-left / front-right / rear-left /
/// rear-right.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MecanumDriveWheelSpeeds {
    /// Front-left wheel speed in m/s
    pub front_left: f64,
    /// Front-right wheel speed in m/s
    pub front_right: f64,
    /// Rear-left wheel speed in m/s
    pub rear_left: f64,
    /// Rear-right wheel speed in m/s
    pub rear_right: f64,
}

impl MecanumDriveWheelSpeeds {
    /// Create a new wheel speed set.
    #[inline]
    pub const fn new(front_left: f64, front_right: f64, rear_left: f64, rear_right: f64) -> Self {
        Self {
            front_left,
            front_right,
            rear_left,
            rear_right,
        }
    }

    fn as_array(&self) -> [f64; 4] {
        [
            self.front_left,
            self.front_right,
            self.rear_left,
            self.rear_right,
        ]
    }

    /// Uniformly scale all four speeds down so none exceeds
    /// `attainable_max_speed`, preserving their ratios. No-op when already
    /// within the limit.
    pub fn desaturate(&mut self, attainable_max_speed: f64) {
        let real_max = self
            .as_array()
            .iter()
            .fold(0.0_f64, |acc, s| acc.max(s.abs()));
        if real_max > attainable_max_speed {
            let scale = attainable_max_speed / real_max;
            self.front_left *= scale;
            self.front_right *= scale;
            self.rear_left *= scale;
            self.rear_right *= scale;
        }
    }
}

impl Add for MecanumDriveWheelSpeeds {
    type Output = MecanumDriveWheelSpeeds;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.front_left + rhs.front_left,
            self.front_right + rhs.front_right,
            self.rear_left + rhs.rear_left,
            self.rear_right + rhs.rear_right,
        )
    }
}

impl Sub for MecanumDriveWheelSpeeds {
    type Output = MecanumDriveWheelSpeeds;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.front_left - rhs.front_left,
            self.front_right - rhs.front_right,
            self.rear_left - rhs.rear_left,
            self.rear_right - rhs.rear_right,
        )
    }
}

impl Neg for MecanumDriveWheelSpeeds {
    type Output = MecanumDriveWheelSpeeds;

    #[inline]
    fn neg(self) -> Self {
        Self::new(
            -self.front_left,
            -self.front_right,
            -self.rear_left,
            -self.rear_right,
        )
    }
}

impl Mul<f64> for MecanumDriveWheelSpeeds {
    type Output = MecanumDriveWheelSpeeds;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self::new(
            self.front_left * scalar,
            self.front_right * scalar,
            self.rear_left * scalar,
            self.rear_right * scalar,
        )
    }
}

impl Div<f64> for MecanumDriveWheelSpeeds {
    type Output = MecanumDriveWheelSpeeds;

    #[inline]
    fn div(self, scalar: f64) -> Self {
        Self::new(
            self.front_left / scalar,
            self.front_right / scalar,
            self.rear_left / scalar,
            self.rear_right / scalar,
        )
    }
}

/// Accumulated wheel distances in meters, same wheel order as
/// [`MecanumDriveWheelSpeeds`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MecanumDriveWheelPositions {
    /// Accumulated front-left wheel distance in meters
    pub front_left: f64,
    /// Accumulated front-right wheel distance in meters
    pub front_right: f64,
    /// Accumulated rear-left wheel distance in meters
    pub rear_left: f64,
    /// Accumulated rear-right wheel distance in meters
    pub rear_right: f64,
}

impl MecanumDriveWheelPositions {
    /// Create a new wheel position set.
    #[inline]
    pub const fn new(front_left: f64, front_right: f64, rear_left: f64, rear_right: f64) -> Self {
        Self {
            front_left,
            front_right,
            rear_left,
            rear_right,
        }
    }
}

impl WheelPositions for MecanumDriveWheelPositions {
    fn delta_to(&self, end: &Self) -> Self {
        Self::new(
            end.front_left - self.front_left,
            end.front_right - self.front_right,
            end.rear_left - self.rear_left,
            end.rear_right - self.rear_right,
        )
    }

    fn interpolate(&self, end: &Self, t: f64) -> Self {
        Self::new(
            lerp(self.front_left, end.front_left, t),
            lerp(self.front_right, end.front_right, t),
            lerp(self.rear_left, end.rear_left, t),
            lerp(self.rear_right, end.rear_right, t),
        )
    }
}

impl AbsDiffEq for MecanumDriveWheelPositions {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.front_left.abs_diff_eq(&other.front_left, epsilon)
            && self.front_right.abs_diff_eq(&other.front_right, epsilon)
            && self.rear_left.abs_diff_eq(&other.rear_left, epsilon)
            && self.rear_right.abs_diff_eq(&other.rear_right, epsilon)
    }
}

impl RelativeEq for MecanumDriveWheelPositions {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.front_left
            .relative_eq(&other.front_left, epsilon, max_relative)
            && self
                .front_right
                .relative_eq(&other.front_right, epsilon, max_relative)
            && self
                .rear_left
                .relative_eq(&other.rear_left, epsilon, max_relative)
            && self
                .rear_right
                .relative_eq(&other.rear_right, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::TAU;

    fn kinematics() -> MecanumDriveKinematics {
        MecanumDriveKinematics::new(
            Translation2d::new(0.3, 0.25),
            Translation2d::new(0.3, -0.25),
            Translation2d::new(-0.3, 0.25),
            Translation2d::new(-0.3, -0.25),
        )
    }

    #[test]
    fn test_straight_line_inverse() {
        let speeds = kinematics().to_wheel_speeds(&ChassisSpeeds::new(2.0, 0.0, 0.0));
        assert_relative_eq!(speeds.front_left, 2.0, epsilon = 1e-9);
        assert_relative_eq!(speeds.front_right, 2.0, epsilon = 1e-9);
        assert_relative_eq!(speeds.rear_left, 2.0, epsilon = 1e-9);
        assert_relative_eq!(speeds.rear_right, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_strafe_inverse() {
        let speeds = kinematics().to_wheel_speeds(&ChassisSpeeds::new(0.0, 1.0, 0.0));
        assert_relative_eq!(speeds.front_left, -1.0, epsilon = 1e-9);
        assert_relative_eq!(speeds.front_right, 1.0, epsilon = 1e-9);
        assert_relative_eq!(speeds.rear_left, 1.0, epsilon = 1e-9);
        assert_relative_eq!(speeds.rear_right, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_turn_in_place_signs() {
        let speeds = kinematics().to_wheel_speeds(&ChassisSpeeds::new(0.0, 0.0, TAU));
        // CCW: left side backward, right side forward
        assert!(speeds.front_left < 0.0);
        assert!(speeds.rear_left < 0.0);
        assert!(speeds.front_right > 0.0);
        assert!(speeds.rear_right > 0.0);
        assert_relative_eq!(speeds.front_left, -speeds.front_right, epsilon = 1e-9);
    }

    #[test]
    fn test_roundtrip() {
        let mut kin = kinematics();
        let original = ChassisSpeeds::new(1.0, -0.5, 0.7);
        let wheel_speeds = kin.to_wheel_speeds(&original);
        let roundtrip = kin.to_chassis_speeds(&wheel_speeds);
        assert_abs_diff_eq!(roundtrip, original, epsilon = 1e-9);
    }

    #[test]
    fn test_roundtrip_with_center_of_rotation() {
        let mut kin = kinematics();
        let original = ChassisSpeeds::new(0.0, 0.0, 1.5);
        let wheel_speeds = kin.to_wheel_speeds_about(&original, Translation2d::new(0.3, 0.25));
        // Forward kinematics reports motion about the robot center, where
        // rotating about the front-left wheel adds a translation component.
        let chassis = kin.to_chassis_speeds(&wheel_speeds);
        assert_relative_eq!(chassis.omega, 1.5, epsilon = 1e-9);
        assert!(chassis.vx.hypot(chassis.vy) > 0.1);
    }

    #[test]
    fn test_cor_cache_rebuild() {
        let mut kin = kinematics();
        let speeds = ChassisSpeeds::new(0.0, 0.0, 1.0);
        let about_center = kin.to_wheel_speeds(&speeds);
        let about_corner = kin.to_wheel_speeds_about(&speeds, Translation2d::new(0.3, 0.25));
        // Rotating about the front-left wheel parks that wheel
        assert_relative_eq!(about_corner.front_left, 0.0, epsilon = 1e-9);
        assert!(about_center.front_left.abs() > 0.1);
        // Back to the origin CoR: cache must not be stale
        let again = kin.to_wheel_speeds(&speeds);
        assert_relative_eq!(again.front_left, about_center.front_left, epsilon = 1e-12);
    }

    #[test]
    fn test_forward_kinematics_least_squares() {
        // Front wheels forward and rear wheels backward produces no chassis
        // motion any (vx, vy, ω) could explain; the pseudoinverse folds the
        // residual away and the least-squares answer is zero.
        let kin = kinematics();
        let chassis = kin.to_chassis_speeds(&MecanumDriveWheelSpeeds::new(1.0, 1.0, -1.0, -1.0));
        assert_relative_eq!(chassis.vx, 0.0, epsilon = 1e-9);
        assert_relative_eq!(chassis.vy, 0.0, epsilon = 1e-9);
        assert_relative_eq!(chassis.omega, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_twist_straight_line() {
        let kin = kinematics();
        let start = MecanumDriveWheelPositions::default();
        let end = MecanumDriveWheelPositions::new(1.0, 1.0, 1.0, 1.0);
        let twist = kin.to_twist2d(&start, &end);
        assert_abs_diff_eq!(twist, Twist2d::new(1.0, 0.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_desaturate() {
        let mut speeds = MecanumDriveWheelSpeeds::new(5.0, 6.0, 4.0, 7.0);
        speeds.desaturate(5.5);
        let factor = 5.5 / 7.0;
        assert_relative_eq!(speeds.front_left, 5.0 * factor, epsilon = 1e-9);
        assert_relative_eq!(speeds.front_right, 6.0 * factor, epsilon = 1e-9);
        assert_relative_eq!(speeds.rear_left, 4.0 * factor, epsilon = 1e-9);
        assert_relative_eq!(speeds.rear_right, 7.0 * factor, epsilon = 1e-9);
    }
}
