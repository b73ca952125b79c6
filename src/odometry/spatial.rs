//! Spatial (SE(3)) odometry integrator.
//!
//! Identical cycle to the planar integrator, but the heading source is a
//! full 3D rotation (e.g. an IMU reporting roll and pitch as well as yaw),
//! so driving on ramps and uneven floors integrates correctly instead of
//! projecting everything onto the floor plane.

use crate::core::geometry::{Pose3d, Rotation3d, Translation3d, Twist3d};
use crate::kinematics::Kinematics;

/// Field-relative 3D pose integrator for one drivetrain.
///
/// The planar twist from the drivetrain's wheel geometry is lifted into a
/// [`Twist3d`] whose rotational block is the gyro delta's rotation vector;
/// the wheels contribute no z translation of their own.
#[derive(Debug, Clone)]
pub struct Odometry3d<K: Kinematics> {
    kinematics: K,
    pose: Pose3d,
    gyro_offset: Rotation3d,
    previous_angle: Rotation3d,
    previous_positions: K::WheelPositions,
}

impl<K: Kinematics> Odometry3d<K> {
    /// Create an integrator from the current gyro orientation and wheel
    /// readings, placing the robot at `initial_pose`.
    pub fn new(
        kinematics: K,
        gyro_angle: Rotation3d,
        wheel_positions: K::WheelPositions,
        initial_pose: Pose3d,
    ) -> Self {
        Self {
            kinematics,
            pose: initial_pose,
            gyro_offset: -gyro_angle + initial_pose.rotation,
            previous_angle: initial_pose.rotation,
            previous_positions: wheel_positions,
        }
    }

    /// The current pose estimate.
    #[inline]
    pub fn pose(&self) -> Pose3d {
        self.pose
    }

    /// Reinitialize all state as if freshly constructed at `pose` with the
    /// given readings. The physical gyro does not need to be re-zeroed.
    pub fn reset_position(
        &mut self,
        gyro_angle: Rotation3d,
        wheel_positions: K::WheelPositions,
        pose: Pose3d,
    ) {
        log::debug!(
            "odometry3d reset to ({:.3}, {:.3}, {:.3})",
            pose.translation.x,
            pose.translation.y,
            pose.translation.z
        );
        self.pose = pose;
        self.gyro_offset = -gyro_angle + pose.rotation;
        self.previous_angle = pose.rotation;
        self.previous_positions = wheel_positions;
    }

    /// Move the pose estimate, keeping the current gyro and wheel readings
    /// valid for the next update.
    pub fn reset_pose(&mut self, pose: Pose3d) {
        self.gyro_offset = self.gyro_offset + (-self.pose.rotation + pose.rotation);
        self.pose = pose;
        self.previous_angle = pose.rotation;
    }

    /// Move only the translation of the pose estimate.
    pub fn reset_translation(&mut self, translation: Translation3d) {
        self.pose = Pose3d::new(translation, self.pose.rotation);
    }

    /// Jump the field-relative rotation to `rotation` by adjusting the gyro
    /// offset.
    pub fn reset_rotation(&mut self, rotation: Rotation3d) {
        self.gyro_offset = self.gyro_offset + (-self.pose.rotation + rotation);
        self.pose = Pose3d::new(self.pose.translation, rotation);
        self.previous_angle = rotation;
    }

    /// Integrate one cycle of wheel and gyro readings and return the new
    /// pose. The gyro is authoritative for all three rotation axes.
    pub fn update(&mut self, gyro_angle: Rotation3d, wheel_positions: &K::WheelPositions) -> Pose3d {
        let angle = gyro_angle + self.gyro_offset;
        let angle_delta = (angle - self.previous_angle).to_rotation_vector();

        let twist2d = self
            .kinematics
            .to_twist2d(&self.previous_positions, wheel_positions);
        let twist = Twist3d::new(
            twist2d.dx,
            twist2d.dy,
            0.0,
            angle_delta.x,
            angle_delta.y,
            angle_delta.z,
        );

        let new_pose = self.pose.exp(&twist);

        self.previous_angle = angle;
        self.previous_positions = wheel_positions.clone();
        self.pose = Pose3d::new(new_pose.translation, angle);
        self.pose
    }
}
