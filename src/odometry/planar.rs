//! Planar (SE(2)) odometry integrator.

use crate::core::geometry::{Pose2d, Rotation2d, Translation2d};
use crate::kinematics::Kinematics;

/// Field-relative pose integrator for one drivetrain.
///
/// Holds the current pose estimate, an owned copy of the previous wheel
/// positions, and the gyro offset (field angle minus gyro angle at the last
/// reset). The offset lets callers reset the field-relative rotation without
/// re-zeroing the physical gyro, which may be shared with other consumers
/// that must not be disturbed.
#[derive(Debug, Clone)]
pub struct Odometry<K: Kinematics> {
    kinematics: K,
    pose: Pose2d,
    gyro_offset: Rotation2d,
    previous_angle: Rotation2d,
    previous_positions: K::WheelPositions,
}

impl<K: Kinematics> Odometry<K> {
    /// Create an integrator from the current gyro angle and wheel readings,
    /// placing the robot at `initial_pose`.
    pub fn new(
        kinematics: K,
        gyro_angle: Rotation2d,
        wheel_positions: K::WheelPositions,
        initial_pose: Pose2d,
    ) -> Self {
        Self {
            kinematics,
            pose: initial_pose,
            gyro_offset: initial_pose.rotation - gyro_angle,
            previous_angle: initial_pose.rotation,
            previous_positions: wheel_positions,
        }
    }

    /// The current pose estimate.
    #[inline]
    pub fn pose(&self) -> Pose2d {
        self.pose
    }

    /// Reinitialize all state as if freshly constructed at `pose` with the
    /// given readings. The physical gyro does not need to be re-zeroed.
    pub fn reset_position(
        &mut self,
        gyro_angle: Rotation2d,
        wheel_positions: K::WheelPositions,
        pose: Pose2d,
    ) {
        log::debug!(
            "odometry reset to ({:.3}, {:.3}, {:.1} deg)",
            pose.translation.x,
            pose.translation.y,
            pose.rotation.degrees()
        );
        self.pose = pose;
        self.gyro_offset = pose.rotation - gyro_angle;
        self.previous_angle = pose.rotation;
        self.previous_positions = wheel_positions;
    }

    /// Move the pose estimate, keeping the current gyro and wheel readings
    /// valid for the next update.
    pub fn reset_pose(&mut self, pose: Pose2d) {
        self.gyro_offset = self.gyro_offset + (pose.rotation - self.pose.rotation);
        self.pose = pose;
        self.previous_angle = pose.rotation;
    }

    /// Move only the translation of the pose estimate.
    pub fn reset_translation(&mut self, translation: Translation2d) {
        self.pose = Pose2d::new(translation, self.pose.rotation);
    }

    /// Jump the field-relative rotation to `rotation` by adjusting the gyro
    /// offset.
    pub fn reset_rotation(&mut self, rotation: Rotation2d) {
        self.gyro_offset = self.gyro_offset + (rotation - self.pose.rotation);
        self.pose = Pose2d::new(self.pose.translation, rotation);
        self.previous_angle = rotation;
    }

    /// Integrate one cycle of wheel and gyro readings and return the new
    /// pose.
    ///
    /// The chassis twist comes from the wheel-position deltas, but its
    /// rotation component is overridden with the gyro delta: the gyro is
    /// authoritative for rotation, while wheel-derived rotation carries a
    /// systematic scrub/slip bias.
    pub fn update(&mut self, gyro_angle: Rotation2d, wheel_positions: &K::WheelPositions) -> Pose2d {
        let angle = gyro_angle + self.gyro_offset;

        let mut twist = self
            .kinematics
            .to_twist2d(&self.previous_positions, wheel_positions);
        twist.dtheta = (angle - self.previous_angle).radians();

        let new_pose = self.pose.exp(&twist);

        self.previous_angle = angle;
        self.previous_positions = wheel_positions.clone();
        self.pose = Pose2d::new(new_pose.translation, angle);
        self.pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::{
        DifferentialDriveKinematics, DifferentialDriveWheelPositions, MecanumDriveKinematics,
        MecanumDriveWheelPositions,
    };
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn differential_odometry() -> Odometry<DifferentialDriveKinematics> {
        Odometry::new(
            DifferentialDriveKinematics::new(0.5),
            Rotation2d::IDENTITY,
            DifferentialDriveWheelPositions::default(),
            Pose2d::IDENTITY,
        )
    }

    #[test]
    fn test_straight_line() {
        let mut odometry = differential_odometry();
        let pose = odometry.update(
            Rotation2d::IDENTITY,
            &DifferentialDriveWheelPositions::new(1.0, 1.0),
        );
        assert_relative_eq!(pose.translation.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(pose.translation.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(pose.rotation.radians(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gyro_overrides_wheel_rotation() {
        // Wheels claim straight-line motion, but the gyro saw a quarter turn;
        // the gyro wins the rotation argument.
        let mut odometry = differential_odometry();
        let pose = odometry.update(
            Rotation2d::new(FRAC_PI_2),
            &DifferentialDriveWheelPositions::new(1.0, 1.0),
        );
        assert_relative_eq!(pose.rotation.radians(), FRAC_PI_2, epsilon = 1e-9);
        // Translation follows the arc implied by the gyro rotation
        assert_relative_eq!(
            pose.translation.x,
            FRAC_PI_2.sin() / FRAC_PI_2,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            pose.translation.y,
            (1.0 - FRAC_PI_2.cos()) / FRAC_PI_2,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_initial_pose_and_gyro_offset() {
        // Start at a non-trivial pose with a gyro that reads 45 degrees
        let mut odometry = Odometry::new(
            DifferentialDriveKinematics::new(0.5),
            Rotation2d::from_degrees(45.0),
            DifferentialDriveWheelPositions::default(),
            Pose2d::from_xy(2.0, 3.0, Rotation2d::IDENTITY),
        );
        assert_relative_eq!(odometry.pose().translation.x, 2.0);

        // Gyro unchanged: the robot has not rotated on the field
        let pose = odometry.update(
            Rotation2d::from_degrees(45.0),
            &DifferentialDriveWheelPositions::new(0.5, 0.5),
        );
        assert_relative_eq!(pose.translation.x, 2.5, epsilon = 1e-9);
        assert_relative_eq!(pose.translation.y, 3.0, epsilon = 1e-9);
        assert_relative_eq!(pose.rotation.radians(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reset_position() {
        let mut odometry = differential_odometry();
        odometry.update(
            Rotation2d::IDENTITY,
            &DifferentialDriveWheelPositions::new(1.0, 1.0),
        );
        odometry.reset_position(
            Rotation2d::IDENTITY,
            DifferentialDriveWheelPositions::new(1.0, 1.0),
            Pose2d::IDENTITY,
        );
        assert_relative_eq!(odometry.pose().translation.x, 0.0);

        // No wheel movement after the reset keeps the pose put
        let pose = odometry.update(
            Rotation2d::IDENTITY,
            &DifferentialDriveWheelPositions::new(1.0, 1.0),
        );
        assert_relative_eq!(pose.translation.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reset_rotation_adjusts_offset_not_gyro() {
        let mut odometry = differential_odometry();
        odometry.reset_rotation(Rotation2d::from_degrees(90.0));
        assert_relative_eq!(odometry.pose().rotation.degrees(), 90.0, epsilon = 1e-9);

        // The gyro still reads zero; the offset carries the difference, and
        // driving forward now moves along field +y.
        let pose = odometry.update(
            Rotation2d::IDENTITY,
            &DifferentialDriveWheelPositions::new(1.0, 1.0),
        );
        assert_relative_eq!(pose.rotation.degrees(), 90.0, epsilon = 1e-9);
        assert_relative_eq!(pose.translation.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(pose.translation.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reset_translation_keeps_rotation() {
        let mut odometry = differential_odometry();
        odometry.reset_rotation(Rotation2d::from_degrees(30.0));
        odometry.reset_translation(Translation2d::new(5.0, -2.0));
        assert_relative_eq!(odometry.pose().translation.x, 5.0);
        assert_relative_eq!(odometry.pose().rotation.degrees(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reset_pose() {
        let mut odometry = differential_odometry();
        odometry.update(
            Rotation2d::IDENTITY,
            &DifferentialDriveWheelPositions::new(1.0, 2.0),
        );
        odometry.reset_pose(Pose2d::from_xy(10.0, 10.0, Rotation2d::from_degrees(180.0)));
        let pose = odometry.pose();
        assert_relative_eq!(pose.translation.x, 10.0);
        assert_relative_eq!(pose.rotation.degrees().abs(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mecanum_strafe_odometry() {
        let kinematics = MecanumDriveKinematics::new(
            Translation2d::new(0.3, 0.25),
            Translation2d::new(0.3, -0.25),
            Translation2d::new(-0.3, 0.25),
            Translation2d::new(-0.3, -0.25),
        );
        let mut odometry = Odometry::new(
            kinematics,
            Rotation2d::IDENTITY,
            MecanumDriveWheelPositions::default(),
            Pose2d::IDENTITY,
        );
        // Wheel pattern for a pure leftward strafe
        let pose = odometry.update(
            Rotation2d::IDENTITY,
            &MecanumDriveWheelPositions::new(-1.0, 1.0, 1.0, -1.0),
        );
        assert_relative_eq!(pose.translation.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(pose.translation.y, 1.0, epsilon = 1e-9);
    }
}
