//! Swerve drive kinematics for N independently steered modules.
//!
//! Inverse kinematics stacks one `[1, 0, −ry; 0, 1, rx]` block per module
//! (with `r` the module offset relative to the center of rotation) into a
//! (2N)×3 matrix. Forward kinematics multiplies by the Moore-Penrose
//! pseudoinverse of that matrix: with more than two modules the system is
//! overdetermined and the result is the least-squares chassis motion.
//!
//! The module count is a const generic, so handing a wrong-sized state array
//! to an N-module kinematics object is rejected at compile time.

mod module;

pub use module::{SwerveModuleAcceleration, SwerveModulePosition, SwerveModuleState};

use nalgebra::{DMatrix, DVector};

use super::{Kinematics, WheelPositions};
use crate::chassis::{ChassisAccelerations, ChassisSpeeds};
use crate::core::geometry::{Rotation2d, Translation2d, Twist2d};

/// Module drive speeds below this magnitude carry no usable direction; the
/// previously commanded steering angle is held instead.
const MODULE_SPEED_EPSILON: f64 = 1e-6;

/// Kinematics for a swerve drive with `N` modules.
///
/// Module offsets are measured in meters from the robot's geometric center.
/// The order used at construction is the order of every state/position array
/// this object produces or consumes.
///
/// The object is immutable except for two caches: the inverse-kinematics
/// matrices keyed by the last-used center of rotation, and the per-module
/// heading memory that backs the zero-speed heading hold. Do not share one
/// instance across threads.
#[derive(Debug, Clone)]
pub struct SwerveDriveKinematics<const N: usize> {
    modules: [Translation2d; N],
    module_headings: [Rotation2d; N],

    inverse_kinematics: DMatrix<f64>,
    forward_kinematics: DMatrix<f64>,
    second_order_inverse_kinematics: DMatrix<f64>,
    second_order_forward_kinematics: DMatrix<f64>,
    prev_cor: Translation2d,
}

impl<const N: usize> SwerveDriveKinematics<N> {
    /// Create kinematics from the module offsets.
    ///
    /// # Panics
    ///
    /// Panics if `N < 2`: a single module cannot constrain three degrees of
    /// freedom.
    pub fn new(modules: [Translation2d; N]) -> Self {
        assert!(N >= 2, "a swerve drive requires at least two modules");

        let mut kinematics = Self {
            modules,
            module_headings: [Rotation2d::IDENTITY; N],
            inverse_kinematics: DMatrix::zeros(2 * N, 3),
            forward_kinematics: DMatrix::zeros(3, 2 * N),
            second_order_inverse_kinematics: DMatrix::zeros(2 * N, 4),
            second_order_forward_kinematics: DMatrix::zeros(4, 2 * N),
            prev_cor: Translation2d::ZERO,
        };
        kinematics.set_inverse_kinematics(Translation2d::ZERO);
        kinematics.forward_kinematics = pseudo_inverse(&kinematics.inverse_kinematics);
        kinematics.second_order_forward_kinematics =
            pseudo_inverse(&kinematics.second_order_inverse_kinematics);
        kinematics
    }

    /// The module offsets this object was constructed with.
    #[inline]
    pub fn modules(&self) -> &[Translation2d; N] {
        &self.modules
    }

    /// Reseed the held per-module steering angles.
    ///
    /// Useful after manually steering modules (e.g. into an X-brake pattern)
    /// so the next zero-speed command holds those angles instead of the last
    /// ones this object computed.
    pub fn reset_headings(&mut self, module_headings: [Rotation2d; N]) {
        self.module_headings = module_headings;
    }

    /// Inverse kinematics about an arbitrary center of rotation.
    ///
    /// An exactly zero chassis velocity short-circuits the matrix solve: the
    /// velocity direction is degenerate there, so each module reports zero
    /// speed at its previously commanded angle rather than `atan2(0, 0)`
    /// artifacts that would twitch parked wheels.
    ///
    /// The matrices are rebuilt only when `center_of_rotation` differs from
    /// the previous call.
    pub fn to_module_states_about(
        &mut self,
        speeds: &ChassisSpeeds,
        center_of_rotation: Translation2d,
    ) -> [SwerveModuleState; N] {
        if speeds.vx == 0.0 && speeds.vy == 0.0 && speeds.omega == 0.0 {
            return std::array::from_fn(|i| SwerveModuleState::new(0.0, self.module_headings[i]));
        }

        if center_of_rotation != self.prev_cor {
            self.set_inverse_kinematics(center_of_rotation);
        }

        let chassis = DVector::from_column_slice(&[speeds.vx, speeds.vy, speeds.omega]);
        let module_vector = &self.inverse_kinematics * chassis;

        std::array::from_fn(|i| {
            let x = module_vector[2 * i];
            let y = module_vector[2 * i + 1];
            let speed = x.hypot(y);
            let angle = if speed > MODULE_SPEED_EPSILON {
                Rotation2d::from_components(x, y)
            } else {
                self.module_headings[i]
            };
            self.module_headings[i] = angle;
            SwerveModuleState::new(speed, angle)
        })
    }

    /// Inverse kinematics about the robot center; see
    /// [`to_module_states_about`](Self::to_module_states_about).
    #[inline]
    pub fn to_module_states(&mut self, speeds: &ChassisSpeeds) -> [SwerveModuleState; N] {
        self.to_module_states_about(speeds, Translation2d::ZERO)
    }

    /// Second-order inverse kinematics: module accelerations from a desired
    /// chassis acceleration and the current angular velocity.
    ///
    /// The chassis vector is `[ax, ay, ω², α]`; the ω² column produces the
    /// centripetal component each module needs while the chassis rotates.
    pub fn to_module_accelerations_about(
        &mut self,
        accelerations: &ChassisAccelerations,
        angular_velocity: f64,
        center_of_rotation: Translation2d,
    ) -> [SwerveModuleAcceleration; N] {
        if accelerations.ax == 0.0 && accelerations.ay == 0.0 && accelerations.alpha == 0.0 {
            return [SwerveModuleAcceleration::default(); N];
        }

        if center_of_rotation != self.prev_cor {
            self.set_inverse_kinematics(center_of_rotation);
        }

        let chassis = DVector::from_column_slice(&[
            accelerations.ax,
            accelerations.ay,
            angular_velocity * angular_velocity,
            accelerations.alpha,
        ]);
        let module_vector = &self.second_order_inverse_kinematics * chassis;

        std::array::from_fn(|i| {
            let x = module_vector[2 * i];
            let y = module_vector[2 * i + 1];
            let acceleration = x.hypot(y);
            let angle = if acceleration > MODULE_SPEED_EPSILON {
                Rotation2d::from_components(x, y)
            } else {
                Rotation2d::IDENTITY
            };
            SwerveModuleAcceleration::new(acceleration, angle)
        })
    }

    /// Second-order inverse kinematics about the robot center.
    #[inline]
    pub fn to_module_accelerations(
        &mut self,
        accelerations: &ChassisAccelerations,
        angular_velocity: f64,
    ) -> [SwerveModuleAcceleration; N] {
        self.to_module_accelerations_about(accelerations, angular_velocity, Translation2d::ZERO)
    }

    /// Second-order forward kinematics: least-squares chassis acceleration
    /// from measured module accelerations.
    pub fn to_chassis_accelerations(
        &self,
        module_accelerations: &[SwerveModuleAcceleration; N],
    ) -> ChassisAccelerations {
        let mut module_vector = DVector::zeros(2 * N);
        for (i, module) in module_accelerations.iter().enumerate() {
            module_vector[2 * i] = module.acceleration * module.angle.cos();
            module_vector[2 * i + 1] = module.acceleration * module.angle.sin();
        }

        // The second-order state vector is [ax, ay, ω², α]; ω² is discarded.
        let chassis = &self.second_order_forward_kinematics * module_vector;
        ChassisAccelerations::new(chassis[0], chassis[1], chassis[3])
    }

    /// Fill both inverse-kinematics matrices for a center of rotation.
    fn set_inverse_kinematics(&mut self, center_of_rotation: Translation2d) {
        for (i, module) in self.modules.iter().enumerate() {
            let rx = module.x - center_of_rotation.x;
            let ry = module.y - center_of_rotation.y;

            self.inverse_kinematics[(2 * i, 0)] = 1.0;
            self.inverse_kinematics[(2 * i, 1)] = 0.0;
            self.inverse_kinematics[(2 * i, 2)] = -ry;
            self.inverse_kinematics[(2 * i + 1, 0)] = 0.0;
            self.inverse_kinematics[(2 * i + 1, 1)] = 1.0;
            self.inverse_kinematics[(2 * i + 1, 2)] = rx;

            self.second_order_inverse_kinematics[(2 * i, 0)] = 1.0;
            self.second_order_inverse_kinematics[(2 * i, 1)] = 0.0;
            self.second_order_inverse_kinematics[(2 * i, 2)] = -rx;
            self.second_order_inverse_kinematics[(2 * i, 3)] = -ry;
            self.second_order_inverse_kinematics[(2 * i + 1, 0)] = 0.0;
            self.second_order_inverse_kinematics[(2 * i + 1, 1)] = 1.0;
            self.second_order_inverse_kinematics[(2 * i + 1, 2)] = -ry;
            self.second_order_inverse_kinematics[(2 * i + 1, 3)] = rx;
        }
        self.prev_cor = center_of_rotation;
    }
}

impl<const N: usize> Kinematics for SwerveDriveKinematics<N> {
    type WheelSpeeds = [SwerveModuleState; N];
    type WheelPositions = [SwerveModulePosition; N];

    fn to_wheel_speeds(&mut self, speeds: &ChassisSpeeds) -> [SwerveModuleState; N] {
        self.to_module_states(speeds)
    }

    fn to_chassis_speeds(&self, module_states: &[SwerveModuleState; N]) -> ChassisSpeeds {
        let mut module_vector = DVector::zeros(2 * N);
        for (i, module) in module_states.iter().enumerate() {
            module_vector[2 * i] = module.speed * module.angle.cos();
            module_vector[2 * i + 1] = module.speed * module.angle.sin();
        }

        let chassis = &self.forward_kinematics * module_vector;
        ChassisSpeeds::new(chassis[0], chassis[1], chassis[2])
    }

    fn to_twist2d(
        &self,
        start: &[SwerveModulePosition; N],
        end: &[SwerveModulePosition; N],
    ) -> Twist2d {
        let deltas = start.delta_to(end);
        let mut module_vector = DVector::zeros(2 * N);
        for (i, module) in deltas.iter().enumerate() {
            module_vector[2 * i] = module.distance * module.angle.cos();
            module_vector[2 * i + 1] = module.distance * module.angle.sin();
        }

        let chassis = &self.forward_kinematics * module_vector;
        Twist2d::new(chassis[0], chassis[1], chassis[2])
    }
}

impl<const N: usize> WheelPositions for [SwerveModulePosition; N] {
    /// Per-module distance delta; the delta carries the end angle, matching
    /// how a module's distance counter accumulates along its current heading.
    fn delta_to(&self, end: &Self) -> Self {
        std::array::from_fn(|i| {
            SwerveModulePosition::new(end[i].distance - self[i].distance, end[i].angle)
        })
    }

    fn interpolate(&self, end: &Self, t: f64) -> Self {
        std::array::from_fn(|i| self[i].interpolate(&end[i], t))
    }
}

/// Uniformly scale module speeds so none exceeds `attainable_max_speed`.
///
/// Inverse kinematics can request per-module speeds beyond what the drive
/// motor can deliver; scaling every module by the same factor keeps the
/// requested chassis direction while clamping the magnitude. Clamping modules
/// individually would distort the path instead. No-op when all speeds are
/// already attainable.
pub fn desaturate_wheel_speeds(module_states: &mut [SwerveModuleState], attainable_max_speed: f64) {
    let real_max = module_states
        .iter()
        .fold(0.0_f64, |acc, state| acc.max(state.speed.abs()));
    if real_max > attainable_max_speed {
        for state in module_states.iter_mut() {
            state.speed = state.speed / real_max * attainable_max_speed;
        }
    }
}

/// Desaturate jointly against the module ceiling and separate translational
/// and rotational chassis ceilings.
///
/// The scale factor is `min(1, k · max_module_speed / real_max)` where `k`
/// is the larger of the translational and rotational demand ratios of
/// `desired_chassis_speeds`. Zero ceilings and an all-zero state set are
/// no-ops rather than divisions by zero.
///
/// Note that scaling speeds that were produced from discretized chassis
/// speeds reintroduces a translational skew the discretization did not
/// account for.
pub fn desaturate_wheel_speeds_with_limits(
    module_states: &mut [SwerveModuleState],
    desired_chassis_speeds: &ChassisSpeeds,
    attainable_max_module_speed: f64,
    attainable_max_translational_speed: f64,
    attainable_max_rotational_speed: f64,
) {
    let real_max = module_states
        .iter()
        .fold(0.0_f64, |acc, state| acc.max(state.speed.abs()));

    if attainable_max_translational_speed == 0.0
        || attainable_max_rotational_speed == 0.0
        || real_max == 0.0
    {
        return;
    }

    let translational_k = desired_chassis_speeds.vx.hypot(desired_chassis_speeds.vy)
        / attainable_max_translational_speed;
    let rotational_k = desired_chassis_speeds.omega.abs() / attainable_max_rotational_speed;
    let k = translational_k.max(rotational_k);

    let scale = (k * attainable_max_module_speed / real_max).min(1.0);
    for state in module_states.iter_mut() {
        state.speed *= scale;
    }
}

/// SVD pseudoinverse of an inverse-kinematics matrix.
///
/// `pseudo_inverse` can only fail on a negative epsilon, which we never pass;
/// the fallback keeps the "singular geometry is not an error" contract by
/// degrading to a zero matrix instead of panicking.
fn pseudo_inverse(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    matrix.clone().pseudo_inverse(f64::EPSILON).unwrap_or_else(|_| {
        log::warn!("swerve pseudoinverse failed; forward kinematics disabled");
        DMatrix::zeros(matrix.ncols(), matrix.nrows())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::{SQRT_2, TAU};

    /// Square chassis with modules at the corners, fl/fr/rl/rr order.
    fn square_kinematics() -> SwerveDriveKinematics<4> {
        SwerveDriveKinematics::new([
            Translation2d::new(0.5, 0.5),
            Translation2d::new(0.5, -0.5),
            Translation2d::new(-0.5, 0.5),
            Translation2d::new(-0.5, -0.5),
        ])
    }

    #[test]
    #[should_panic(expected = "at least two modules")]
    fn test_single_module_rejected() {
        let _ = SwerveDriveKinematics::new([Translation2d::ZERO]);
    }

    #[test]
    fn test_straight_line_inverse() {
        let states = square_kinematics().to_module_states(&ChassisSpeeds::new(5.0, 0.0, 0.0));
        for state in &states {
            assert_relative_eq!(state.speed, 5.0, epsilon = 1e-9);
            assert_relative_eq!(state.angle.radians(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_strafe_inverse() {
        let states = square_kinematics().to_module_states(&ChassisSpeeds::new(0.0, 5.0, 0.0));
        for state in &states {
            assert_relative_eq!(state.speed, 5.0, epsilon = 1e-9);
            assert_relative_eq!(state.angle.degrees(), 90.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_turn_in_place_inverse() {
        let states = square_kinematics().to_module_states(&ChassisSpeeds::new(0.0, 0.0, TAU));
        // Each module traces a circle of radius √2/2 once per second
        let expected_speed = TAU * SQRT_2 / 2.0;
        for state in &states {
            assert_relative_eq!(state.speed, expected_speed, epsilon = 1e-9);
        }
        assert_relative_eq!(states[0].angle.degrees(), 135.0, epsilon = 1e-9);
        assert_relative_eq!(states[1].angle.degrees(), 45.0, epsilon = 1e-9);
        assert_relative_eq!(states[2].angle.degrees(), -135.0, epsilon = 1e-9);
        assert_relative_eq!(states[3].angle.degrees(), -45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_turn_in_place_forward() {
        let mut kin = square_kinematics();
        let states = kin.to_module_states(&ChassisSpeeds::new(0.0, 0.0, TAU));
        let chassis = kin.to_chassis_speeds(&states);
        assert_relative_eq!(chassis.vx, 0.0, epsilon = 1e-9);
        assert_relative_eq!(chassis.vy, 0.0, epsilon = 1e-9);
        assert_relative_eq!(chassis.omega, TAU, epsilon = 1e-9);
    }

    #[test]
    fn test_roundtrip() {
        let mut kin = square_kinematics();
        let original = ChassisSpeeds::new(1.3, -0.6, 2.2);
        let states = kin.to_module_states(&original);
        let roundtrip = kin.to_chassis_speeds(&states);
        assert_abs_diff_eq!(roundtrip, original, epsilon = 1e-9);
    }

    #[test]
    fn test_roundtrip_with_center_of_rotation() {
        let mut kin = square_kinematics();
        let original = ChassisSpeeds::new(0.0, 0.0, TAU);
        let states = kin.to_module_states_about(&original, Translation2d::new(0.5, 0.5));
        // Rotating about the front-left module parks it
        assert_relative_eq!(states[0].speed, 0.0, epsilon = 1e-9);
        // The other corner modules trace radius-1 or radius-√2 circles
        assert_relative_eq!(states[1].speed, TAU, epsilon = 1e-9);
        assert_relative_eq!(states[2].speed, TAU, epsilon = 1e-9);
        assert_relative_eq!(states[3].speed, TAU * SQRT_2, epsilon = 1e-9);
        // Forward kinematics still reports rotation about the robot center
        let chassis = kin.to_chassis_speeds(&states);
        assert_relative_eq!(chassis.omega, TAU, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_speed_holds_previous_headings() {
        let mut kin = square_kinematics();
        kin.to_module_states(&ChassisSpeeds::new(0.0, 0.0, TAU));
        let parked = kin.to_module_states(&ChassisSpeeds::default());
        assert_relative_eq!(parked[0].speed, 0.0);
        assert_relative_eq!(parked[0].angle.degrees(), 135.0, epsilon = 1e-9);
        assert_relative_eq!(parked[1].angle.degrees(), 45.0, epsilon = 1e-9);
        assert_relative_eq!(parked[2].angle.degrees(), -135.0, epsilon = 1e-9);
        assert_relative_eq!(parked[3].angle.degrees(), -45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reset_headings() {
        let mut kin = square_kinematics();
        kin.to_module_states(&ChassisSpeeds::new(0.0, 0.0, TAU));
        kin.reset_headings([Rotation2d::from_degrees(45.0); 4]);
        let parked = kin.to_module_states(&ChassisSpeeds::default());
        for state in &parked {
            assert_relative_eq!(state.speed, 0.0);
            assert_relative_eq!(state.angle.degrees(), 45.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_tiny_speed_holds_heading_per_module() {
        let mut kin = square_kinematics();
        kin.to_module_states(&ChassisSpeeds::new(1.0, 1.0, 0.0));
        // Below the 1e-6 module-speed epsilon the direction is noise
        let states = kin.to_module_states(&ChassisSpeeds::new(1e-9, 0.0, 0.0));
        for state in &states {
            assert_relative_eq!(state.angle.degrees(), 45.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cor_cache_not_stale() {
        let mut kin = square_kinematics();
        let speeds = ChassisSpeeds::new(0.0, 0.0, 1.0);
        let about_center = kin.to_module_states(&speeds);
        kin.to_module_states_about(&speeds, Translation2d::new(0.5, 0.5));
        let again = kin.to_module_states(&speeds);
        for (a, b) in about_center.iter().zip(again.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_twist_straight_line() {
        let kin = square_kinematics();
        let start = [SwerveModulePosition::default(); 4];
        let end = [SwerveModulePosition::new(5.0, Rotation2d::IDENTITY); 4];
        let twist = kin.to_twist2d(&start, &end);
        assert_abs_diff_eq!(twist, Twist2d::new(5.0, 0.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_twist_turn_in_place() {
        let kin = square_kinematics();
        let arc = TAU * SQRT_2 / 2.0;
        let start = [SwerveModulePosition::default(); 4];
        let end = [
            SwerveModulePosition::new(arc, Rotation2d::from_degrees(135.0)),
            SwerveModulePosition::new(arc, Rotation2d::from_degrees(45.0)),
            SwerveModulePosition::new(arc, Rotation2d::from_degrees(-135.0)),
            SwerveModulePosition::new(arc, Rotation2d::from_degrees(-45.0)),
        ];
        let twist = kin.to_twist2d(&start, &end);
        assert_relative_eq!(twist.dx, 0.0, epsilon = 1e-9);
        assert_relative_eq!(twist.dy, 0.0, epsilon = 1e-9);
        assert_relative_eq!(twist.dtheta, TAU, epsilon = 1e-9);
    }

    #[test]
    fn test_three_module_roundtrip() {
        let mut kin = SwerveDriveKinematics::new([
            Translation2d::new(0.4, 0.0),
            Translation2d::new(-0.2, 0.3),
            Translation2d::new(-0.2, -0.3),
        ]);
        let original = ChassisSpeeds::new(0.8, -1.1, 1.7);
        let states = kin.to_module_states(&original);
        let roundtrip = kin.to_chassis_speeds(&states);
        assert_abs_diff_eq!(roundtrip, original, epsilon = 1e-9);
    }

    #[test]
    fn test_desaturate() {
        let mut states = [
            SwerveModuleState::new(5.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(6.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(4.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(7.0, Rotation2d::IDENTITY),
        ];
        desaturate_wheel_speeds(&mut states, 5.5);
        let factor = 5.5 / 7.0;
        assert_relative_eq!(states[0].speed, 5.0 * factor, epsilon = 1e-9);
        assert_relative_eq!(states[1].speed, 6.0 * factor, epsilon = 1e-9);
        assert_relative_eq!(states[2].speed, 4.0 * factor, epsilon = 1e-9);
        assert_relative_eq!(states[3].speed, 7.0 * factor, epsilon = 1e-9);
    }

    #[test]
    fn test_desaturate_noop_within_limit() {
        let mut states = [
            SwerveModuleState::new(1.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(-2.0, Rotation2d::IDENTITY),
        ];
        desaturate_wheel_speeds(&mut states, 3.0);
        assert_relative_eq!(states[0].speed, 1.0);
        assert_relative_eq!(states[1].speed, -2.0);
    }

    #[test]
    fn test_desaturate_all_zero_is_safe() {
        let mut states = [SwerveModuleState::default(); 4];
        desaturate_wheel_speeds(&mut states, 0.0);
        for state in &states {
            assert!(state.speed == 0.0);
        }
    }

    #[test]
    fn test_desaturate_with_limits_zero_ceiling_is_noop() {
        let mut states = [
            SwerveModuleState::new(3.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(4.0, Rotation2d::IDENTITY),
        ];
        desaturate_wheel_speeds_with_limits(
            &mut states,
            &ChassisSpeeds::new(1.0, 0.0, 0.0),
            5.0,
            0.0,
            2.0,
        );
        assert_relative_eq!(states[0].speed, 3.0);
        assert_relative_eq!(states[1].speed, 4.0);
    }

    #[test]
    fn test_desaturate_with_limits_scales_by_demand_ratio() {
        let mut states = [
            SwerveModuleState::new(4.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(2.0, Rotation2d::IDENTITY),
        ];
        // Half the translational ceiling requested, no rotation:
        // k = 0.5, scale = min(1, 0.5 · 4 / 4) = 0.5
        desaturate_wheel_speeds_with_limits(
            &mut states,
            &ChassisSpeeds::new(2.0, 0.0, 0.0),
            4.0,
            4.0,
            3.0,
        );
        assert_relative_eq!(states[0].speed, 2.0, epsilon = 1e-9);
        assert_relative_eq!(states[1].speed, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_desaturate_with_limits_caps_at_one() {
        let mut states = [
            SwerveModuleState::new(1.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(0.5, Rotation2d::IDENTITY),
        ];
        desaturate_wheel_speeds_with_limits(
            &mut states,
            &ChassisSpeeds::new(10.0, 0.0, 0.0),
            10.0,
            1.0,
            1.0,
        );
        // k·max/real_max would be 100; the cap keeps speeds unchanged
        assert_relative_eq!(states[0].speed, 1.0);
        assert_relative_eq!(states[1].speed, 0.5);
    }

    #[test]
    fn test_second_order_straight_line() {
        let mut kin = square_kinematics();
        let accels =
            kin.to_module_accelerations(&ChassisAccelerations::new(2.0, 0.0, 0.0), 0.0);
        for module in &accels {
            assert_relative_eq!(module.acceleration, 2.0, epsilon = 1e-9);
            assert_relative_eq!(module.angle.radians(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_second_order_angular_acceleration() {
        let mut kin = square_kinematics();
        let alpha = TAU;
        let accels =
            kin.to_module_accelerations(&ChassisAccelerations::new(0.0, 0.0, alpha), 0.0);
        // Tangential acceleration α·r at each corner module
        let expected = alpha * SQRT_2 / 2.0;
        for module in &accels {
            assert_relative_eq!(module.acceleration, expected, epsilon = 1e-9);
        }
        assert_relative_eq!(accels[0].angle.degrees(), 135.0, epsilon = 1e-9);
        assert_relative_eq!(accels[1].angle.degrees(), 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_second_order_roundtrip() {
        let mut kin = square_kinematics();
        let original = ChassisAccelerations::new(1.5, -0.8, 2.0);
        let accels = kin.to_module_accelerations(&original, 0.0);
        let roundtrip = kin.to_chassis_accelerations(&accels);
        assert_abs_diff_eq!(roundtrip, original, epsilon = 1e-9);
    }

    #[test]
    fn test_second_order_zero_command() {
        let mut kin = square_kinematics();
        let accels =
            kin.to_module_accelerations(&ChassisAccelerations::default(), 3.0);
        for module in &accels {
            assert_relative_eq!(module.acceleration, 0.0);
        }
    }

    #[test]
    fn test_positions_delta_and_interpolate() {
        let start = [
            SwerveModulePosition::new(1.0, Rotation2d::IDENTITY),
            SwerveModulePosition::new(2.0, Rotation2d::from_degrees(90.0)),
        ];
        let end = [
            SwerveModulePosition::new(2.0, Rotation2d::from_degrees(10.0)),
            SwerveModulePosition::new(4.0, Rotation2d::from_degrees(90.0)),
        ];
        let delta = start.delta_to(&end);
        assert_relative_eq!(delta[0].distance, 1.0);
        assert_relative_eq!(delta[0].angle.degrees(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(delta[1].distance, 2.0);

        let mid = start.interpolate(&end, 0.5);
        assert_relative_eq!(mid[0].distance, 1.5);
        assert_relative_eq!(mid[1].distance, 3.0);
    }
}
