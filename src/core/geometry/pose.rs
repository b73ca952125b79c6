//! Pose types on SE(2) and SE(3) with exact exponential and logarithm maps.
//!
//! `exp` integrates a twist along a constant-curvature arc instead of
//! chording it, and `log` is its exact inverse. Odometry composes one of
//! these per control cycle, so any linearization error here would compound
//! over thousands of cycles; the arc correction keeps the integration exact
//! for constant twists.

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::{Rotation2d, Rotation3d, Translation2d, Translation3d, Twist2d, Twist3d};

/// A robot placement in the plane: translation plus heading.
///
/// The rotation component is normalized by construction ([`Rotation2d`]
/// cannot hold a non-unit value).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2d {
    /// Position on the field in meters
    pub translation: Translation2d,
    /// Heading of the robot
    pub rotation: Rotation2d,
}

impl Pose2d {
    /// The identity pose at the origin.
    pub const IDENTITY: Self = Self {
        translation: Translation2d::ZERO,
        rotation: Rotation2d::IDENTITY,
    };

    /// Create a new pose.
    #[inline]
    pub const fn new(translation: Translation2d, rotation: Rotation2d) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Create from x, y coordinates and a heading.
    #[inline]
    pub const fn from_xy(x: f64, y: f64, rotation: Rotation2d) -> Self {
        Self::new(Translation2d::new(x, y), rotation)
    }

    /// Compose: apply `other` in this pose's frame.
    ///
    /// ```text
    /// C = A ∘ B:
    ///   C.translation = A.translation + B.translation rotated by A.rotation
    ///   C.rotation    = A.rotation · B.rotation
    /// ```
    #[inline]
    pub fn compose(&self, other: &Pose2d) -> Pose2d {
        Pose2d::new(
            self.translation + other.translation.rotate_by(&self.rotation),
            self.rotation + other.rotation,
        )
    }

    /// The pose that undoes this one: `pose.compose(&pose.inverse())` is the
    /// identity.
    #[inline]
    pub fn inverse(&self) -> Pose2d {
        let inv_rotation = -self.rotation;
        Pose2d::new(
            (-self.translation).rotate_by(&inv_rotation),
            inv_rotation,
        )
    }

    /// This pose expressed in `other`'s frame.
    #[inline]
    pub fn relative_to(&self, other: &Pose2d) -> Pose2d {
        other.inverse().compose(self)
    }

    /// Integrate a twist exactly along its constant-curvature arc.
    ///
    /// When `dtheta` is near zero the motion is a straight line; otherwise
    /// the translation is corrected by `sin(dθ)/dθ` and `(1 − cos dθ)/dθ`
    /// so the arc is followed rather than chorded.
    pub fn exp(&self, twist: &Twist2d) -> Pose2d {
        let dtheta = twist.dtheta;
        let sin_theta = dtheta.sin();
        let cos_theta = dtheta.cos();

        let (s, c) = if dtheta.abs() < 1e-9 {
            // Taylor series around dθ = 0
            (1.0 - dtheta * dtheta / 6.0, 0.5 * dtheta)
        } else {
            (sin_theta / dtheta, (1.0 - cos_theta) / dtheta)
        };

        let delta = Pose2d::new(
            Translation2d::new(
                twist.dx * s - twist.dy * c,
                twist.dx * c + twist.dy * s,
            ),
            Rotation2d::from_components(cos_theta, sin_theta),
        );

        self.compose(&delta)
    }

    /// The twist that maps this pose onto `end` through [`Pose2d::exp`];
    /// the exact inverse of the exponential map.
    pub fn log(&self, end: &Pose2d) -> Twist2d {
        let transform = end.relative_to(self);
        let dtheta = transform.rotation.radians();
        let half_dtheta = dtheta / 2.0;

        let cos_minus_one = transform.rotation.cos() - 1.0;
        let half_theta_by_tan_of_half_dtheta = if cos_minus_one.abs() < 1e-9 {
            // Taylor series around dθ = 0
            1.0 - dtheta * dtheta / 12.0
        } else {
            -(half_dtheta * transform.rotation.sin()) / cos_minus_one
        };

        let translation_part = transform
            .translation
            .rotate_by(&Rotation2d::from_components(
                half_theta_by_tan_of_half_dtheta,
                -half_dtheta,
            ))
            * half_theta_by_tan_of_half_dtheta.hypot(half_dtheta);

        Twist2d::new(translation_part.x, translation_part.y, dtheta)
    }
}

impl AbsDiffEq for Pose2d {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.translation.abs_diff_eq(&other.translation, epsilon)
            && self.rotation.abs_diff_eq(&other.rotation, epsilon)
    }
}

impl RelativeEq for Pose2d {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.translation
            .relative_eq(&other.translation, epsilon, max_relative)
            && self
                .rotation
                .relative_eq(&other.rotation, epsilon, max_relative)
    }
}

/// A robot placement in 3D space: translation plus orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose3d {
    /// Position in meters
    pub translation: Translation3d,
    /// Orientation of the robot
    pub rotation: Rotation3d,
}

impl Pose3d {
    /// Create a new pose.
    #[inline]
    pub fn new(translation: Translation3d, rotation: Rotation3d) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// The identity pose at the origin.
    #[inline]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Compose: apply `other` in this pose's frame.
    ///
    /// The rotation order matters in 3D: `other`'s rotation happens in this
    /// pose's body frame, so it is the one being rotated by `self.rotation`.
    #[inline]
    pub fn compose(&self, other: &Pose3d) -> Pose3d {
        Pose3d::new(
            self.translation + other.translation.rotate_by(&self.rotation),
            other.rotation + self.rotation,
        )
    }

    /// The pose that undoes this one.
    #[inline]
    pub fn inverse(&self) -> Pose3d {
        let inv_rotation = -self.rotation;
        Pose3d::new(
            (-self.translation).rotate_by(&inv_rotation),
            inv_rotation,
        )
    }

    /// This pose expressed in `other`'s frame.
    #[inline]
    pub fn relative_to(&self, other: &Pose3d) -> Pose3d {
        other.inverse().compose(self)
    }

    /// Project to the planar pose (x, y, yaw).
    #[inline]
    pub fn to_pose2d(&self) -> Pose2d {
        Pose2d::new(
            self.translation.to_translation2d(),
            self.rotation.to_rotation2d(),
        )
    }

    /// Integrate a twist exactly through the SE(3) exponential map.
    ///
    /// The translation is mapped through `V = I + B·Ω + C·Ω²` where `Ω` is
    /// the skew matrix of the rotation vector, with Taylor fallbacks for the
    /// coefficients below a 1e-7 rotation magnitude.
    pub fn exp(&self, twist: &Twist3d) -> Pose3d {
        let u = Vector3::new(twist.dx, twist.dy, twist.dz);
        let rvec = Vector3::new(twist.rx, twist.ry, twist.rz);
        let omega = skew(rvec);
        let omega_sq = omega * omega;
        let theta = rvec.norm();
        let theta_sq = theta * theta;

        // B = (1 − cos θ)/θ², C = (θ − sin θ)/θ³ expressed as (1 − A)/θ²
        let (b, c) = if theta < 1e-7 {
            (
                0.5 - theta_sq / 24.0 + theta_sq * theta_sq / 720.0,
                1.0 / 6.0 - theta_sq / 120.0 + theta_sq * theta_sq / 5040.0,
            )
        } else {
            let a = theta.sin() / theta;
            ((1.0 - theta.cos()) / theta_sq, (1.0 - a) / theta_sq)
        };

        let v = Matrix3::identity() + omega * b + omega_sq * c;
        let translation_component = v * u;

        let delta = Pose3d::new(
            Translation3d::new(
                translation_component.x,
                translation_component.y,
                translation_component.z,
            ),
            Rotation3d::from_rotation_vector(rvec),
        );

        self.compose(&delta)
    }

    /// The twist that maps this pose onto `end` through [`Pose3d::exp`].
    pub fn log(&self, end: &Pose3d) -> Twist3d {
        let transform = end.relative_to(self);
        let rvec = transform.rotation.to_rotation_vector();
        let omega = skew(rvec);
        let theta = rvec.norm();
        let theta_sq = theta * theta;

        let c = if theta < 1e-7 {
            1.0 / 12.0 + theta_sq / 720.0 + theta_sq * theta_sq / 30240.0
        } else {
            let a = theta.sin() / theta;
            let b = (1.0 - theta.cos()) / theta_sq;
            (1.0 - a / (2.0 * b)) / theta_sq
        };

        let v_inv = Matrix3::identity() - omega * 0.5 + omega * omega * c;
        let translation_component = v_inv
            * Vector3::new(
                transform.translation.x,
                transform.translation.y,
                transform.translation.z,
            );

        Twist3d::new(
            translation_component.x,
            translation_component.y,
            translation_component.z,
            rvec.x,
            rvec.y,
            rvec.z,
        )
    }
}

impl From<Pose2d> for Pose3d {
    #[inline]
    fn from(pose: Pose2d) -> Self {
        Self::new(pose.translation.into(), pose.rotation.into())
    }
}

impl AbsDiffEq for Pose3d {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.translation.abs_diff_eq(&other.translation, epsilon)
            && self.rotation.abs_diff_eq(&other.rotation, epsilon)
    }
}

impl RelativeEq for Pose3d {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.translation
            .relative_eq(&other.translation, epsilon, max_relative)
            && self
                .rotation
                .relative_eq(&other.rotation, epsilon, max_relative)
    }
}

/// Skew-symmetric (cross-product) matrix of a vector.
#[inline]
fn skew(v: Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}
