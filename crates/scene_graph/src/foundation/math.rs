//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene graph, plus TRS
//! composition and decomposition helpers shared by local and world transforms.

pub use nalgebra::{
    Vector3,
    Matrix3, Matrix4,
    Quaternion, Rotation3,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Canonical object-space directions (Y-up, right-handed, -Z forward)
pub mod directions {
    use super::Vec3;

    /// Object-space forward direction (-Z)
    pub fn forward() -> Vec3 {
        Vec3::new(0.0, 0.0, -1.0)
    }

    /// Object-space up direction (+Y)
    pub fn up() -> Vec3 {
        Vec3::new(0.0, 1.0, 0.0)
    }

    /// Object-space right direction (+X)
    pub fn right() -> Vec3 {
        Vec3::new(1.0, 0.0, 0.0)
    }
}

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform from all three components
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Convert to a transformation matrix
    ///
    /// The order of operations is: Translation * Rotation * Scale (TRS)
    pub fn to_matrix(&self) -> Mat4 {
        translation_matrix(&self.position)
            * rotation_matrix(&self.rotation)
            * scale_matrix(&self.scale)
    }

    /// Decompose a transformation matrix into position, rotation and scale
    ///
    /// Scale is the length of each basis column. A basis with negative
    /// determinant is folded into a negative X scale so the remaining basis is
    /// a proper rotation. Zero-length columns produce non-finite components.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let position = Vec3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
        let basis: Mat3 = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let (scale, rotation) = decompose_basis(&basis);

        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Whether every component is finite and no scale axis is zero
    pub fn is_well_formed(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.rotation.coords.iter().all(|v| v.is_finite())
            && self.scale.iter().all(|v| v.is_finite() && *v != 0.0)
    }
}

/// Translation matrix for a position
pub fn translation_matrix(position: &Vec3) -> Mat4 {
    Mat4::new_translation(position)
}

/// Homogeneous rotation matrix for an orientation
pub fn rotation_matrix(orientation: &Quat) -> Mat4 {
    orientation.to_homogeneous()
}

/// 3x3 rotation matrix for an orientation
pub fn orientation_matrix(orientation: &Quat) -> Mat3 {
    orientation.to_rotation_matrix().into_inner()
}

/// Non-uniform scale matrix
pub fn scale_matrix(scale: &Vec3) -> Mat4 {
    Mat4::new_nonuniform_scaling(scale)
}

/// Split a 3x3 basis into per-axis scale and a unit rotation
pub fn decompose_basis(basis: &Mat3) -> (Vec3, Quat) {
    let x: Vec3 = basis.column(0).into_owned();
    let y: Vec3 = basis.column(1).into_owned();
    let z: Vec3 = basis.column(2).into_owned();

    let mut scale = Vec3::new(x.norm(), y.norm(), z.norm());
    if x.cross(&y).dot(&z) < 0.0 {
        scale.x = -scale.x;
    }

    let rotation = Mat3::from_columns(&[x / scale.x, y / scale.y, z / scale.z]);
    // Closed form conversion: an iterative fit would never converge on NaN input.
    let rotation = Quat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation));
    (scale, rotation)
}

/// Inverse-transpose of the 3x3 part of a transform
///
/// Returns a NaN matrix when the basis is singular.
pub fn normal_matrix(matrix: &Mat4) -> Mat3 {
    let basis: Mat3 = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    basis
        .try_inverse()
        .map_or_else(|| Mat3::from_element(f32::NAN), |inverse| inverse.transpose())
}

/// Object transform at `eye` whose -Z axis faces `target`
///
/// Returns `None` when `target` coincides with `eye` or `up` is parallel to
/// the viewing direction.
pub fn look_at_matrix(eye: &Vec3, target: &Vec3, up: &Vec3) -> Option<Mat4> {
    let to_target = target - eye;
    if to_target.norm_squared() <= f32::EPSILON {
        return None;
    }
    let forward = to_target.normalize();
    let right = forward.cross(up);
    if right.norm_squared() <= f32::EPSILON {
        return None;
    }
    let right = right.normalize();
    let object_up = right.cross(&forward);

    Some(Mat4::new(
        right.x, object_up.x, -forward.x, eye.x,
        right.y, object_up.y, -forward.y, eye.y,
        right.z, object_up.z, -forward.z, eye.z,
        0.0, 0.0, 0.0, 1.0,
    ))
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use constants::HALF_PI;

    #[test]
    fn test_trs_order() {
        let transform = Transform::new(
            Vec3::new(10.0, 0.0, 0.0),
            Quat::from_axis_angle(&Vec3::z_axis(), HALF_PI),
            Vec3::new(2.0, 1.0, 1.0),
        );

        // Scale first: (1,0,0) -> (2,0,0), rotate -> (0,2,0), translate -> (10,2,0)
        let point = transform.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point.coords, Vec3::new(10.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_matrix_roundtrip() {
        let original = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_axis_angle(&Unit::new_normalize(Vec3::new(1.0, 1.0, 1.0)), 0.5),
            Vec3::new(2.0, 1.5, 0.8),
        );

        let reconstructed = Transform::from_matrix(&original.to_matrix());

        assert_relative_eq!(reconstructed.position, original.position, epsilon = 1e-5);
        assert_relative_eq!(reconstructed.scale, original.scale, epsilon = 1e-5);

        // Quaternions might flip sign but represent same rotation
        let dot = original.rotation.coords.dot(&reconstructed.rotation.coords);
        assert!(dot.abs() > 0.999, "Quaternion rotation mismatch: dot product = {}", dot);
    }

    #[test]
    fn test_mirrored_basis_folds_into_negative_x_scale() {
        let mirrored = Transform::new(
            Vec3::zeros(),
            Quat::from_axis_angle(&Vec3::y_axis(), 0.3),
            Vec3::new(-2.0, 1.0, 1.0),
        );

        let decomposed = Transform::from_matrix(&mirrored.to_matrix());

        assert_relative_eq!(decomposed.scale, Vec3::new(-2.0, 1.0, 1.0), epsilon = 1e-5);
        assert_relative_eq!(decomposed.to_matrix(), mirrored.to_matrix(), epsilon = 1e-5);
        assert!(decomposed.is_well_formed());
    }

    #[test]
    fn test_zero_scale_is_not_well_formed() {
        let degenerate = Transform::from_matrix(&scale_matrix(&Vec3::new(0.0, 1.0, 1.0)));

        assert!(!degenerate.is_well_formed());
        assert!(decompose_basis(&Mat3::zeros()).0.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_normal_matrix_of_uniform_scale() {
        let matrix = scale_matrix(&Vec3::new(2.0, 2.0, 2.0));
        let normal = normal_matrix(&matrix);

        assert_relative_eq!(normal, Mat3::identity() * 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_normal_matrix_of_singular_basis_is_nan() {
        let normal = normal_matrix(&scale_matrix(&Vec3::new(0.0, 1.0, 1.0)));
        assert!(normal.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_look_at_faces_target() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let matrix = look_at_matrix(&eye, &Vec3::zeros(), &directions::up())
            .expect("well-conditioned look-at");
        let transform = Transform::from_matrix(&matrix);

        assert_relative_eq!(transform.position, eye, epsilon = 1e-6);
        assert_relative_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0), epsilon = 1e-5);
        let forward = transform.rotation * directions::forward();
        assert_relative_eq!(forward, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_look_at_rejects_degenerate_input() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        assert!(look_at_matrix(&eye, &eye, &directions::up()).is_none());
        assert!(look_at_matrix(&Vec3::zeros(), &Vec3::new(0.0, 4.0, 0.0), &directions::up()).is_none());
    }
}
