//! Linear algebra primitives
//!
//! Vectors, matrices and quaternions are nalgebra types. The extension traits
//! below add the pieces the renderer relies on: homogeneous point/direction
//! constructors, bounds-checked component access, and normalization and
//! inversion that report failure instead of producing NaN.
use nalgebra::{Matrix4, Quaternion, Unit, UnitQuaternion, Vector3, Vector4};

use crate::error::{Error, Result};

/// Homogeneous 4-component vector. Points carry w = 1, directions w = 0.
pub type Vec4 = Vector4<f32>;
/// 4x4 matrix, indexed `(row, col)`. Transforms act on column vectors (`M * v`).
pub type Mat4 = Matrix4<f32>;
/// Rotation quaternion `(i, j, k, w)`, identity `(0, 0, 0, 1)`.
pub type Quat = Quaternion<f32>;

/// Extra operations on [`Vec4`].
pub trait Vec4Ext: Sized {
    /// A position, w = 1.
    fn point(x: f32, y: f32, z: f32) -> Self;
    /// A direction, w = 0.
    fn direction(x: f32, y: f32, z: f32) -> Self;

    fn up() -> Self {
        Self::direction(0.0, 1.0, 0.0)
    }

    fn down() -> Self {
        Self::direction(0.0, -1.0, 0.0)
    }

    fn left() -> Self {
        Self::direction(-1.0, 0.0, 0.0)
    }

    fn right() -> Self {
        Self::direction(1.0, 0.0, 0.0)
    }

    /// The camera looks down -z.
    fn forward() -> Self {
        Self::direction(0.0, 0.0, -1.0)
    }

    fn backward() -> Self {
        Self::direction(0.0, 0.0, 1.0)
    }

    /// Component by index, `0..=3` for x, y, z, w.
    fn component(&self, index: usize) -> Result<f32>;
    fn set_component(&mut self, index: usize, value: f32) -> Result<()>;

    /// Unit-length copy (over all four components). Fails on the zero vector.
    fn try_normalized(&self) -> Result<Self>;

    /// 3D cross product of the xyz parts, as a direction.
    fn cross3(&self, other: &Self) -> Self;
}

impl Vec4Ext for Vec4 {
    fn point(x: f32, y: f32, z: f32) -> Self {
        Vec4::new(x, y, z, 1.0)
    }

    fn direction(x: f32, y: f32, z: f32) -> Self {
        Vec4::new(x, y, z, 0.0)
    }

    fn component(&self, index: usize) -> Result<f32> {
        self.get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange { index, len: 4 })
    }

    fn set_component(&mut self, index: usize, value: f32) -> Result<()> {
        let slot = self
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len: 4 })?;
        *slot = value;
        Ok(())
    }

    fn try_normalized(&self) -> Result<Self> {
        self.try_normalize(0.0).ok_or(Error::ZeroLength)
    }

    fn cross3(&self, other: &Self) -> Self {
        let c = self.xyz().cross(&other.xyz());
        Vec4::direction(c.x, c.y, c.z)
    }
}

/// Extra operations on [`Mat4`].
pub trait Mat4Ext: Sized {
    /// Element at `(row, col)`, both in `0..=3`.
    fn at(&self, row: usize, col: usize) -> Result<f32>;

    /// Inverse, failing with [`Error::SingularMatrix`] when the determinant is zero.
    fn inverse(&self) -> Result<Self>;

    /// Row-vector product `v · M`.
    fn transform_row(&self, v: &Vec4) -> Vec4;
}

impl Mat4Ext for Mat4 {
    fn at(&self, row: usize, col: usize) -> Result<f32> {
        if row > 3 {
            return Err(Error::IndexOutOfRange { index: row, len: 4 });
        }
        if col > 3 {
            return Err(Error::IndexOutOfRange { index: col, len: 4 });
        }
        Ok(self[(row, col)])
    }

    fn inverse(&self) -> Result<Self> {
        if self.determinant() == 0.0 {
            return Err(Error::SingularMatrix);
        }
        self.try_inverse().ok_or(Error::SingularMatrix)
    }

    fn transform_row(&self, v: &Vec4) -> Vec4 {
        self.tr_mul(v)
    }
}

/// Extra operations on [`Quat`].
pub trait QuatExt: Sized {
    /// Rotation of `angle` radians around `axis`. The axis is normalized first.
    fn axis_angle(axis: &Vector3<f32>, angle: f32) -> Result<Self>;

    /// Rotation from Euler angles in radians: yaw about y, then pitch about x,
    /// then roll about z.
    fn euler(pitch: f32, yaw: f32, roll: f32) -> Self;

    /// Rotation matrix embedded in a 4x4 identity.
    fn rotation_matrix(&self) -> Mat4;
}

impl QuatExt for Quat {
    fn axis_angle(axis: &Vector3<f32>, angle: f32) -> Result<Self> {
        let axis = Unit::try_new(*axis, 0.0).ok_or(Error::ZeroLength)?;
        Ok(UnitQuaternion::from_axis_angle(&axis, angle).into_inner())
    }

    fn euler(pitch: f32, yaw: f32, roll: f32) -> Self {
        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw);
        let pitch = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch);
        let roll = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), roll);
        (yaw * pitch * roll).into_inner()
    }

    #[rustfmt::skip]
    fn rotation_matrix(&self) -> Mat4 {
        let (x, y, z, w) = (self.i, self.j, self.k, self.w);

        let x2 = x * x;
        let y2 = y * y;
        let z2 = z * z;
        let xy = x * y;
        let xz = x * z;
        let yz = y * z;
        let wx = w * x;
        let wy = w * y;
        let wz = w * z;

        Mat4::new(
            1.0 - 2.0 * (y2 + z2), 2.0 * (xy - wz), 2.0 * (xz + wy), 0.0,
            2.0 * (xy + wz), 1.0 - 2.0 * (x2 + z2), 2.0 * (yz - wx), 0.0,
            2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (x2 + y2), 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_point_and_direction() {
        assert_eq!(Vec4::point(1.0, 2.0, 3.0).w, 1.0);
        assert_eq!(Vec4::direction(1.0, 2.0, 3.0).w, 0.0);
        assert_eq!(Vec4::forward(), Vec4::new(0.0, 0.0, -1.0, 0.0));
        assert_eq!(Vec4::up() + Vec4::down(), Vec4::zeros());
    }

    #[test]
    fn test_component_bounds() {
        let mut v = Vec4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v.component(0), Ok(1.0));
        assert_eq!(v.component(3), Ok(4.0));
        assert_eq!(
            v.component(4),
            Err(Error::IndexOutOfRange { index: 4, len: 4 })
        );

        v.set_component(2, 9.0).unwrap();
        assert_eq!(v.z, 9.0);
        assert!(v.set_component(7, 0.0).is_err());
    }

    #[test]
    fn test_normalized_has_unit_length() {
        let samples = [
            Vec4::new(3.0, 4.0, 0.0, 0.0),
            Vec4::new(-1.0, 2.0, -3.0, 1.0),
            Vec4::new(1e-3, 0.0, 0.0, 0.0),
            Vec4::new(250.0, -75.5, 12.0, 1.0),
        ];
        for v in samples {
            let n = v.try_normalized().unwrap();
            assert!((n.norm() - 1.0).abs() < 1e-5, "{v:?} -> {n:?}");
        }
    }

    #[test]
    fn test_normalize_zero_fails() {
        assert_eq!(Vec4::zeros().try_normalized(), Err(Error::ZeroLength));
    }

    #[test]
    fn test_cross3() {
        let c = Vec4::right().cross3(&Vec4::up());
        assert_eq!(c, Vec4::direction(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_matrix_at() {
        let m = Mat4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(m.at(0, 3), Ok(1.0));
        assert_eq!(m.at(2, 3), Ok(3.0));
        assert!(m.at(4, 0).is_err());
        assert!(m.at(0, 4).is_err());
    }

    #[test]
    fn test_matrix_vector_product_is_column_convention() {
        let m = Mat4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(m * Vec4::point(0.0, 0.0, 0.0), Vec4::point(1.0, 2.0, 3.0));
        // directions ignore translation
        assert_eq!(m * Vec4::up(), Vec4::up());
    }

    #[test]
    fn test_transform_row() {
        let mut m = Mat4::zeros();
        m[(2, 3)] = 1.0;
        let out = m.transform_row(&Vec4::new(0.0, 0.0, 5.0, 1.0));
        assert_eq!(out.w, 5.0);
    }

    #[test]
    fn test_inverse() {
        let m = Mat4::new_translation(&Vector3::new(1.0, -2.0, 3.0));
        let inv = m.inverse().unwrap();
        assert!((m * inv - Mat4::identity()).norm() < 1e-6);

        assert_eq!(Mat4::zeros().inverse(), Err(Error::SingularMatrix));
    }

    #[test]
    fn test_identity_composition() {
        let q = Quat::axis_angle(&Vector3::new(1.0, 1.0, 0.0), 0.7).unwrap();
        let id = Quat::identity();
        assert!((id * q - q).norm() < 1e-6);
        assert!((q * id - q).norm() < 1e-6);
    }

    #[test]
    fn test_hamilton_product_is_not_commutative() {
        let a = Quat::axis_angle(&Vector3::x_axis(), FRAC_PI_2).unwrap();
        let b = Quat::axis_angle(&Vector3::y_axis(), FRAC_PI_2).unwrap();
        assert!((a * b - b * a).norm() > 1e-3);
    }

    #[test]
    fn test_axis_angle_zero_axis() {
        assert_eq!(
            Quat::axis_angle(&Vector3::zeros(), 1.0),
            Err(Error::ZeroLength)
        );
    }

    #[test]
    fn test_rotation_matrix_identity() {
        assert!((Quat::identity().rotation_matrix() - Mat4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_matrix_matches_nalgebra() {
        let q = Quat::axis_angle(&Vector3::new(0.3, -1.0, 0.5), 1.1).unwrap();
        let expected = UnitQuaternion::from_quaternion(q).to_homogeneous();
        assert!((q.rotation_matrix() - expected).norm() < 1e-5);
    }

    #[test]
    fn test_rotation_about_z() {
        let q = Quat::axis_angle(&Vector3::z_axis(), FRAC_PI_2).unwrap();
        let r = q.rotation_matrix() * Vec4::right();
        assert!((r - Vec4::up()).norm() < 1e-6);
    }

    #[test]
    fn test_euler_yaw_only() {
        let q = Quat::euler(0.0, FRAC_PI_2, 0.0);
        let r = q.rotation_matrix() * Vec4::forward();
        // yaw left: -z turns toward -x
        assert!((r - Vec4::left()).norm() < 1e-6);
    }
}
