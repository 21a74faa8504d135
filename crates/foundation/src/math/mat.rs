use serde::{Deserialize, Serialize};

use super::Vec3;

/// 4x4 homogeneous matrix, column-major (`cols[col][row]`).
///
/// The layout matches what OpenGL/wgpu expect for uniform upload, so
/// `to_cols_array_f32` can be handed straight to a shader.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub cols: [[f64; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Builds a matrix whose first three columns are the given axes and whose
    /// fourth column is `translation`.
    pub fn from_basis(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3, translation: Vec3) -> Self {
        Self {
            cols: [
                [x_axis.x, x_axis.y, x_axis.z, 0.0],
                [y_axis.x, y_axis.y, y_axis.z, 0.0],
                [z_axis.x, z_axis.y, z_axis.z, 0.0],
                [translation.x, translation.y, translation.z, 1.0],
            ],
        }
    }

    pub fn x_axis(&self) -> Vec3 {
        column3(self.cols[0])
    }

    pub fn y_axis(&self) -> Vec3 {
        column3(self.cols[1])
    }

    pub fn z_axis(&self) -> Vec3 {
        column3(self.cols[2])
    }

    pub fn translation(&self) -> Vec3 {
        column3(self.cols[3])
    }

    pub fn transpose(&self) -> Self {
        let mut out = [[0.0f64; 4]; 4];
        for (col, column) in self.cols.iter().enumerate() {
            for (row, v) in column.iter().enumerate() {
                out[row][col] = *v;
            }
        }
        Self { cols: out }
    }

    pub fn mul(&self, other: &Self) -> Self {
        let a = &self.cols;
        let b = &other.cols;
        let mut c = [[0.0f64; 4]; 4];
        for col in 0..4 {
            for row in 0..4 {
                c[col][row] = a[0][row] * b[col][0]
                    + a[1][row] * b[col][1]
                    + a[2][row] * b[col][2]
                    + a[3][row] * b[col][3];
            }
        }
        Self { cols: c }
    }

    /// Applies the full affine transform (w = 1).
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.transform_vector(p) + self.translation()
    }

    /// Applies only the linear part (w = 0).
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.x_axis() * v.x + self.y_axis() * v.y + self.z_axis() * v.z
    }

    /// Inverse of a rotation + translation matrix.
    ///
    /// Only valid when the upper 3x3 block is orthonormal; no scale or shear.
    pub fn rigid_inverse(&self) -> Self {
        let (x, y, z) = (self.x_axis(), self.y_axis(), self.z_axis());
        let t = self.translation();
        let rt = Self::from_basis(
            Vec3::new(x.x, y.x, z.x),
            Vec3::new(x.y, y.y, z.y),
            Vec3::new(x.z, y.z, z.z),
            Vec3::ZERO,
        );
        let inv_t = -rt.transform_vector(t);
        Self::from_basis(rt.x_axis(), rt.y_axis(), rt.z_axis(), inv_t)
    }

    pub fn to_cols_array_f32(&self) -> [[f32; 4]; 4] {
        self.cols.map(|c| c.map(|v| v as f32))
    }
}

fn column3(c: [f64; 4]) -> Vec3 {
    Vec3::new(c[0], c[1], c[2])
}

#[cfg(test)]
mod tests {
    use super::Mat4;
    use crate::math::Vec3;

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        let diff = (a - b).length();
        assert!(diff <= eps, "expected {a:?} ~= {b:?} (diff {diff})");
    }

    #[test]
    fn identity_leaves_points_unchanged() {
        let p = Vec3::new(1.0, -2.0, 3.5);
        assert_eq!(Mat4::identity().transform_point(p), p);
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
    }

    #[test]
    fn from_basis_places_axes_in_columns() {
        let m = Mat4::from_basis(Vec3::Y, -Vec3::X, Vec3::Z, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(m.cols[0], [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(m.cols[3], [5.0, 0.0, 0.0, 1.0]);
        assert_eq!(m.transform_point(Vec3::X), Vec3::new(5.0, 1.0, 0.0));
        assert_eq!(m.transform_vector(Vec3::X), Vec3::Y);
    }

    #[test]
    fn rigid_inverse_undoes_transform() {
        // 90 degrees about Z plus a translation.
        let m = Mat4::from_basis(Vec3::Y, -Vec3::X, Vec3::Z, Vec3::new(2.0, -1.0, 4.0));
        let inv = m.rigid_inverse();
        let p = Vec3::new(0.25, 7.0, -3.0);
        assert_vec_close(inv.transform_point(m.transform_point(p)), p, 1e-12);

        let product = inv.mul(&m);
        for (col, column) in product.cols.iter().enumerate() {
            for (row, v) in column.iter().enumerate() {
                let expected = if col == row { 1.0 } else { 0.0 };
                assert!((v - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let m = Mat4::from_basis(Vec3::X, Vec3::Z, -Vec3::Y, Vec3::new(1.0, 2.0, 3.0));
        let t = m.transpose();
        assert_eq!(t.cols[3][0], m.cols[0][3]);
        assert_eq!(t.cols[0][3], 1.0);
        assert_eq!(t.transpose(), m);
    }
}
