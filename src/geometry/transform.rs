use egui::{Pos2, Vec2};

/// Row-major 3x3 affine matrix acting on column vectors `[x, y, 1]`.
///
/// Angles are in degrees, positive clockwise on screen (y points down), which
/// is the convention the stored object angle uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix(pub [[f32; 3]; 3]);

impl Matrix {
    pub const IDENTITY: Matrix = Matrix([
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ]);

    pub fn translation(delta: Vec2) -> Self {
        Matrix([
            [1.0, 0.0, delta.x],
            [0.0, 1.0, delta.y],
            [0.0, 0.0, 1.0],
        ])
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Matrix([
            [sx, 0.0, 0.0],
            [0.0, sy, 0.0],
            [0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_degrees(angle: f32) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Matrix([
            [cos, -sin, 0.0],
            [sin, cos, 0.0],
            [0.0, 0.0, 1.0],
        ])
    }

    /// `self * other`: applies `other` first, then `self`
    pub fn then_after(&self, other: &Matrix) -> Matrix {
        Matrix(multiply_matrices(&self.0, &other.0))
    }

    pub fn transform_point(&self, p: Pos2) -> Pos2 {
        let m = &self.0;
        Pos2::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2],
        )
    }

    /// Applies only the linear part (no translation)
    pub fn transform_vector(&self, v: Vec2) -> Vec2 {
        let m = &self.0;
        Vec2::new(m[0][0] * v.x + m[0][1] * v.y, m[1][0] * v.x + m[1][1] * v.y)
    }

    /// Inverse of the affine matrix, or `None` when it is singular
    /// (for instance an object scaled to zero on one axis).
    pub fn inverse(&self) -> Option<Matrix> {
        let m = &self.0;
        let (a, b, tx) = (m[0][0], m[0][1], m[0][2]);
        let (c, d, ty) = (m[1][0], m[1][1], m[1][2]);
        let det = a * d - b * c;
        if det.abs() < f32::EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let ia = d * inv_det;
        let ib = -b * inv_det;
        let ic = -c * inv_det;
        let id = a * inv_det;
        Some(Matrix([
            [ia, ib, -(ia * tx + ib * ty)],
            [ic, id, -(ic * tx + id * ty)],
            [0.0, 0.0, 1.0],
        ]))
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn multiply_matrices(a: &[[f32; 3]; 3], b: &[[f32; 3]; 3]) -> [[f32; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Rotate a vector clockwise (screen space) by `angle` degrees
pub fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    Matrix::rotation_degrees(angle).transform_vector(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: Pos2, b: Pos2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn test_rotation_is_clockwise_on_screen() {
        let p = Matrix::rotation_degrees(90.0).transform_point(Pos2::new(1.0, 0.0));
        assert!(close(p, Pos2::new(0.0, 1.0)));
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = Matrix::translation(Vec2::new(40.0, -12.0))
            .then_after(&Matrix::rotation_degrees(33.0))
            .then_after(&Matrix::scale(0.5, 2.0));
        let inv = m.inverse().unwrap();
        let p = Pos2::new(7.0, 3.5);
        assert!(close(inv.transform_point(m.transform_point(p)), p));
    }

    #[test]
    fn test_singular_matrix_has_no_inverse() {
        assert!(Matrix::scale(0.0, 1.0).inverse().is_none());
    }
}
