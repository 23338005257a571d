//! Column-major 4x4 matrix for camera and model transforms.
//!
//! Storage follows the OpenGL convention: sixteen scalars laid out column
//! after column, so [`Mat4::to_cols_array`] can be handed straight to a
//! uniform upload. Element access is always `(col, row)`.

use std::fmt;
use std::ops::{Mul, Sub};

use crate::{Quat, Vec4};

/// Pivots whose magnitude falls below this are treated as singular by
/// [`Mat4::invert`].
pub const SINGULAR_PIVOT_EPSILON: f32 = 1e-6;

/// 4x4 matrix stored column-major as a flat `[f32; 16]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4 {
    m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub const fn identity() -> Self {
        Self::from_cols_array([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub const fn zero() -> Self {
        Self::from_cols_array([0.0; 16])
    }

    /// Build from sixteen scalars in column-major order.
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Build from four column vectors.
    pub fn from_cols(cols: [Vec4; 4]) -> Self {
        let mut m = [0.0; 16];
        for (col, v) in cols.iter().enumerate() {
            m[col * 4..col * 4 + 4].copy_from_slice(&v.to_array());
        }
        Self { m }
    }

    pub const fn to_cols_array(&self) -> [f32; 16] {
        self.m
    }

    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        [0, 1, 2, 3].map(|col| self.col(col).to_array())
    }

    pub fn cols(&self) -> [Vec4; 4] {
        [0, 1, 2, 3].map(|col| self.col(col))
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> f32 {
        self.m[col * 4 + row]
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, value: f32) {
        self.m[col * 4 + row] = value;
    }

    pub fn col(&self, i: usize) -> Vec4 {
        Vec4::new(
            self.get(i, 0),
            self.get(i, 1),
            self.get(i, 2),
            self.get(i, 3),
        )
    }

    pub fn row(&self, i: usize) -> Vec4 {
        Vec4::new(
            self.get(0, i),
            self.get(1, i),
            self.get(2, i),
            self.get(3, i),
        )
    }

    /// Rotation matrix equivalent to a unit quaternion.
    ///
    /// The quaternion is not normalized; a non-unit input yields a scaled,
    /// skewed matrix. Translation and projection terms are those of the
    /// identity.
    pub fn from_quat(q: Quat) -> Self {
        let xx = 2.0 * q.x * q.x;
        let xy = 2.0 * q.x * q.y;
        let xz = 2.0 * q.x * q.z;
        let xw = 2.0 * q.x * q.w;
        let yy = 2.0 * q.y * q.y;
        let yz = 2.0 * q.y * q.z;
        let yw = 2.0 * q.y * q.w;
        let zz = 2.0 * q.z * q.z;
        let zw = 2.0 * q.z * q.w;

        Self::from_cols_array([
            1.0 - yy - zz,
            xy + zw,
            xz - yw,
            0.0,
            //
            xy - zw,
            1.0 - xx - zz,
            yz + xw,
            0.0,
            //
            xz + yw,
            yz - xw,
            1.0 - xx - yy,
            0.0,
            //
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Perspective projection with an infinite far plane.
    ///
    /// `fov_x` is in radians and `aspect` is width / height. The vertical
    /// angle is taken as `fov_x / aspect`, and the frustum half-extent at the
    /// near plane as `near * tan(angle)`. Points on the near plane map to
    /// NDC depth -1.
    pub fn projection(near: f32, fov_x: f32, aspect: f32) -> Self {
        let fov_y = fov_x / aspect;
        let max_x = near * fov_x.tan();
        let max_y = near * fov_y.tan();
        let min_x = -max_x;
        let min_y = -max_y;

        let mut result = Self::zero();
        result.set(0, 0, 2.0 * near / (max_x - min_x));
        result.set(2, 0, (max_x + min_x) / (max_x - min_x));
        result.set(1, 1, 2.0 * near / (max_y - min_y));
        result.set(2, 1, (max_y + min_y) / (max_y - min_y));
        result.set(2, 2, -1.0);
        result.set(3, 2, -2.0 * near);
        result.set(2, 3, -1.0);
        result
    }

    /// Identity with the translation column set to `(x, y, z)`.
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut result = Self::identity();
        result.set(3, 0, x);
        result.set(3, 1, y);
        result.set(3, 2, z);
        result
    }

    /// Pre-multiply in place by a translation, i.e. `self = T(x, y, z) * self`.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        for col in 0..4 {
            let w = self.get(col, 3);
            self.m[col * 4] += w * x;
            self.m[col * 4 + 1] += w * y;
            self.m[col * 4 + 2] += w * z;
        }
        self
    }

    /// Inverse by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Elimination runs on columns. Each step swaps the candidate with the
    /// largest magnitude into the pivot position; if the pivot is still
    /// within [`SINGULAR_PIVOT_EPSILON`] of zero the result is
    /// [`Mat4::zero`]. Callers rely on that fallback instead of checking
    /// the determinant.
    pub fn invert(&self) -> Mat4 {
        let mut src = self.cols();
        let mut result = Self::identity().cols();

        for i in 0..4 {
            let mut max = src[i][i].abs();
            let mut max_idx = i;
            for (j, col) in src.iter().enumerate().skip(i + 1) {
                if col[i].abs() > max {
                    max = col[i].abs();
                    max_idx = j;
                }
            }

            if max_idx != i {
                src.swap(i, max_idx);
                result.swap(i, max_idx);
            }

            let pivot = src[i][i];
            if pivot > -SINGULAR_PIVOT_EPSILON && pivot < SINGULAR_PIVOT_EPSILON {
                return Self::zero();
            }

            let scale = 1.0 / pivot;
            src[i] *= scale;
            result[i] *= scale;

            for k in 1..4 {
                let j = (i + k) & 3;
                let scale = -src[j][i];
                let (src_delta, result_delta) = (src[i] * scale, result[i] * scale);
                src[j] += src_delta;
                result[j] += result_delta;
            }
        }

        Self::from_cols(result)
    }

    /// `(Σ m_ij^order)^(1/order)` over all sixteen entries.
    ///
    /// Entries are raised to `order` as-is, without taking the absolute
    /// value first, so negative entries with a fractional order give NaN.
    pub fn norm(&self, order: f32) -> f32 {
        let sum: f32 = self.m.iter().map(|v| v.powf(order)).sum();
        sum.powf(1.0 / order)
    }

    /// True if every entry differs from `other` by at most `max_abs_diff`.
    pub fn abs_diff_eq(&self, other: &Mat4, max_abs_diff: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() <= max_abs_diff)
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    /// `(a * b) * v == a * (b * v)`: the right operand applies first.
    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut result = Mat4::zero();
        for row in 0..4 {
            let r = self.row(row);
            for col in 0..4 {
                result.set(col, row, r.dot(rhs.col(col)));
            }
        }
        result
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Vec4 {
        let mut out = Vec4::zero();
        for row in 0..4 {
            out[row] = v.x * self.get(0, row)
                + v.y * self.get(1, row)
                + v.z * self.get(2, row)
                + v.w * self.get(3, row);
        }
        out
    }
}

impl Sub for Mat4 {
    type Output = Mat4;

    fn sub(self, rhs: Mat4) -> Mat4 {
        let mut m = self.m;
        for (a, b) in m.iter_mut().zip(rhs.m.iter()) {
            *a -= b;
        }
        Mat4 { m }
    }
}

impl fmt::Display for Mat4 {
    /// One line per column, each entry right-aligned to the widest entry in
    /// its row position.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strings: Vec<String> = self.m.iter().map(|v| v.to_string()).collect();
        let mut widths = [0usize; 4];
        for (i, s) in strings.iter().enumerate() {
            widths[i % 4] = widths[i % 4].max(s.len());
        }

        for col in 0..4 {
            write!(f, "[")?;
            for row in 0..4 {
                write!(f, "{:>width$}", strings[col * 4 + row], width = widths[row] + 1)?;
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}

impl From<glam::Mat4> for Mat4 {
    fn from(m: glam::Mat4) -> Self {
        Mat4::from_cols_array(m.to_cols_array())
    }
}

impl From<Mat4> for glam::Mat4 {
    fn from(m: Mat4) -> Self {
        glam::Mat4::from_cols_array(&m.to_cols_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPSILON: f32 = 1e-4;

    fn sample_matrices() -> Vec<Mat4> {
        let mut translated = Mat4::from_quat(Vec4::rotation(0.0, 0.6, 0.8, 0.9));
        translated.translate(1.0, -2.0, 3.5);
        vec![
            Mat4::translation(1.0, 2.0, 3.0),
            Mat4::from_quat(Vec4::rotation(1.0, 0.0, 0.0, 0.3)),
            translated,
            Mat4::projection(0.1, FRAC_PI_4, 16.0 / 9.0),
            Mat4::from_cols_array([
                2.0, 0.5, -1.0, 0.0, //
                0.0, 3.0, 0.25, 1.0, //
                1.0, -2.0, 4.0, 0.5, //
                0.0, 1.0, 0.0, 2.0,
            ]),
            // Zero on the leading diagonal forces a pivot swap.
            Mat4::from_cols_array([
                0.0, 1.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 2.0, //
                0.0, 0.0, 3.0, 0.0,
            ]),
        ]
    }

    #[test]
    fn test_identity_is_neutral() {
        for m in sample_matrices() {
            assert_eq!(Mat4::identity() * m, m);
            assert_eq!(m * Mat4::identity(), m);
        }
    }

    #[test]
    fn test_default_is_identity() {
        assert_eq!(Mat4::default(), Mat4::identity());
    }

    #[test]
    fn test_col_row_access() {
        let m = Mat4::from_cols_array(std::array::from_fn(|i| i as f32));
        assert_eq!(m.col(1), Vec4::new(4.0, 5.0, 6.0, 7.0));
        assert_eq!(m.row(1), Vec4::new(1.0, 5.0, 9.0, 13.0));
        assert_eq!(m.get(3, 2), 14.0);
        assert_eq!(Mat4::from_cols(m.cols()), m);
        assert_eq!(m.to_cols_array_2d()[2], [8.0, 9.0, 10.0, 11.0]);
    }

    #[test]
    fn test_translation_moves_points_not_directions() {
        let t = Mat4::translation(1.0, 2.0, 3.0);
        assert_eq!(t * Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(t * Vec4::new(1.0, 0.0, 0.0, 0.0), Vec4::new(1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_translate_in_place_premultiplies() {
        let base = Mat4::from_quat(Vec4::rotation(0.0, 1.0, 0.0, 0.5));
        let mut m = base;
        m.translate(4.0, -1.0, 2.0);
        let expected = Mat4::translation(4.0, -1.0, 2.0) * base;
        assert!(m.abs_diff_eq(&expected, 1e-6));
    }

    #[test]
    fn test_mul_matches_glam() {
        let samples = sample_matrices();
        for a in &samples {
            for b in &samples {
                let ours = *a * *b;
                let theirs: Mat4 = (glam::Mat4::from(*a) * glam::Mat4::from(*b)).into();
                assert!(ours.abs_diff_eq(&theirs, EPSILON));
            }
        }
    }

    #[test]
    fn test_mul_is_associative_with_vectors() {
        let a = Mat4::from_quat(Vec4::rotation(0.0, 0.0, 1.0, 0.7));
        let b = Mat4::translation(3.0, -1.0, 0.5);
        let v = Vec4::new(1.0, 2.0, 3.0, 1.0);
        let lhs = (a * b) * v;
        let rhs = a * (b * v);
        assert!((lhs - rhs).magnitude() < EPSILON);
    }

    #[test]
    fn test_mul_is_not_commutative() {
        let rotation = Mat4::from_quat(Vec4::rotation(0.0, 0.0, 1.0, FRAC_PI_2));
        let translation = Mat4::translation(1.0, 2.0, 0.0);
        assert_ne!(rotation * translation, translation * rotation);
    }

    #[test]
    fn test_from_quat_half_turn_about_x_negates_y() {
        let m = Mat4::from_quat(Vec4::rotation(1.0, 0.0, 0.0, PI));
        let v = m * Vec4::new(0.0, 1.0, 0.0, 0.0);
        assert!((v - Vec4::new(0.0, -1.0, 0.0, 0.0)).magnitude() < EPSILON);
    }

    #[test]
    fn test_from_quat_quarter_turn_about_z() {
        let m = Mat4::from_quat(Vec4::rotation(0.0, 0.0, 1.0, FRAC_PI_2));
        let v = m * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!((v - Vec4::new(0.0, 1.0, 0.0, 1.0)).magnitude() < EPSILON);
    }

    #[test]
    fn test_from_quat_matches_glam() {
        let q = Vec4::rotation(0.0, 0.6, 0.8, 1.1);
        let ours = Mat4::from_quat(q);
        let theirs: Mat4 = glam::Mat4::from_quat(q.into()).into();
        assert!(ours.abs_diff_eq(&theirs, 1e-6));
    }

    #[test]
    fn test_projection_near_plane_maps_to_ndc_minus_one() {
        let near = 0.5;
        let p = Mat4::projection(near, FRAC_PI_4, 1.5);
        let clip = p * Vec4::new(0.0, 0.0, -near, 1.0);
        assert!((clip.z / clip.w + 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_projection_far_points_approach_ndc_plus_one() {
        let p = Mat4::projection(0.1, FRAC_PI_4, 1.0);
        let clip = p * Vec4::new(0.0, 0.0, -1.0e5, 1.0);
        let depth = clip.z / clip.w;
        assert!(depth < 1.0 && depth > 0.99);
    }

    #[test]
    fn test_projection_uses_divided_fov() {
        let (near, fov_x, aspect) = (0.1, 0.6, 2.0);
        let p = Mat4::projection(near, fov_x, aspect);
        // 2n / (2 n tan(a)) = 1 / tan(a)
        assert!((p.get(0, 0) - 1.0 / fov_x.tan()).abs() < EPSILON);
        assert!((p.get(1, 1) - 1.0 / (fov_x / aspect).tan()).abs() < EPSILON);
        assert_eq!(p.get(3, 3), 0.0);
        assert_eq!(p.get(2, 3), -1.0);
    }

    #[test]
    fn test_invert_roundtrips_to_identity() {
        for m in sample_matrices() {
            let product = m * m.invert();
            assert!(
                product.abs_diff_eq(&Mat4::identity(), EPSILON),
                "M * M^-1 not identity for\n{m}got\n{product}"
            );
        }
    }

    #[test]
    fn test_invert_matches_glam() {
        for m in sample_matrices() {
            let theirs: Mat4 = glam::Mat4::from(m).inverse().into();
            assert!(m.invert().abs_diff_eq(&theirs, EPSILON));
        }
    }

    #[test]
    fn test_invert_singular_returns_zero() {
        assert_eq!(Mat4::zero().invert(), Mat4::zero());

        let mut rank_deficient = Mat4::identity();
        rank_deficient.set(2, 2, 0.0);
        assert_eq!(rank_deficient.invert(), Mat4::zero());
    }

    #[test]
    fn test_invert_threshold() {
        let mut tiny = Mat4::identity();
        tiny.set(1, 1, 5e-7);
        assert_eq!(tiny.invert(), Mat4::zero());

        let mut small = Mat4::identity();
        small.set(1, 1, 2e-6);
        let inv = small.invert();
        assert_ne!(inv, Mat4::zero());
        assert!((inv.get(1, 1) - 5e5).abs() < 1.0);
    }

    #[test]
    fn test_norm() {
        assert!((Mat4::identity().norm(2.0) - 2.0).abs() < 1e-6);
        assert!((Mat4::identity().norm(1.0) - 4.0).abs() < 1e-6);

        let mut m = Mat4::zero();
        m.set(0, 0, -3.0);
        m.set(1, 0, 4.0);
        assert!((m.norm(2.0) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_norm_negative_entries_with_fractional_order_is_nan() {
        let mut neg = Mat4::identity();
        neg.set(0, 0, -1.0);
        assert!(neg.norm(0.5).is_nan());
    }

    #[test]
    fn test_sub() {
        let d = Mat4::identity() - Mat4::identity();
        assert_eq!(d, Mat4::zero());
    }

    #[test]
    fn test_display_aligns_columns() {
        let text = Mat4::translation(10.0, 0.0, 0.0).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
        assert!(lines[3].starts_with("[ 10"));
    }

    #[test]
    fn test_pod_cast_is_column_major() {
        let m = Mat4::translation(7.0, 8.0, 9.0);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&m));
        assert_eq!(&floats[12..15], &[7.0, 8.0, 9.0]);
    }
}
