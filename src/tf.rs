//! Homogeneous 2D transform matrices.
//!
//! Every builder returns a 3x3 matrix acting on column vectors `(x, y, w)`
//! with bottom row `[0, 0, 1]`. Nothing here can fail; zero or negative
//! scale factors are valid.

use glam::{DMat3, DVec2, DVec3};

use crate::error::{FrameError, Result};

pub type Precision = f64;
pub type Matrix2D = DMat3;
pub type Vector2D = DVec2;

/// Folds a child's local transform into its parent's.
pub trait Compose: Clone {
    fn compose(self, parent: Self) -> Self;
}
impl Compose for Matrix2D {
    fn compose(self, parent: Self) -> Self {
        parent * self
    }
}

pub fn translate(tx: Precision, ty: Precision) -> Matrix2D {
    Matrix2D::from_translation(DVec2::new(tx, ty))
}

/// Counter-clockwise rotation by `angle` radians.
pub fn rotate(angle: Precision) -> Matrix2D {
    Matrix2D::from_angle(angle)
}

pub fn scale(sx: Precision, sy: Precision) -> Matrix2D {
    Matrix2D::from_diagonal(DVec3::new(sx, sy, 1.0))
}

/// `kx` shifts x by y, `ky` shifts y by x.
pub fn shear(kx: Precision, ky: Precision) -> Matrix2D {
    Matrix2D::from_cols(
        DVec3::new(1.0, ky, 0.0),
        DVec3::new(kx, 1.0, 0.0),
        DVec3::Z,
    )
}

/// `T * R * S`: scale first, then rotate, then translate.
pub fn trs(
    tx: Precision,
    ty: Precision,
    angle: Precision,
    sx: Precision,
    sy: Precision,
) -> Matrix2D {
    translate(tx, ty) * rotate(angle) * scale(sx, sy)
}

/// `T * R * K * S`: like [`trs`] with a shear between rotation and scale.
pub fn trks(
    tx: Precision,
    ty: Precision,
    angle: Precision,
    kx: Precision,
    ky: Precision,
    sx: Precision,
    sy: Precision,
) -> Matrix2D {
    translate(tx, ty) * rotate(angle) * shear(kx, ky) * scale(sx, sy)
}

/// Inverts `m`, rejecting it as singular when the determinant is not finite
/// or is at most `epsilon` times the product of the column lengths.
///
/// The comparison is relative, so uniformly tiny or huge scales invert fine
/// while nearly collinear axes are rejected. Affine matrices are measured on
/// their linear 2x2 block so translation does not dilute the test.
pub fn try_inverse(m: &Matrix2D, epsilon: Precision) -> Result<Matrix2D> {
    let determinant = m.determinant();
    let bound = if is_affine(m) {
        m.x_axis.truncate().length() * m.y_axis.truncate().length()
    } else {
        m.x_axis.length() * m.y_axis.length() * m.z_axis.length()
    };
    if !determinant.is_finite() || determinant.abs() <= epsilon * bound {
        log::warn!("refusing to invert singular transform (determinant {determinant})");
        return Err(FrameError::SingularTransform { determinant });
    }
    Ok(m.inverse())
}

/// Builds a matrix from row-major rows. Anything but exactly 3x3 is rejected.
pub fn try_from_rows<R: AsRef<[Precision]>>(rows: &[R]) -> Result<Matrix2D> {
    if rows.len() != 3 {
        return Err(FrameError::InvalidDimension {
            what: "matrix",
            expected: 3,
            found: rows.len(),
        });
    }
    let mut array = [[0.0; 3]; 3];
    for (dst, row) in array.iter_mut().zip(rows) {
        let row = row.as_ref();
        if row.len() != 3 {
            return Err(FrameError::InvalidDimension {
                what: "matrix row",
                expected: 3,
                found: row.len(),
            });
        }
        dst.copy_from_slice(row);
    }
    // glam is column-major.
    Ok(Matrix2D::from_cols_array_2d(&array).transpose())
}

/// True if the bottom row is exactly `[0, 0, 1]`.
pub fn is_affine(m: &Matrix2D) -> bool {
    m.row(2) == DVec3::Z
}
