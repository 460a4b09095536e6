//! Points and vectors tied to a frame.
//!
//! Both are carried by [`Coordinate`]; the [`Kind`] tag picks the
//! homogeneous weight used when a transform is applied. A point has weight
//! `1` and picks up translation, a vector has weight `0` and does not.

use std::fmt;

use glam::DVec3;

use crate::{
    config::Limits,
    error::{FrameError, Result},
    frame::Frame,
    tf::{Matrix2D, Precision, Vector2D},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Kind {
    Point,
    Vector,
}
impl Kind {
    pub fn weight(self) -> Precision {
        match self {
            Kind::Point => 1.0,
            Kind::Vector => 0.0,
        }
    }
}
impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Point => "Point",
            Kind::Vector => "Vector",
        })
    }
}

/// Applies `matrix` to `coords` with the weight implied by `kind`.
///
/// A non-zero resulting weight divides the result, a zero weight is dropped
/// as is. Affine matrices keep the weight of points at `1` and of vectors at
/// `0`, so normalization only matters for projective matrices.
pub fn apply_transform(matrix: &Matrix2D, coords: Vector2D, kind: Kind) -> Vector2D {
    let mut h = *matrix * DVec3::new(coords.x, coords.y, kind.weight());
    if h.z != 0.0 {
        h /= h.z;
    }
    h.truncate()
}

/// A point or vector expressed in a frame.
///
/// Conversions return new coordinates and never touch `self`.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    kind: Kind,
    local: Vector2D,
    frame: Frame,
}

impl Coordinate {
    /// `frame` may be a [`Frame`] or `None` for [`Frame::absolute`].
    pub fn new(kind: Kind, local: Vector2D, frame: impl Into<Option<Frame>>) -> Self {
        Self {
            kind,
            local,
            frame: frame.into().unwrap_or_else(Frame::absolute),
        }
    }

    pub fn point(x: Precision, y: Precision, frame: impl Into<Option<Frame>>) -> Self {
        Self::new(Kind::Point, Vector2D::new(x, y), frame)
    }

    pub fn vector(x: Precision, y: Precision, frame: impl Into<Option<Frame>>) -> Self {
        Self::new(Kind::Vector, Vector2D::new(x, y), frame)
    }

    /// Builds a coordinate from raw values, which must be exactly `[x, y]`.
    pub fn try_from_slice(
        kind: Kind,
        values: &[Precision],
        frame: impl Into<Option<Frame>>,
    ) -> Result<Self> {
        match *values {
            [x, y] => Ok(Self::new(kind, Vector2D::new(x, y), frame)),
            _ => Err(FrameError::InvalidDimension {
                what: "coordinate",
                expected: 2,
                found: values.len(),
            }),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }
    pub fn local(&self) -> Vector2D {
        self.local
    }
    pub fn x(&self) -> Precision {
        self.local.x
    }
    pub fn y(&self) -> Precision {
        self.local.y
    }
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
    pub fn is_point(&self) -> bool {
        self.kind == Kind::Point
    }
    pub fn is_vector(&self) -> bool {
        self.kind == Kind::Vector
    }

    /// Same coordinate expressed in [`Frame::absolute`].
    pub fn to_global(&self) -> Result<Coordinate> {
        self.to_global_with(&Limits::default())
    }

    /// [`Coordinate::to_global`] under caller limits, e.g. a
    /// [`FrameTree`](crate::FrameTree)'s `limits()`.
    pub fn to_global_with(&self, limits: &Limits) -> Result<Coordinate> {
        if self.frame.is_absolute() {
            return Ok(self.clone());
        }
        let global = self.frame.global_transform_with(limits)?;
        Ok(self.transformed(&global, &Frame::absolute()))
    }

    /// Same coordinate expressed in `target`.
    pub fn to_frame(&self, target: &Frame) -> Result<Coordinate> {
        self.to_frame_with(target, &Limits::default())
    }

    pub fn to_frame_with(&self, target: &Frame, limits: &Limits) -> Result<Coordinate> {
        let convert = self.frame.compute_convert_transform_with(target, limits)?;
        log::trace!("converting {self} into frame at depth {}", target.depth());
        Ok(self.transformed(&convert, target))
    }

    pub(crate) fn transformed(&self, matrix: &Matrix2D, frame: &Frame) -> Coordinate {
        Coordinate {
            kind: self.kind,
            local: apply_transform(matrix, self.local, self.kind),
            frame: frame.clone(),
        }
    }

    /// Kind and local values without the frame.
    pub fn payload(&self) -> LocalCoordinate {
        LocalCoordinate {
            kind: self.kind,
            local: self.local,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.kind, self.local.x, self.local.y)
    }
}

/// Converts every coordinate into `target`.
///
/// The convert matrix is computed once per distinct source frame. The first
/// failure aborts the whole batch.
pub fn convert_all(coords: &[Coordinate], target: &Frame) -> Result<Vec<Coordinate>> {
    convert_all_with(coords, target, &Limits::default())
}

pub fn convert_all_with(
    coords: &[Coordinate],
    target: &Frame,
    limits: &Limits,
) -> Result<Vec<Coordinate>> {
    let mut cache: Vec<(&Frame, Matrix2D)> = Vec::new();
    let mut out = Vec::with_capacity(coords.len());
    for coord in coords {
        let convert = match cache.iter().find(|(frame, _)| *frame == coord.frame()) {
            Some((_, m)) => *m,
            None => {
                let m = coord.frame().compute_convert_transform_with(target, limits)?;
                cache.push((coord.frame(), m));
                m
            }
        };
        out.push(coord.transformed(&convert, target));
    }
    Ok(out)
}

/// A coordinate detached from its frame, e.g. for handing to a plotter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalCoordinate {
    pub kind: Kind,
    pub local: Vector2D,
}
