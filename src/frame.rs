use std::{
    fmt,
    sync::{Arc, LazyLock},
};

use crate::{
    config::Limits,
    coordinate::Coordinate,
    error::{FrameError, Result},
    tf::{self, Compose, Matrix2D, Precision},
};

static ABSOLUTE: LazyLock<Frame> = LazyLock::new(|| Frame::root(Matrix2D::IDENTITY));

/// A node in a tree of coordinate frames.
///
/// `Frame` is a shared handle: cloning it is cheap and every clone refers to
/// the same immutable node. A child keeps its parent alive, a parent knows
/// nothing of its children. Equality is node identity.
#[derive(Clone)]
pub struct Frame {
    node: Arc<Node>,
}
struct Node {
    /// Local to parent.
    transform: Matrix2D,
    parent: Option<Frame>,
    depth: usize,
}
impl Drop for Node {
    // Unlink the parent chain in a loop so long chains don't recurse on drop.
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(frame) = parent {
            parent = match Arc::into_inner(frame.node) {
                Some(mut node) => node.parent.take(),
                None => None,
            };
        }
    }
}

impl Frame {
    pub fn new(transform: Matrix2D, parent: Option<&Frame>) -> Self {
        let depth = parent.map_or(0, |p| p.node.depth + 1);
        Self {
            node: Arc::new(Node {
                transform,
                parent: parent.cloned(),
                depth,
            }),
        }
    }

    pub fn root(transform: Matrix2D) -> Self {
        Self::new(transform, None)
    }

    pub fn child(&self, transform: Matrix2D) -> Self {
        Self::new(transform, Some(self))
    }

    /// The implicit global frame: an identity root shared by every
    /// coordinate created without a frame.
    pub fn absolute() -> Self {
        ABSOLUTE.clone()
    }

    /// Frame placed by translation, rotation and scale relative to `parent`.
    pub fn from_trs(
        parent: Option<&Frame>,
        tx: Precision,
        ty: Precision,
        angle: Precision,
        sx: Precision,
        sy: Precision,
    ) -> Self {
        Self::new(tf::trs(tx, ty, angle, sx, sy), parent)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_trks(
        parent: Option<&Frame>,
        tx: Precision,
        ty: Precision,
        angle: Precision,
        kx: Precision,
        ky: Precision,
        sx: Precision,
        sy: Precision,
    ) -> Self {
        Self::new(tf::trks(tx, ty, angle, kx, ky, sx, sy), parent)
    }

    pub fn transform(&self) -> Matrix2D {
        self.node.transform
    }

    pub fn parent(&self) -> Option<&Frame> {
        self.node.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    /// True for the shared [`Frame::absolute`] frame.
    pub fn is_absolute(&self) -> bool {
        Arc::ptr_eq(&self.node, &ABSOLUTE.node)
    }

    /// Number of ancestors above this frame.
    pub fn depth(&self) -> usize {
        self.node.depth
    }

    /// This frame, then its parent, and so on up to the root.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Local to global transform of this frame.
    pub fn global_transform(&self) -> Result<Matrix2D> {
        self.global_transform_with(&Limits::default())
    }

    pub fn global_transform_with(&self, limits: &Limits) -> Result<Matrix2D> {
        let mut global = Matrix2D::IDENTITY;
        for (i, frame) in self.ancestors().enumerate() {
            if i >= limits.max_depth {
                log::warn!("ancestor walk stopped after {} frames", limits.max_depth);
                return Err(FrameError::CyclicFrame {
                    limit: limits.max_depth,
                });
            }
            global = global.compose(frame.transform());
        }
        Ok(global)
    }

    /// Matrix mapping local coordinates of `self` into local coordinates of
    /// `target`. Fails if the target's global transform is singular.
    pub fn compute_convert_transform(&self, target: &Frame) -> Result<Matrix2D> {
        self.compute_convert_transform_with(target, &Limits::default())
    }

    pub fn compute_convert_transform_with(
        &self,
        target: &Frame,
        limits: &Limits,
    ) -> Result<Matrix2D> {
        let to_target = tf::try_inverse(
            &target.global_transform_with(limits)?,
            limits.singular_epsilon,
        )?;
        Ok(to_target * self.global_transform_with(limits)?)
    }

    /// Origin and unit axes of this frame expressed in `reference`.
    pub fn axes_in(&self, reference: &Frame) -> Result<FrameAxes> {
        let convert = self.compute_convert_transform(reference)?;
        let axis = |c: Coordinate| c.transformed(&convert, reference);
        Ok(FrameAxes {
            origin: axis(Coordinate::point(0.0, 0.0, self.clone())),
            x: axis(Coordinate::vector(1.0, 0.0, self.clone())),
            y: axis(Coordinate::vector(0.0, 1.0, self.clone())),
        })
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::root(Matrix2D::IDENTITY)
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}
impl Eq for Frame {}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("transform", &self.node.transform)
            .field("depth", &self.node.depth)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ancestors<'a> {
    next: Option<&'a Frame>,
}
impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Frame;

    fn next(&mut self) -> Option<Self::Item> {
        let this = self.next?;
        self.next = this.parent();
        Some(this)
    }
}

/// A frame's origin point and unit axis vectors in some reference frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAxes {
    pub origin: Coordinate,
    pub x: Coordinate,
    pub y: Coordinate,
}
