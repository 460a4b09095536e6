//! Nested 2D coordinate frames.
//!
//! A [`Frame`] holds a homogeneous 3x3 transform from its local space into
//! its parent's. A [`Coordinate`] is a point or vector expressed in a frame
//! and can be re-expressed globally or in any other frame.
//!
//! ```
//! use nestframe::{Coordinate, Frame, tf};
//!
//! let root = Frame::root(tf::translate(10.0, 5.0));
//! let child = root.child(tf::translate(3.0, 2.0));
//!
//! let p = Coordinate::point(0.0, 0.0, child.clone()).to_global()?;
//! assert_eq!((p.x(), p.y()), (13.0, 7.0));
//!
//! let v = Coordinate::vector(1.0, 0.0, child).to_global()?;
//! assert_eq!((v.x(), v.y()), (1.0, 0.0));
//! # Ok::<(), nestframe::FrameError>(())
//! ```
//!
//! [`FrameTree`] keeps frames in an id-keyed arena when the caller needs
//! children, names, or every global transform at once.

pub mod config;
pub mod coordinate;
pub mod error;
pub mod frame;
pub mod tf;
pub mod tree;

pub use config::Limits;
pub use coordinate::{
    Coordinate, Kind, LocalCoordinate, apply_transform, convert_all, convert_all_with,
};
pub use error::{FrameError, Result};
pub use frame::{Ancestors, Frame, FrameAxes};
pub use tf::{Compose, Matrix2D, Precision, Vector2D};
pub use tree::{FrameId, FrameTree};
