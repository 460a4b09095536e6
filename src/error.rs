use crate::{Precision, tree::FrameId};

pub type Result<T> = std::result::Result<T, FrameError>;

/// Errors raised while building frames or converting coordinates.
///
/// Every error is detected where it happens and returned immediately.
/// Conversions never produce partial results.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    /// The target frame's global transform collapses space.
    #[error("transform is singular (determinant {determinant}), conversion is undefined")]
    SingularTransform { determinant: Precision },

    #[error("{what} must have {expected} components, found {found}")]
    InvalidDimension {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Ancestor walk did not reach a root within the configured depth.
    #[error("frame chain exceeds {limit} ancestors, tree is cyclic or too deep")]
    CyclicFrame { limit: usize },

    #[error("no frame with id {0}")]
    UnknownFrame(FrameId),

    #[error("frame name {0:?} is already taken")]
    DuplicateName(String),
}

impl FrameError {
    pub fn is_singular(&self) -> bool {
        matches!(self, FrameError::SingularTransform { .. })
    }
}
