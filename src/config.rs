use crate::Precision;

/// Bounds applied while walking and inverting frame chains.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Limits {
    /// Maximum number of frames visited from a frame up to its root,
    /// the frame itself included.
    pub max_depth: usize,
    /// Relative singularity threshold: a matrix is singular when its
    /// determinant magnitude is at most this times the product of its
    /// axis lengths. See [`crate::tf::try_inverse`].
    pub singular_epsilon: Precision,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 1024,
            singular_epsilon: 1e-12,
        }
    }
}
impl Limits {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
    pub fn with_singular_epsilon(mut self, singular_epsilon: Precision) -> Self {
        self.singular_epsilon = singular_epsilon;
        self
    }
}
