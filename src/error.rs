/// Result type alias for tree construction.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors raised by [`BTree`](crate::BTree) construction.
///
/// Insertion and traversal cannot fail on a validly constructed tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Minimum degree below 2 leaves no room for the `t-1 ..= 2t-1` key bounds.
    #[error("invalid minimum degree {degree}: must be at least {min}", min = crate::MIN_DEGREE)]
    InvalidDegree { degree: usize },
    /// `2t-1` keys per node would not fit in a `usize`.
    #[error("minimum degree {degree} too large: 2t-1 overflows usize")]
    DegreeTooLarge { degree: usize },
}
