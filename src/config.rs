use crate::error::{Result, TreeError};
use crate::MIN_DEGREE;

/// Configuration for a [`BTree`](crate::BTree).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Minimum degree `t`. Non-root nodes hold `t-1 ..= 2t-1` keys.
    pub min_degree: usize,
    /// Number of node slots reserved in the arena up front.
    pub initial_node_capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            min_degree: MIN_DEGREE,
            initial_node_capacity: 0,
        }
    }
}

impl TreeConfig {
    /// Default configuration with the given minimum degree.
    pub fn with_min_degree(min_degree: usize) -> Self {
        Self {
            min_degree,
            ..Self::default()
        }
    }

    /// Reserve arena slots for roughly `keys` keys at half occupancy.
    pub fn reserve_for_keys(mut self, keys: usize) -> Self {
        let per_node = self.min_degree.max(MIN_DEGREE);
        self.initial_node_capacity = keys.div_ceil(per_node);
        self
    }

    /// Reject degrees for which the node size bounds degenerate or `2t-1`
    /// does not fit in a `usize`.
    pub fn validate(&self) -> Result<()> {
        self.max_keys().map(|_| ())
    }

    /// Maximum keys per node, `2t-1`.
    pub fn max_keys(&self) -> Result<usize> {
        let degree = self.min_degree;
        if degree < MIN_DEGREE {
            return Err(TreeError::InvalidDegree { degree });
        }
        degree
            .checked_add(degree - 1)
            .ok_or(TreeError::DegreeTooLarge { degree })
    }
}
