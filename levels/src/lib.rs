//! # mwtree-levels
//!
//! Reads a minimum degree `t` followed by whitespace-separated `u32` keys,
//! inserts them in order into a [`BTree`], and writes the tree one
//! breadth-first level per line.
//!
//! ```text
//! input:  2
//!         0 1 2 3 4 5 6 7 8 9
//! output: 3
//!         1 5 7
//!         0 2 4 6 8 9
//! ```

use std::fmt::Display;
use std::io::{self, Read, Write};

use mwtree::{BTree, Natural, TreeConfig, TreeError};

/// Key type accepted on input.
pub type Key = u32;

/// Errors surfaced by [`run`].
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("input is empty: expected a minimum degree")]
    MissingDegree,
    #[error("invalid minimum degree {0:?}")]
    InvalidDegreeToken(String),
    /// `position` counts keys from 0, not including the degree token.
    #[error("invalid key {token:?} at position {position}")]
    InvalidKey { position: usize, token: String },
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Parse `input`, build the tree and render it to `output`.
pub fn run<R: Read, W: Write>(mut input: R, output: W) -> Result<(), RunError> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    let tree = build_tree(&text)?;
    render_levels(&tree, output)?;
    Ok(())
}

/// Build a tree from the textual input format.
pub fn build_tree(text: &str) -> Result<BTree<Key>, RunError> {
    let mut tokens = text.split_whitespace();

    let degree_token = tokens.next().ok_or(RunError::MissingDegree)?;
    let degree: usize = degree_token
        .parse()
        .map_err(|_| RunError::InvalidDegreeToken(degree_token.to_string()))?;

    let key_count = tokens.clone().count();
    let config = TreeConfig::with_min_degree(degree).reserve_for_keys(key_count);
    let mut tree = BTree::with_config(config, Natural)?;
    for (position, token) in tokens.enumerate() {
        let key: Key = token.parse().map_err(|_| RunError::InvalidKey {
            position,
            token: token.to_string(),
        })?;
        tree.insert(key);
    }

    tracing::debug!(
        degree,
        keys = tree.len(),
        height = tree.height(),
        nodes = tree.node_count(),
        "built tree"
    );
    Ok(tree)
}

/// Write one line per level, keys separated by a single space.
pub fn render_levels<T: Display, C, W: Write>(tree: &BTree<T, C>, mut output: W) -> io::Result<()> {
    for level in tree.levels() {
        let mut keys = level.into_iter();
        if let Some(first) = keys.next() {
            write!(output, "{first}")?;
        }
        for key in keys {
            write!(output, " {key}")?;
        }
        writeln!(output)?;
    }
    output.flush()
}
