//! Orderings injected into [`BTree`](crate::BTree).
//!
//! The tree only ever asks "is `a` strictly less than `b`?". Everything else
//! (routing, equivalence, the in-order iterator) is derived from that single
//! predicate, so any strict weak ordering works.

use std::cmp::Ordering;

/// A strict-less predicate over `T`.
pub trait Compare<T: ?Sized> {
    /// Returns `true` iff `a` orders strictly before `b`.
    fn lt(&self, a: &T, b: &T) -> bool;

    /// Neither key orders before the other.
    #[inline]
    fn equivalent(&self, a: &T, b: &T) -> bool {
        !self.lt(a, b) && !self.lt(b, a)
    }

    /// Three-way comparison derived from [`Compare::lt`].
    #[inline]
    fn ordering(&self, a: &T, b: &T) -> Ordering {
        if self.lt(a, b) {
            Ordering::Less
        } else if self.lt(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Ascending order per [`Ord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    #[inline]
    fn lt(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Descending order per [`Ord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reverse;

impl<T: Ord + ?Sized> Compare<T> for Reverse {
    #[inline]
    fn lt(&self, a: &T, b: &T) -> bool {
        b < a
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn lt(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}
