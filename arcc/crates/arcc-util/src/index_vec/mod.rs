//! IndexVec - A vector indexed by a specific type.
//!
//! The analyzer keeps several dense id spaces (AST node ids, type variable
//! ids). [`IndexVec`] stores values keyed by one of them and refuses indices
//! from another at compile time.
//!
//! # Example
//!
//! ```
//! use arcc_util::define_idx;
//! use arcc_util::index_vec::IndexVec;
//!
//! define_idx!(VarId);
//!
//! let mut vars: IndexVec<VarId, &str> = IndexVec::new();
//! let id = vars.push("x");
//! assert_eq!(vars[id], "x");
//! assert_eq!(vars.next_index(), VarId(1));
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Trait for types that can be used as indices
pub trait Idx: Copy + Eq {
    /// Convert from usize to index type
    ///
    /// # Panics
    ///
    /// Implementations may panic if the value does not fit the index type.
    fn from_usize(idx: usize) -> Self;

    /// Convert index to usize for slice indexing
    fn index(self) -> usize;
}

/// A vector indexed by a specific type
#[derive(Clone, PartialEq, Eq)]
pub struct IndexVec<I, T> {
    raw: Vec<T>,
    _marker: PhantomData<fn(&I)>,
}

impl<I, T> IndexVec<I, T> {
    /// Create an empty IndexVec
    #[inline]
    pub fn new() -> Self {
        Self {
            raw: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Create an IndexVec with the specified capacity
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: Vec::with_capacity(capacity),
            _marker: PhantomData,
        }
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if there are no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Elements as a plain slice
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.raw
    }

    /// Iterate elements in index order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.raw.iter()
    }
}

impl<I: Idx, T> IndexVec<I, T> {
    /// Append a value and return its index
    #[inline]
    pub fn push(&mut self, value: T) -> I {
        let idx = I::from_usize(self.raw.len());
        self.raw.push(value);
        idx
    }

    /// The index the next `push` will return
    #[inline]
    pub fn next_index(&self) -> I {
        I::from_usize(self.raw.len())
    }

    /// Element at `index`, if in bounds
    #[inline]
    pub fn get(&self, index: I) -> Option<&T> {
        self.raw.get(index.index())
    }

    /// Mutable element at `index`, if in bounds
    #[inline]
    pub fn get_mut(&mut self, index: I) -> Option<&mut T> {
        self.raw.get_mut(index.index())
    }

    /// Iterate `(index, element)` pairs
    pub fn iter_enumerated(&self) -> impl Iterator<Item = (I, &T)> + '_ {
        self.raw
            .iter()
            .enumerate()
            .map(|(i, v)| (I::from_usize(i), v))
    }

    /// Iterate all valid indices
    pub fn indices(&self) -> impl Iterator<Item = I> {
        (0..self.raw.len()).map(I::from_usize)
    }
}

impl<I: Idx, T> Index<I> for IndexVec<I, T> {
    type Output = T;

    #[inline]
    fn index(&self, index: I) -> &T {
        &self.raw[index.index()]
    }
}

impl<I: Idx, T> IndexMut<I> for IndexVec<I, T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut T {
        &mut self.raw[index.index()]
    }
}

impl<I, T> Default for IndexVec<I, T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<I, T: fmt::Debug> fmt::Debug for IndexVec<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.raw.iter()).finish()
    }
}

impl<I, T> FromIterator<T> for IndexVec<I, T> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        Self {
            raw: iter.into_iter().collect(),
            _marker: PhantomData,
        }
    }
}

/// Macro to define index types easily
///
/// Generates a `u32` newtype implementing [`Idx`] with the usual derives.
#[macro_export]
macro_rules! define_idx {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $crate::index_vec::Idx for $name {
            fn from_usize(idx: usize) -> Self {
                assert!(idx <= u32::MAX as usize, "index {} exceeds u32::MAX", idx);
                $name(idx as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}
