//! Backing-array abstraction shared by the standard and huge engines.
//!
//! The sort, compression and query machinery never touches concrete slices
//! directly; it goes through [`SpArray`], an array-like capability offering
//! element access, swaps and range views. The standard engine backs its
//! arrays with `Vec`, the huge engine with [`SegVec`], a chain of
//! fixed-capacity segments that can hold entry counts past what a single
//! allocation may address.

pub mod segmented;

pub use self::segmented::SegVec;

/// An array of `Copy` elements the engine can own, grow and reorder.
///
/// A logical range obtained through [`range_parts`](SpArray::range_parts)
/// is exposed as at most two slices; the second slice is empty whenever the
/// range is contiguous in memory. The engine only ever asks for single-run
/// ranges (one matrix row or column), which segmented backings guarantee to
/// span at most two segments.
pub trait SpArray<T: Copy>: Clone {
    fn with_capacity(capacity: usize) -> Self;

    fn len(&self) -> usize;

    /// Read the element at `idx`.
    ///
    /// # Panics
    ///
    /// If `idx` is out of bounds.
    fn get(&self, idx: usize) -> T;

    /// Overwrite the element at `idx`.
    ///
    /// # Panics
    ///
    /// If `idx` is out of bounds.
    fn set(&mut self, idx: usize, val: T);

    fn push(&mut self, val: T);

    fn clear(&mut self);

    fn reserve(&mut self, additional: usize);

    /// Approximate heap usage of this array in bytes.
    fn heap_bytes(&self) -> usize;

    /// View the logical range `start..start + len` as up to two slices.
    fn range_parts(&self, start: usize, len: usize) -> (&[T], &[T]);

    /// Mutable variant of [`range_parts`](SpArray::range_parts).
    fn range_parts_mut(&mut self, start: usize, len: usize) -> (&mut [T], &mut [T]);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn swap(&mut self, a: usize, b: usize) {
        let va = self.get(a);
        let vb = self.get(b);
        self.set(a, vb);
        self.set(b, va);
    }

    /// Swap the ranges `a..a + n` and `b..b + n`.
    ///
    /// The ranges must not overlap.
    fn swap_range(&mut self, a: usize, b: usize, n: usize) {
        for k in 0..n {
            self.swap(a + k, b + k);
        }
    }
}

impl<T: Copy> SpArray<T> for Vec<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity(capacity)
    }

    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn get(&self, idx: usize) -> T {
        self[idx]
    }

    #[inline]
    fn set(&mut self, idx: usize, val: T) {
        self[idx] = val;
    }

    #[inline]
    fn push(&mut self, val: T) {
        Self::push(self, val);
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn reserve(&mut self, additional: usize) {
        Self::reserve(self, additional);
    }

    fn heap_bytes(&self) -> usize {
        self.capacity() * std::mem::size_of::<T>()
    }

    fn range_parts(&self, start: usize, len: usize) -> (&[T], &[T]) {
        (&self[start..start + len], &[])
    }

    fn range_parts_mut(&mut self, start: usize, len: usize) -> (&mut [T], &mut [T]) {
        (&mut self[start..start + len], <&mut [T]>::default())
    }
}
