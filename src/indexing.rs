//! Abstraction over index integer types.
//!
//! The storage engine can index with any of `i16, i32, i64, isize`. Indices
//! are signed because the raw compressed accessors report out-of-range
//! queries with a `-1` sentinel, which must be representable in the index
//! type. The standard engine uses `i32`, the huge engine `i64`.

use std::fmt::Debug;
use std::ops::AddAssign;

use num_traits::int::PrimInt;
use num_traits::Signed;

/// An integer used to index and count sparse matrix entries.
pub trait SpIndex: Debug + PrimInt + Signed + AddAssign<Self> + Default {
    /// Convert to usize.
    ///
    /// # Panics
    ///
    /// If the value cannot be represented as an `usize`, eg the `-1`
    /// sentinel. The panic happens in debug builds only.
    fn index(self) -> usize;

    /// Convert from usize.
    ///
    /// # Panics
    ///
    /// If the input overflows the index type. The panic happens in debug
    /// builds only.
    fn from_usize(ind: usize) -> Self;

    /// The sentinel returned by raw accessors for out-of-range queries.
    #[inline(always)]
    fn sentinel() -> Self {
        -Self::one()
    }
}

macro_rules! sp_index_impl {
    ($int:ident) => {
        impl SpIndex for $int {
            #[inline(always)]
            fn index(self) -> usize {
                debug_assert!(self >= 0);
                self as usize
            }

            #[inline(always)]
            fn from_usize(ind: usize) -> Self {
                let max = $int::max_value() as usize;
                debug_assert!(ind <= max);
                ind as $int
            }
        }
    };
}

sp_index_impl!(isize);
sp_index_impl!(i64);
sp_index_impl!(i32);
sp_index_impl!(i16);
