//! Error type for the storage engine.

use std::error::Error;
use std::fmt;

/// Failures raised by the storage engine.
///
/// Out-of-range queries on the raw compressed accessors are not errors; they
/// report a `-1` sentinel by convention and callers are expected to check it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SparseError {
    /// A compressed form was requested but the matrix holds no entries.
    NoData,
    /// Two entries were inserted at the same coordinate.
    DoubleEntry { row: usize, col: usize },
    /// A pointer array's length does not match the primary dimension.
    BadIndptrLength,
    /// A pointer array is not monotonically non-decreasing from zero.
    UnsortedIndptr,
    /// Secondary indices within a run are not strictly increasing.
    NonSortedIndices,
    /// Index and value arrays disagree in length.
    DataIndicesMismatch,
    /// The pointer array and the index array disagree on the entry count.
    BadNnzCount,
    /// An index lies outside the matrix dimensions.
    OutOfBoundsIndex,
}

impl fmt::Display for SparseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoData => write!(f, "no data to build a compressed form from"),
            Self::DoubleEntry { row, col } => {
                write!(f, "duplicate entry at ({}, {})", row, col)
            }
            Self::BadIndptrLength => write!(f, "pointer array has the wrong length"),
            Self::UnsortedIndptr => write!(f, "pointer array is not sorted"),
            Self::NonSortedIndices => {
                write!(f, "indices within a run are not strictly increasing")
            }
            Self::DataIndicesMismatch => {
                write!(f, "index and value arrays have different lengths")
            }
            Self::BadNnzCount => {
                write!(f, "pointer array disagrees with the entry count")
            }
            Self::OutOfBoundsIndex => write!(f, "index out of bounds"),
        }
    }
}

impl Error for SparseError {}
