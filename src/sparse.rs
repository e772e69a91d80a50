use crate::errors::SparseError;
use crate::indexing::SpIndex;
use crate::storage::{SegVec, SpArray};

pub use self::vec::{SpVecView, SpVecViewMut};

/// A sparse matrix storage engine moving data between triplet, CSR and CSC
/// representations.
///
/// Entries are accumulated in triplet form through [`add`](SpMatBase::add):
/// three parallel arrays of row indices, column indices and values, in
/// insertion order, duplicates allowed for the moment. Compressed forms are
/// built on demand by [`create_csr`](SpMatBase::create_csr) and
/// [`create_csc`](SpMatBase::create_csc): a dual-key sort brings the entries
/// into (primary, secondary) order, duplicates inserted since the last
/// compression are rejected, and the sorted primary stream is compressed
/// into a pointer array. Every conversion is lossless, so a matrix can move
/// freely between representations; converting back to triplet order is
/// [`create_triplet`](SpMatBase::create_triplet), which decompresses the
/// pointer array.
///
/// The engine holds exactly one of: nothing, triplet arrays, one compressed
/// form, or both compressed forms (see [`Repr`]). Building one compressed
/// form from the other keeps both; building from triplet discards the
/// triplet arrays. Mutation through [`add`](SpMatBase::add) restores triplet
/// form first and drops compressed forms, so queries can never observe a
/// compressed form that predates a mutation.
///
/// The `SpMatBase` type is parameterized by the index scalar `I` and by the
/// backing storage of the index and value arrays, `IS` and `DS`. Two aliases
/// cover the supported variants: [`SpMat`] stores contiguous arrays indexed
/// by `i32`, which bounds the entry count at 32 bits; [`SpMatHuge`] stores
/// [`SegVec`] segmented arrays indexed by `i64` for entry counts past that
/// bound. Both variants honor the same operation contract.
///
/// Pointer arrays are dimension-sized rather than entry-sized, so they stay
/// contiguous (`Vec<I>`) in both variants.
///
/// # Example
///
/// ```rust
/// use spstore::SpMat;
///
/// let mut mat = SpMat::new();
/// mat.add(0, 0, 1.0);
/// mat.add(0, 2, 3.0);
/// mat.add(1, 1, 2.0);
/// mat.create_csr().unwrap();
/// assert_eq!(mat.nnz(), 3);
/// assert_eq!(mat.csr_indptr(), Some(&[0, 2, 3][..]));
/// ```
#[derive(Debug, Clone)]
pub struct SpMatBase<I, IS, DS>
where
    I: SpIndex,
    IS: SpArray<I>,
    DS: SpArray<f64>,
{
    nrows: usize,
    ncols: usize,
    added_input: bool,
    transposed: bool,
    store: Store<I, IS, DS>,
}

/// The standard engine: contiguous arrays, entry count bounded by `i32`.
pub type SpMat = SpMatBase<i32, Vec<i32>, Vec<f64>>;

/// The huge engine: segmented arrays indexed by `i64`, for entry counts a
/// 32-bit index cannot address.
pub type SpMatHuge = SpMatBase<i64, SegVec<i64>, SegVec<f64>>;

/// Describes the storage axis of a compressed representation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum CompressedStorage {
    /// Compressed row storage: the pointer array runs over rows.
    CSR,
    /// Compressed column storage: the pointer array runs over columns.
    CSC,
}

impl CompressedStorage {
    /// The other compressed axis.
    pub fn other_storage(self) -> Self {
        match self {
            Self::CSR => Self::CSC,
            Self::CSC => Self::CSR,
        }
    }
}

/// Which representations a matrix currently holds.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Repr {
    /// No entries and no arrays; the state after `new` or `clear`.
    Empty,
    /// Triplet arrays only.
    Triplet,
    /// Exactly one compressed form.
    Compressed(CompressedStorage),
    /// Both compressed forms (after deriving one from the other).
    Both,
}

/// Representation storage. Triplet arrays never coexist with a compressed
/// form: compression consumes them and `create_triplet` consumes the
/// compressed forms.
#[derive(Debug, Clone)]
enum Store<I, IS, DS> {
    Empty,
    Triplet(TriData<IS, DS>),
    Compressed(CompressedStorage, CsData<I, IS, DS>),
    Both {
        csr: CsData<I, IS, DS>,
        csc: CsData<I, IS, DS>,
    },
}

/// Triplet arrays: parallel rows, cols, values in insertion order.
#[derive(Debug, Clone)]
struct TriData<IS, DS> {
    rows: IS,
    cols: IS,
    vals: DS,
}

/// One compressed form: a dimension-sized pointer array over the primary
/// axis, with secondary indices and values in entry order.
#[derive(Debug, Clone)]
struct CsData<I, IS, DS> {
    ptr: Vec<I>,
    inds: IS,
    vals: DS,
}

/// Convenience re-exports of the engine types.
pub mod prelude {
    pub use super::{
        CompressedStorage, Repr, SpMat, SpMatBase, SpMatHuge, SpVecView,
        SpVecViewMut,
    };
}

pub(crate) mod utils {
    use super::*;

    /// Check that a run of secondary indices, exposed as up to two slices,
    /// is strictly increasing.
    pub(crate) fn strictly_increasing<I: SpIndex>(
        head: &[I],
        tail: &[I],
    ) -> bool {
        let mut prev: Option<I> = None;
        for &i in head.iter().chain(tail.iter()) {
            if let Some(p) = prev {
                if i <= p {
                    return false;
                }
            }
            prev = Some(i);
        }
        true
    }

    /// Check the structure of a compressed form against its dimensions.
    ///
    /// This ensures that:
    /// * the pointer array has length `outer + 1`, starts at zero and is
    ///   monotonically non-decreasing;
    /// * index and value arrays have equal lengths matching the last pointer;
    /// * each run holds strictly increasing secondary indices below `inner`.
    pub(crate) fn check_compressed_structure<I, IS, DS>(
        inner: usize,
        outer: usize,
        ptr: &[I],
        inds: &IS,
        vals: &DS,
    ) -> Result<(), SparseError>
    where
        I: SpIndex,
        IS: SpArray<I>,
        DS: SpArray<f64>,
    {
        if ptr.len() != outer + 1 {
            return Err(SparseError::BadIndptrLength);
        }
        if ptr[0] != I::zero() {
            return Err(SparseError::UnsortedIndptr);
        }
        if !ptr.windows(2).all(|w| w[0] <= w[1]) {
            return Err(SparseError::UnsortedIndptr);
        }
        if inds.len() != vals.len() {
            return Err(SparseError::DataIndicesMismatch);
        }
        if ptr[outer].index() != inds.len() {
            return Err(SparseError::BadNnzCount);
        }
        for o in 0..outer {
            let lo = ptr[o].index();
            let hi = ptr[o + 1].index();
            let (head, tail) = inds.range_parts(lo, hi - lo);
            if !strictly_increasing(head, tail) {
                return Err(SparseError::NonSortedIndices);
            }
            // Runs are sorted, so the first element is the minimum and the
            // last the maximum.
            if let Some(&i) = head.first().or_else(|| tail.first()) {
                if i < I::zero() {
                    return Err(SparseError::OutOfBoundsIndex);
                }
            }
            if let Some(&i) = tail.last().or_else(|| head.last()) {
                if i.index() >= inner {
                    return Err(SparseError::OutOfBoundsIndex);
                }
            }
        }
        Ok(())
    }
}

pub(crate) mod compress;
mod mat;
mod to_dense;
pub mod vec;

#[cfg(test)]
mod test {
    use super::utils;
    use crate::errors::SparseError;

    #[test]
    fn test_strictly_increasing() {
        assert!(utils::strictly_increasing::<i32>(&[1, 2, 3], &[]));
        assert!(utils::strictly_increasing::<i32>(&[1, 2], &[4, 8]));
        assert!(!utils::strictly_increasing::<i32>(&[1, 2], &[2, 8]));
        assert!(!utils::strictly_increasing::<i32>(&[2, 1], &[]));
        assert!(utils::strictly_increasing::<i32>(&[], &[]));
        assert!(utils::strictly_increasing::<i32>(&[1], &[]));
    }

    #[test]
    fn test_check_compressed_structure() {
        let check = |ptr: &[i32], inds: &Vec<i32>, vals: &Vec<f64>| {
            utils::check_compressed_structure(3, 2, ptr, inds, vals)
        };
        let inds = vec![0, 2, 1];
        let vals = vec![1.0, 3.0, 2.0];
        assert_eq!(check(&[0, 2, 3], &inds, &vals), Ok(()));
        assert_eq!(
            check(&[0, 2], &inds, &vals),
            Err(SparseError::BadIndptrLength)
        );
        assert_eq!(
            check(&[0, 3, 2], &inds, &vals),
            Err(SparseError::UnsortedIndptr)
        );
        assert_eq!(
            check(&[1, 2, 3], &inds, &vals),
            Err(SparseError::UnsortedIndptr)
        );
        assert_eq!(
            check(&[0, 2, 4], &inds, &vals),
            Err(SparseError::BadNnzCount)
        );
        assert_eq!(
            check(&[0, 2, 3], &vec![2, 0, 1], &vals),
            Err(SparseError::NonSortedIndices)
        );
        assert_eq!(
            check(&[0, 2, 3], &vec![0, 3, 1], &vals),
            Err(SparseError::OutOfBoundsIndex)
        );
        assert_eq!(
            check(&[0, 2, 3], &vec![0, 2, 1], &vec![1.0, 3.0]),
            Err(SparseError::DataIndicesMismatch)
        );
    }
}
