//! Sparse vector views over one row or column of a compressed matrix.
//!
//! A view borrows the index/value slices of a single pointer run. Backing
//! storage may be segmented, so a run can straddle one segment boundary;
//! views therefore carry up to two slices per array and present them as a
//! single logical vector. Indices within a view are sorted and unique
//! unless an index setter was called without a follow-up re-sort.

use std::cmp::Ordering;

use crate::dense_vector::DenseVector;
use crate::indexing::SpIndex;
use crate::mul_acc::CompensatedAcc;

/// A read-only sparse vector view.
#[derive(Clone, Copy, Debug)]
pub struct SpVecView<'a, I> {
    head_inds: &'a [I],
    tail_inds: &'a [I],
    head_vals: &'a [f64],
    tail_vals: &'a [f64],
}

/// A sparse vector view with mutable values. Indices stay read-only so a
/// view edit cannot break the run's ordering invariant.
#[derive(Debug)]
pub struct SpVecViewMut<'a, I> {
    head_inds: &'a [I],
    tail_inds: &'a [I],
    head_vals: &'a mut [f64],
    tail_vals: &'a mut [f64],
}

impl<'a, I: SpIndex> SpVecView<'a, I> {
    pub(crate) fn new(
        head_inds: &'a [I],
        tail_inds: &'a [I],
        head_vals: &'a [f64],
        tail_vals: &'a [f64],
    ) -> Self {
        debug_assert_eq!(
            head_inds.len() + tail_inds.len(),
            head_vals.len() + tail_vals.len(),
        );
        Self {
            head_inds,
            tail_inds,
            head_vals,
            tail_vals,
        }
    }

    /// The number of stored entries.
    pub fn len(&self) -> usize {
        self.head_inds.len() + self.tail_inds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The index of the `k`-th stored entry.
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.len()`.
    pub fn index(&self, k: usize) -> I {
        if k < self.head_inds.len() {
            self.head_inds[k]
        } else {
            self.tail_inds[k - self.head_inds.len()]
        }
    }

    /// The value of the `k`-th stored entry.
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.len()`.
    pub fn value(&self, k: usize) -> f64 {
        if k < self.head_vals.len() {
            self.head_vals[k]
        } else {
            self.tail_vals[k - self.head_vals.len()]
        }
    }

    /// Binary search for the entry holding index `ind`, returning its
    /// offset within the view. Requires the view to be sorted.
    pub fn find_index(&self, ind: I) -> Option<usize> {
        let mut lo = 0;
        let mut hi = self.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.index(mid).cmp(&ind) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Some(mid),
            }
        }
        None
    }

    /// Iterate over `(index, value)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (I, f64)> + 'a {
        self.head_inds
            .iter()
            .chain(self.tail_inds)
            .copied()
            .zip(self.values())
    }

    fn values(&self) -> impl Iterator<Item = f64> + 'a {
        self.head_vals.iter().chain(self.tail_vals).copied()
    }

    /// The sum of all stored values.
    pub fn sum(&self) -> f64 {
        self.values().sum()
    }

    /// The sum of squares of all stored values.
    pub fn sum_of_squares(&self) -> f64 {
        self.values().map(|v| v * v).sum()
    }

    /// The sum of squares restricted to entries whose index is below
    /// `bound`, for block-diagonal reductions. A bound past the largest
    /// index covers every entry.
    pub fn sum_of_squares_below(&self, bound: usize) -> f64 {
        self.iter()
            .filter(|(i, _)| i.index() < bound)
            .map(|(_, v)| v * v)
            .sum()
    }

    /// Accumulate the dot product with a dense vector on top of `init`.
    /// Every stored index must be within the dense vector's dimension.
    pub fn dot_acc<D: DenseVector + ?Sized>(&self, dense: &D, init: f64) -> f64 {
        let mut acc = init;
        for (ind, val) in self.iter() {
            debug_assert!(ind.index() < dense.dim());
            acc += val * dense.index(ind.index());
        }
        acc
    }

    /// [`dot_acc`](Self::dot_acc) with compensated accumulation: both the
    /// products and the running sum keep their rounding errors in a
    /// correction term, so the result is as accurate as if computed in
    /// twice the working precision.
    pub fn dot_acc_compensated<D: DenseVector + ?Sized>(
        &self,
        dense: &D,
        init: f64,
    ) -> f64 {
        let mut acc = CompensatedAcc::new(init);
        for (ind, val) in self.iter() {
            debug_assert!(ind.index() < dense.dim());
            acc.mul_acc(val, dense.index(ind.index()));
        }
        acc.value()
    }
}

impl<'a, I: SpIndex> SpVecViewMut<'a, I> {
    pub(crate) fn new(
        head_inds: &'a [I],
        tail_inds: &'a [I],
        head_vals: &'a mut [f64],
        tail_vals: &'a mut [f64],
    ) -> Self {
        debug_assert_eq!(
            head_inds.len() + tail_inds.len(),
            head_vals.len() + tail_vals.len(),
        );
        Self {
            head_inds,
            tail_inds,
            head_vals,
            tail_vals,
        }
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> SpVecView<'_, I> {
        SpVecView {
            head_inds: self.head_inds,
            tail_inds: self.tail_inds,
            head_vals: self.head_vals,
            tail_vals: self.tail_vals,
        }
    }

    pub fn len(&self) -> usize {
        self.head_inds.len() + self.tail_inds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self, k: usize) -> I {
        self.as_view().index(k)
    }

    pub fn value(&self, k: usize) -> f64 {
        self.as_view().value(k)
    }

    pub fn find_index(&self, ind: I) -> Option<usize> {
        self.as_view().find_index(ind)
    }

    /// Overwrite the value of the `k`-th stored entry.
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.len()`.
    pub fn set_value(&mut self, k: usize, val: f64) {
        if k < self.head_vals.len() {
            self.head_vals[k] = val;
        } else {
            self.tail_vals[k - self.head_vals.len()] = val;
        }
    }

    /// Multiply every stored value by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for v in self.head_vals.iter_mut().chain(self.tail_vals.iter_mut()) {
            *v *= factor;
        }
    }

    /// Divide every stored value by the dense entry at its own index,
    /// `value[k] /= dense[index(k)]`. Every stored index must be within
    /// the dense vector's dimension; a zero dense entry yields an
    /// infinite or NaN value, as plain f64 division does.
    pub fn normalize<D: DenseVector + ?Sized>(&mut self, dense: &D) {
        for (v, &i) in self.head_vals.iter_mut().zip(self.head_inds.iter()) {
            *v /= dense.index(i.index());
        }
        for (v, &i) in self.tail_vals.iter_mut().zip(self.tail_inds.iter()) {
            *v /= dense.index(i.index());
        }
    }
}
