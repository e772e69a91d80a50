//! Storage engine operations: insertion, representation changes, queries.

use std::mem;

use super::compress::{self, DuplicateKey};
use super::utils;
use super::vec::{SpVecView, SpVecViewMut};
use super::{CompressedStorage, CsData, Repr, SpMatBase, Store, TriData};
use crate::errors::SparseError;
use crate::indexing::SpIndex;
use crate::storage::SpArray;

use CompressedStorage::{CSC, CSR};

fn collect<T: Copy, A: SpArray<T>>(arr: &A) -> Vec<T> {
    (0..arr.len()).map(|k| arr.get(k)).collect()
}

fn dup_error(axis: CompressedStorage, dup: DuplicateKey) -> SparseError {
    match axis {
        CSR => SparseError::DoubleEntry {
            row: dup.primary,
            col: dup.secondary,
        },
        CSC => SparseError::DoubleEntry {
            row: dup.secondary,
            col: dup.primary,
        },
    }
}

fn cs_bytes<I, IS, DS>(d: &CsData<I, IS, DS>) -> usize
where
    I: SpIndex,
    IS: SpArray<I>,
    DS: SpArray<f64>,
{
    SpArray::heap_bytes(&d.ptr) + d.inds.heap_bytes() + d.vals.heap_bytes()
}

fn scan_cs<I, IS, DS, F>(axis: CompressedStorage, d: &CsData<I, IS, DS>, f: &mut F)
where
    I: SpIndex,
    IS: SpArray<I>,
    DS: SpArray<f64>,
    F: FnMut(usize, usize, f64),
{
    for o in 0..d.ptr.len() - 1 {
        let lo = d.ptr[o].index();
        let hi = d.ptr[o + 1].index();
        for k in lo..hi {
            let inner = d.inds.get(k).index();
            let (r, c) = match axis {
                CSR => (o, inner),
                CSC => (inner, o),
            };
            f(r, c, d.vals.get(k));
        }
    }
}

impl<I, IS, DS> SpMatBase<I, IS, DS>
where
    I: SpIndex,
    IS: SpArray<I>,
    DS: SpArray<f64>,
{
    /// A fresh empty matrix. Triplet storage is created lazily on the first
    /// [`add`](Self::add).
    pub fn new() -> Self {
        Self {
            nrows: 0,
            ncols: 0,
            added_input: false,
            transposed: false,
            store: Store::Empty,
        }
    }

    /// A fresh empty matrix with triplet storage sized for `nnz` entries.
    pub fn with_capacity(nnz: usize) -> Self {
        Self {
            nrows: 0,
            ncols: 0,
            added_input: false,
            transposed: false,
            store: Store::Triplet(TriData {
                rows: IS::with_capacity(nnz),
                cols: IS::with_capacity(nnz),
                vals: DS::with_capacity(nnz),
            }),
        }
    }

    /// Build a matrix directly in CSR form, validating the structure: the
    /// pointer array must be monotone from zero with length `nrows + 1`,
    /// runs must hold strictly increasing in-bounds column indices, and the
    /// array lengths must cohere.
    pub fn from_csr_parts(
        nrows: usize,
        ncols: usize,
        ptr: Vec<I>,
        inds: IS,
        vals: DS,
    ) -> Result<Self, SparseError> {
        Self::from_cs_parts(CSR, nrows, ncols, ptr, inds, vals)
    }

    /// Build a matrix directly in CSC form; see
    /// [`from_csr_parts`](Self::from_csr_parts).
    pub fn from_csc_parts(
        nrows: usize,
        ncols: usize,
        ptr: Vec<I>,
        inds: IS,
        vals: DS,
    ) -> Result<Self, SparseError> {
        Self::from_cs_parts(CSC, nrows, ncols, ptr, inds, vals)
    }

    fn from_cs_parts(
        axis: CompressedStorage,
        nrows: usize,
        ncols: usize,
        ptr: Vec<I>,
        inds: IS,
        vals: DS,
    ) -> Result<Self, SparseError> {
        let (outer, inner) = match axis {
            CSR => (nrows, ncols),
            CSC => (ncols, nrows),
        };
        utils::check_compressed_structure(inner, outer, &ptr, &inds, &vals)?;
        Ok(Self {
            nrows,
            ncols,
            added_input: false,
            transposed: false,
            store: Store::Compressed(axis, CsData { ptr, inds, vals }),
        })
    }

    /// Build a matrix in triplet form from parallel arrays, validating
    /// lengths and index bounds. Entry order is free and duplicates are
    /// accepted here; they are rejected when a compressed form is built.
    pub fn from_triplet_parts(
        nrows: usize,
        ncols: usize,
        rows: IS,
        cols: IS,
        vals: DS,
    ) -> Result<Self, SparseError> {
        if rows.len() != cols.len() || rows.len() != vals.len() {
            return Err(SparseError::DataIndicesMismatch);
        }
        for k in 0..rows.len() {
            let r = rows.get(k);
            let c = cols.get(k);
            if r < I::zero()
                || c < I::zero()
                || r.index() >= nrows
                || c.index() >= ncols
            {
                return Err(SparseError::OutOfBoundsIndex);
            }
        }
        Ok(Self {
            nrows,
            ncols,
            added_input: true,
            transposed: false,
            store: Store::Triplet(TriData { rows, cols, vals }),
        })
    }

    /// The number of rows: one past the largest row index ever inserted.
    pub fn rows(&self) -> usize {
        self.nrows
    }

    /// The number of columns: one past the largest column index ever
    /// inserted.
    pub fn cols(&self) -> usize {
        self.ncols
    }

    /// The stored entry count, read from whichever representation exists
    /// (CSC preferred, then CSR, then triplet).
    pub fn nnz(&self) -> usize {
        match &self.store {
            Store::Empty => 0,
            Store::Triplet(t) => t.vals.len(),
            Store::Compressed(_, d) => d.vals.len(),
            Store::Both { csc, .. } => csc.vals.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nnz() == 0
    }

    /// The fraction of matrix positions holding a stored entry.
    pub fn density(&self) -> f64 {
        if self.nrows == 0 || self.ncols == 0 {
            return 0.0;
        }
        self.nnz() as f64 / (self.nrows as f64 * self.ncols as f64)
    }

    /// Which representations are currently held.
    pub fn repr(&self) -> Repr {
        match &self.store {
            Store::Empty => Repr::Empty,
            Store::Triplet(_) => Repr::Triplet,
            Store::Compressed(axis, _) => Repr::Compressed(*axis),
            Store::Both { .. } => Repr::Both,
        }
    }

    /// Whether an odd number of transposes has been applied.
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    /// Whether entries were inserted since the last compression. Duplicate
    /// detection runs only when this is set.
    pub fn added_input(&self) -> bool {
        self.added_input
    }

    pub fn has_csr(&self) -> bool {
        self.cs(CSR).is_some()
    }

    pub fn has_csc(&self) -> bool {
        self.cs(CSC).is_some()
    }

    pub fn has_triplet(&self) -> bool {
        matches!(self.store, Store::Triplet(_))
    }

    /// Append an entry at `(row, col)`, growing the dimensions to cover it.
    ///
    /// If only compressed forms exist, the triplet arrays are first
    /// reconstructed from the preferred compressed form and the compressed
    /// forms are dropped, so a mutation can never leave a stale compressed
    /// representation observable.
    pub fn add(&mut self, row: usize, col: usize, val: f64) {
        self.create_triplet();
        match &mut self.store {
            Store::Triplet(t) => {
                t.rows.push(I::from_usize(row));
                t.cols.push(I::from_usize(col));
                t.vals.push(val);
            }
            _ => unreachable!("create_triplet always installs triplet storage"),
        }
        self.nrows = self.nrows.max(row + 1);
        self.ncols = self.ncols.max(col + 1);
        self.added_input = true;
    }

    /// Ensure triplet storage exists. Compressed forms are decompressed
    /// (CSC preferred when both are present) and dropped; the reconstructed
    /// entry order is the compressed order, not the insertion order.
    /// Idempotent.
    pub fn create_triplet(&mut self) {
        let store = mem::replace(&mut self.store, Store::Empty);
        self.store = match store {
            Store::Empty => Store::Triplet(TriData {
                rows: IS::with_capacity(0),
                cols: IS::with_capacity(0),
                vals: DS::with_capacity(0),
            }),
            Store::Triplet(t) => Store::Triplet(t),
            Store::Compressed(axis, d) => Store::Triplet(Self::decompress(axis, d)),
            Store::Both { csc, .. } => Store::Triplet(Self::decompress(CSC, csc)),
        };
    }

    /// Ensure the CSR form exists.
    ///
    /// From triplet storage this dual-key sorts the arrays, rejects
    /// duplicate coordinates if entries were added since the last
    /// compression, compresses the row stream into a pointer array and
    /// discards the triplet arrays. From a CSC-only state the CSR form is
    /// derived from the CSC arrays and both forms are kept. Idempotent.
    ///
    /// On error nothing is installed: an empty matrix reports
    /// [`SparseError::NoData`], a duplicate reports
    /// [`SparseError::DoubleEntry`] and leaves the matrix in a valid
    /// triplet state (entry order unspecified).
    pub fn create_csr(&mut self) -> Result<(), SparseError> {
        self.create_compressed(CSR)
    }

    /// Ensure the CSC form exists; the column-axis mirror of
    /// [`create_csr`](Self::create_csr).
    pub fn create_csc(&mut self) -> Result<(), SparseError> {
        self.create_compressed(CSC)
    }

    fn create_compressed(
        &mut self,
        axis: CompressedStorage,
    ) -> Result<(), SparseError> {
        if self.cs(axis).is_some() {
            return Ok(());
        }
        let store = mem::replace(&mut self.store, Store::Empty);
        match store {
            Store::Empty => Err(SparseError::NoData),
            Store::Triplet(t) if t.vals.is_empty() => {
                self.store = Store::Triplet(t);
                Err(SparseError::NoData)
            }
            Store::Triplet(t) => match self.compress_triplet(axis, t) {
                Ok(d) => {
                    self.store = Store::Compressed(axis, d);
                    self.added_input = false;
                    Ok(())
                }
                Err((t, dup)) => {
                    self.store = Store::Triplet(t);
                    Err(dup_error(axis, dup))
                }
            },
            Store::Compressed(other, existing) => {
                debug_assert_eq!(other, axis.other_storage());
                let derived = self.derive_other(axis, &existing);
                self.store = match axis {
                    CSR => Store::Both {
                        csr: derived,
                        csc: existing,
                    },
                    CSC => Store::Both {
                        csr: existing,
                        csc: derived,
                    },
                };
                Ok(())
            }
            Store::Both { .. } => {
                unreachable!("cs() reported the form as absent")
            }
        }
    }

    fn compress_triplet(
        &self,
        axis: CompressedStorage,
        mut t: TriData<IS, DS>,
    ) -> Result<CsData<I, IS, DS>, (TriData<IS, DS>, DuplicateKey)> {
        let outer = match axis {
            CSR => self.nrows,
            CSC => self.ncols,
        };
        let res = match axis {
            CSR => compress::sort_dual(
                &mut t.rows,
                &mut t.cols,
                &mut t.vals,
                self.added_input,
            ),
            CSC => compress::sort_dual(
                &mut t.cols,
                &mut t.rows,
                &mut t.vals,
                self.added_input,
            ),
        };
        if let Err(dup) = res {
            return Err((t, dup));
        }
        let (prim, inds, vals) = match axis {
            CSR => (t.rows, t.cols, t.vals),
            CSC => (t.cols, t.rows, t.vals),
        };
        let ptr = compress::compress_ptr(&prim, outer);
        Ok(CsData { ptr, inds, vals })
    }

    /// Derive the `axis` form from the other compressed form: clone its
    /// secondary/value arrays, expand its pointer array into the other
    /// primary stream, re-sort on the new axis and compress.
    fn derive_other(
        &self,
        axis: CompressedStorage,
        existing: &CsData<I, IS, DS>,
    ) -> CsData<I, IS, DS> {
        let mut prim: IS = existing.inds.clone();
        let mut sec: IS = compress::expand_ptr(&existing.ptr);
        let mut vals: DS = existing.vals.clone();
        // A compressed form holds no duplicate coordinates; with the check
        // off the sort cannot fail.
        let _ = compress::sort_dual(&mut prim, &mut sec, &mut vals, false);
        let outer = match axis {
            CSR => self.nrows,
            CSC => self.ncols,
        };
        let ptr = compress::compress_ptr(&prim, outer);
        CsData {
            ptr,
            inds: sec,
            vals,
        }
    }

    fn decompress(axis: CompressedStorage, d: CsData<I, IS, DS>) -> TriData<IS, DS> {
        let prim: IS = compress::expand_ptr(&d.ptr);
        match axis {
            CSR => TriData {
                rows: prim,
                cols: d.inds,
                vals: d.vals,
            },
            CSC => TriData {
                rows: d.inds,
                cols: prim,
                vals: d.vals,
            },
        }
    }

    /// Transpose in constant time by relabeling: the dimensions swap, the
    /// triplet row/col arrays swap roles, CSR data becomes CSC data and
    /// vice versa. No array contents move.
    pub fn transpose(&mut self) {
        mem::swap(&mut self.nrows, &mut self.ncols);
        self.transposed = !self.transposed;
        let store = mem::replace(&mut self.store, Store::Empty);
        self.store = match store {
            Store::Empty => Store::Empty,
            Store::Triplet(t) => Store::Triplet(TriData {
                rows: t.cols,
                cols: t.rows,
                vals: t.vals,
            }),
            Store::Compressed(axis, d) => {
                Store::Compressed(axis.other_storage(), d)
            }
            Store::Both { csr, csc } => Store::Both { csr: csc, csc: csr },
        };
    }

    /// Reset to the fresh empty state: no entries, no arrays, zero
    /// dimensions, flags cleared.
    pub fn clear(&mut self) {
        self.nrows = 0;
        self.ncols = 0;
        self.added_input = false;
        self.transposed = false;
        self.store = Store::Empty;
    }

    /// Drop the CSR form. If it was the only representation the matrix
    /// becomes empty; this exists to release memory when the caller keeps
    /// working from another form.
    pub fn clear_csr(&mut self) {
        self.clear_compressed(CSR);
    }

    /// Drop the CSC form; see [`clear_csr`](Self::clear_csr).
    pub fn clear_csc(&mut self) {
        self.clear_compressed(CSC);
    }

    fn clear_compressed(&mut self, axis: CompressedStorage) {
        let store = mem::replace(&mut self.store, Store::Empty);
        self.store = match store {
            Store::Compressed(a, d) if a != axis => Store::Compressed(a, d),
            Store::Compressed(_, _) => Store::Empty,
            Store::Both { csr, csc } => match axis {
                CSR => Store::Compressed(CSC, csc),
                CSC => Store::Compressed(CSR, csr),
            },
            other => other,
        };
    }

    fn cs(&self, axis: CompressedStorage) -> Option<&CsData<I, IS, DS>> {
        match (&self.store, axis) {
            (Store::Compressed(a, d), _) if *a == axis => Some(d),
            (Store::Both { csr, .. }, CSR) => Some(csr),
            (Store::Both { csc, .. }, CSC) => Some(csc),
            _ => None,
        }
    }

    fn cs_mut(&mut self, axis: CompressedStorage) -> Option<&mut CsData<I, IS, DS>> {
        match (&mut self.store, axis) {
            (Store::Compressed(a, d), _) if *a == axis => Some(d),
            (Store::Both { csr, .. }, CSR) => Some(csr),
            (Store::Both { csc, .. }, CSC) => Some(csc),
            _ => None,
        }
    }

    /// Number of entries stored in row `row` of the CSR form, or `-1` if
    /// the form is absent or `row` is out of range.
    pub fn csr_vec_len(&self, row: usize) -> I {
        self.run_len(CSR, row)
    }

    /// Number of entries stored in column `col` of the CSC form, or `-1`.
    pub fn csc_vec_len(&self, col: usize) -> I {
        self.run_len(CSC, col)
    }

    /// Column index of the `k`-th entry of CSR row `row`, or `-1` when out
    /// of range.
    pub fn csr_col(&self, row: usize, k: usize) -> I {
        self.run_index(CSR, row, k)
    }

    /// Row index of the `k`-th entry of CSC column `col`, or `-1`.
    pub fn csc_row(&self, col: usize, k: usize) -> I {
        self.run_index(CSC, col, k)
    }

    /// Value of the `k`-th entry of CSR row `row`, or `-1.0` when out of
    /// range. A stored `-1.0` is indistinguishable from the sentinel;
    /// callers needing that distinction should check
    /// [`csr_vec_len`](Self::csr_vec_len) first.
    pub fn csr_value(&self, row: usize, k: usize) -> f64 {
        self.run_value(CSR, row, k)
    }

    /// Value of the `k`-th entry of CSC column `col`, or `-1.0`.
    pub fn csc_value(&self, col: usize, k: usize) -> f64 {
        self.run_value(CSC, col, k)
    }

    fn run_span(&self, axis: CompressedStorage, outer: usize) -> Option<(usize, usize)> {
        let d = self.cs(axis)?;
        if outer + 1 >= d.ptr.len() {
            return None;
        }
        Some((d.ptr[outer].index(), d.ptr[outer + 1].index()))
    }

    fn run_len(&self, axis: CompressedStorage, outer: usize) -> I {
        match self.run_span(axis, outer) {
            Some((lo, hi)) => I::from_usize(hi - lo),
            None => I::sentinel(),
        }
    }

    fn run_index(&self, axis: CompressedStorage, outer: usize, k: usize) -> I {
        match self.run_span(axis, outer) {
            Some((lo, hi)) if k < hi - lo => {
                self.cs(axis).map_or(I::sentinel(), |d| d.inds.get(lo + k))
            }
            _ => I::sentinel(),
        }
    }

    fn run_value(&self, axis: CompressedStorage, outer: usize, k: usize) -> f64 {
        match self.run_span(axis, outer) {
            Some((lo, hi)) if k < hi - lo => {
                self.cs(axis).map_or(-1.0, |d| d.vals.get(lo + k))
            }
            _ => -1.0,
        }
    }

    /// Overwrite the value of the `k`-th entry of CSR row `row`. Returns
    /// `false` if the form is absent or the position is out of range.
    pub fn set_csr_value(&mut self, row: usize, k: usize, val: f64) -> bool {
        self.set_run_value(CSR, row, k, val)
    }

    /// Overwrite the value of the `k`-th entry of CSC column `col`.
    pub fn set_csc_value(&mut self, col: usize, k: usize, val: f64) -> bool {
        self.set_run_value(CSC, col, k, val)
    }

    /// Overwrite the column index of the `k`-th entry of CSR row `row`.
    ///
    /// This breaks the row's ordering invariant; call
    /// [`sort_csr_row`](Self::sort_csr_row) before order-dependent queries
    /// such as [`SpVecView::find_index`]. The new index is not checked
    /// against the matrix dimensions.
    pub fn set_csr_col(&mut self, row: usize, k: usize, col: usize) -> bool {
        self.set_run_index(CSR, row, k, col)
    }

    /// Overwrite the row index of the `k`-th entry of CSC column `col`;
    /// see [`set_csr_col`](Self::set_csr_col).
    pub fn set_csc_row(&mut self, col: usize, k: usize, row: usize) -> bool {
        self.set_run_index(CSC, col, k, row)
    }

    fn set_run_value(
        &mut self,
        axis: CompressedStorage,
        outer: usize,
        k: usize,
        val: f64,
    ) -> bool {
        match self.run_span(axis, outer) {
            Some((lo, hi)) if k < hi - lo => {
                if let Some(d) = self.cs_mut(axis) {
                    d.vals.set(lo + k, val);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    fn set_run_index(
        &mut self,
        axis: CompressedStorage,
        outer: usize,
        k: usize,
        ind: usize,
    ) -> bool {
        match self.run_span(axis, outer) {
            Some((lo, hi)) if k < hi - lo => {
                if let Some(d) = self.cs_mut(axis) {
                    d.inds.set(lo + k, I::from_usize(ind));
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Re-sort row `row` of the CSR form by column index after index
    /// edits. Returns `false` if the form is absent or `row` is out of
    /// range.
    pub fn sort_csr_row(&mut self, row: usize) -> bool {
        self.sort_run(CSR, row)
    }

    /// Re-sort column `col` of the CSC form by row index.
    pub fn sort_csc_col(&mut self, col: usize) -> bool {
        self.sort_run(CSC, col)
    }

    fn sort_run(&mut self, axis: CompressedStorage, outer: usize) -> bool {
        match self.run_span(axis, outer) {
            Some((lo, hi)) => {
                if let Some(d) = self.cs_mut(axis) {
                    let CsData { inds, vals, .. } = d;
                    compress::sort_by_key(inds, lo, hi, |a, b, n| {
                        vals.swap_range(a, b, n)
                    });
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    /// A zero-copy view of row `row` of the CSR form, or `None` if the
    /// form is absent or `row` is out of range.
    pub fn csr_row(&self, row: usize) -> Option<SpVecView<'_, I>> {
        self.run_view(CSR, row)
    }

    /// A zero-copy view of column `col` of the CSC form, or `None`.
    pub fn csc_col(&self, col: usize) -> Option<SpVecView<'_, I>> {
        self.run_view(CSC, col)
    }

    /// A value-mutable view of row `row` of the CSR form, or `None`.
    pub fn csr_row_mut(&mut self, row: usize) -> Option<SpVecViewMut<'_, I>> {
        self.run_view_mut(CSR, row)
    }

    /// A value-mutable view of column `col` of the CSC form, or `None`.
    pub fn csc_col_mut(&mut self, col: usize) -> Option<SpVecViewMut<'_, I>> {
        self.run_view_mut(CSC, col)
    }

    fn run_view(&self, axis: CompressedStorage, outer: usize) -> Option<SpVecView<'_, I>> {
        let (lo, hi) = self.run_span(axis, outer)?;
        let d = self.cs(axis)?;
        let (ih, it) = d.inds.range_parts(lo, hi - lo);
        let (vh, vt) = d.vals.range_parts(lo, hi - lo);
        Some(SpVecView::new(ih, it, vh, vt))
    }

    fn run_view_mut(
        &mut self,
        axis: CompressedStorage,
        outer: usize,
    ) -> Option<SpVecViewMut<'_, I>> {
        let (lo, hi) = self.run_span(axis, outer)?;
        let d = self.cs_mut(axis)?;
        let CsData { inds, vals, .. } = d;
        let (ih, it) = inds.range_parts(lo, hi - lo);
        let (vh, vt) = vals.range_parts_mut(lo, hi - lo);
        Some(SpVecViewMut::new(ih, it, vh, vt))
    }

    /// Create the CSR form if needed and materialize one view per row.
    pub fn csr_views(&mut self) -> Result<Vec<SpVecView<'_, I>>, SparseError> {
        self.create_csr()?;
        Ok(self.all_views(CSR))
    }

    /// Create the CSC form if needed and materialize one view per column.
    pub fn csc_views(&mut self) -> Result<Vec<SpVecView<'_, I>>, SparseError> {
        self.create_csc()?;
        Ok(self.all_views(CSC))
    }

    fn all_views(&self, axis: CompressedStorage) -> Vec<SpVecView<'_, I>> {
        let d = match self.cs(axis) {
            Some(d) => d,
            None => return Vec::new(),
        };
        let outer = d.ptr.len() - 1;
        let mut views = Vec::with_capacity(outer);
        for o in 0..outer {
            let lo = d.ptr[o].index();
            let hi = d.ptr[o + 1].index();
            let (ih, it) = d.inds.range_parts(lo, hi - lo);
            let (vh, vt) = d.vals.range_parts(lo, hi - lo);
            views.push(SpVecView::new(ih, it, vh, vt));
        }
        views
    }

    /// The CSR pointer array, or `None` if the form is absent.
    pub fn csr_indptr(&self) -> Option<&[I]> {
        self.cs(CSR).map(|d| &d.ptr[..])
    }

    /// The CSC pointer array, or `None` if the form is absent.
    pub fn csc_indptr(&self) -> Option<&[I]> {
        self.cs(CSC).map(|d| &d.ptr[..])
    }

    /// Owned copies of the CSR arrays `(pointers, column indices, values)`.
    pub fn csr_components(&self) -> Option<(Vec<I>, Vec<I>, Vec<f64>)> {
        self.cs_components(CSR)
    }

    /// Owned copies of the CSC arrays `(pointers, row indices, values)`.
    pub fn csc_components(&self) -> Option<(Vec<I>, Vec<I>, Vec<f64>)> {
        self.cs_components(CSC)
    }

    fn cs_components(&self, axis: CompressedStorage) -> Option<(Vec<I>, Vec<I>, Vec<f64>)> {
        let d = self.cs(axis)?;
        Some((d.ptr.clone(), collect(&d.inds), collect(&d.vals)))
    }

    /// Owned copies of the triplet arrays `(rows, cols, values)` in their
    /// current order, or `None` if triplet storage is absent.
    pub fn triplet_components(&self) -> Option<(Vec<I>, Vec<I>, Vec<f64>)> {
        match &self.store {
            Store::Triplet(t) => {
                Some((collect(&t.rows), collect(&t.cols), collect(&t.vals)))
            }
            _ => None,
        }
    }

    /// Approximate heap bytes held by all live backing arrays.
    pub fn allocated_bytes(&self) -> usize {
        match &self.store {
            Store::Empty => 0,
            Store::Triplet(t) => {
                t.rows.heap_bytes() + t.cols.heap_bytes() + t.vals.heap_bytes()
            }
            Store::Compressed(_, d) => cs_bytes(d),
            Store::Both { csr, csc } => cs_bytes(csr) + cs_bytes(csc),
        }
    }

    /// Visit every stored entry as `(row, col, value)`, read from whichever
    /// representation exists (CSC preferred, then CSR, then triplet).
    pub(crate) fn scan_entries<F: FnMut(usize, usize, f64)>(&self, mut f: F) {
        match &self.store {
            Store::Empty => {}
            Store::Triplet(t) => {
                for k in 0..t.vals.len() {
                    f(
                        t.rows.get(k).index(),
                        t.cols.get(k).index(),
                        t.vals.get(k),
                    );
                }
            }
            Store::Compressed(axis, d) => scan_cs(*axis, d, &mut f),
            Store::Both { csc, .. } => scan_cs(CSC, csc, &mut f),
        }
    }

    pub(crate) fn cs_parts(
        &self,
        axis: CompressedStorage,
    ) -> Option<(&[I], &IS, &DS)> {
        self.cs(axis).map(|d| (&d.ptr[..], &d.inds, &d.vals))
    }

    pub(crate) fn triplet_parts(&self) -> Option<(&IS, &IS, &DS)> {
        match &self.store {
            Store::Triplet(t) => Some((&t.rows, &t.cols, &t.vals)),
            _ => None,
        }
    }

    pub(crate) fn set_state_flags(&mut self, added_input: bool, transposed: bool) {
        self.added_input = added_input;
        self.transposed = transposed;
    }
}

impl<I, IS, DS> Default for SpMatBase<I, IS, DS>
where
    I: SpIndex,
    IS: SpArray<I>,
    DS: SpArray<f64>,
{
    fn default() -> Self {
        Self::new()
    }
}
