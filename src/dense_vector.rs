//! A read abstraction over dense f64 vectors.
//!
//! The sparse vector reductions take their dense operand through this trait,
//! so callers can pass slices, `Vec`s or 1-D ndarray views interchangeably.

use ndarray::{self, ArrayBase, Ix1};

/// A dense vector of f64 values addressed by position.
pub trait DenseVector {
    /// The dimension of the vector.
    fn dim(&self) -> usize;

    /// Random access to an element.
    ///
    /// # Panics
    ///
    /// If the index is out of bounds.
    fn index(&self, idx: usize) -> f64;
}

impl DenseVector for [f64] {
    fn dim(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn index(&self, idx: usize) -> f64 {
        self[idx]
    }
}

impl<'a> DenseVector for &'a [f64] {
    fn dim(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn index(&self, idx: usize) -> f64 {
        self[idx]
    }
}

impl DenseVector for Vec<f64> {
    fn dim(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn index(&self, idx: usize) -> f64 {
        self[idx]
    }
}

impl<'a> DenseVector for &'a Vec<f64> {
    fn dim(&self) -> usize {
        self.len()
    }

    #[inline(always)]
    fn index(&self, idx: usize) -> f64 {
        self[idx]
    }
}

impl<S> DenseVector for ArrayBase<S, Ix1>
where
    S: ndarray::Data<Elem = f64>,
{
    fn dim(&self) -> usize {
        self.shape()[0]
    }

    #[inline(always)]
    fn index(&self, idx: usize) -> f64 {
        self[[idx]]
    }
}
