//! Sparse-to-dense conversion.

use ndarray::{Array2, ArrayViewMut, Ix2};

use super::SpMatBase;
use crate::indexing::SpIndex;
use crate::storage::SpArray;

impl<I, IS, DS> SpMatBase<I, IS, DS>
where
    I: SpIndex,
    IS: SpArray<I>,
    DS: SpArray<f64>,
{
    /// Assign every stored entry into a dense array view.
    ///
    /// The view is not zeroed first, so positions without a stored entry
    /// keep their existing values. Entries are read from whichever
    /// representation exists.
    pub fn assign_to_dense(&self, mut array: ArrayViewMut<f64, Ix2>) {
        if self.rows() != array.shape()[0] {
            panic!("Dimension mismatch");
        }
        if self.cols() != array.shape()[1] {
            panic!("Dimension mismatch");
        }
        self.scan_entries(|r, c, v| array[[r, c]] = v);
    }

    /// Materialize as a dense array, with zeros at unstored positions.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut res = Array2::zeros((self.rows(), self.cols()));
        self.assign_to_dense(res.view_mut());
        res
    }
}

#[cfg(test)]
mod test {
    use ndarray::{arr2, Array2};

    use crate::sparse::{SpMat, SpMatHuge};

    fn sample() -> SpMat {
        let mut mat = SpMat::new();
        mat.add(0, 0, 1.0);
        mat.add(0, 2, 3.0);
        mat.add(1, 1, 2.0);
        mat
    }

    #[test]
    fn to_dense_reads_any_representation() {
        let expected = arr2(&[[1.0, 0.0, 3.0], [0.0, 2.0, 0.0]]);

        let mat = sample();
        assert_eq!(mat.to_dense(), expected);

        let mut csr = sample();
        csr.create_csr().unwrap();
        assert_eq!(csr.to_dense(), expected);

        let mut both = sample();
        both.create_csc().unwrap();
        both.create_csr().unwrap();
        assert_eq!(both.to_dense(), expected);
    }

    #[test]
    fn assign_preserves_untouched_positions() {
        let mat = sample();
        let mut dense = Array2::from_elem((2, 3), 9.0);
        mat.assign_to_dense(dense.view_mut());
        let expected = arr2(&[[1.0, 9.0, 3.0], [9.0, 2.0, 9.0]]);
        assert_eq!(dense, expected);
    }

    #[test]
    #[should_panic(expected = "Dimension mismatch")]
    fn assign_rejects_wrong_shape() {
        let mat = sample();
        let mut dense = Array2::zeros((3, 3));
        mat.assign_to_dense(dense.view_mut());
    }

    #[test]
    fn empty_matrix_yields_empty_array() {
        let mat = SpMat::new();
        assert_eq!(mat.to_dense().shape(), &[0, 0]);
    }

    #[test]
    fn huge_variant_converts_too() {
        let mut mat = SpMatHuge::new();
        mat.add(1, 0, -4.0);
        mat.create_csc().unwrap();
        assert_eq!(mat.to_dense(), arr2(&[[0.0], [-4.0]]));
    }
}
