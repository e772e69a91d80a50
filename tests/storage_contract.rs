//! End-to-end checks of the storage engine contract through the public API.

use std::collections::BTreeMap;

use approx::assert_abs_diff_eq;
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use spstore::{read_matrix, write_matrix, Repr, SegVec, SpArray, SpMat, SpMatHuge};

#[test]
fn standard_and_huge_agree_on_identical_inserts() {
    let entries = [
        (0usize, 0usize, 1.0),
        (0, 2, 3.0),
        (1, 1, 2.0),
        (4, 0, -1.5),
        (2, 3, 0.25),
    ];
    let mut std_mat = SpMat::new();
    let mut huge_mat = SpMatHuge::new();
    for &(r, c, v) in &entries {
        std_mat.add(r, c, v);
        huge_mat.add(r, c, v);
    }
    std_mat.create_csr().unwrap();
    huge_mat.create_csr().unwrap();

    assert_eq!(std_mat.nnz(), huge_mat.nnz());
    assert_eq!(std_mat.rows(), huge_mat.rows());
    assert_eq!(std_mat.cols(), huge_mat.cols());
    for row in 0..std_mat.rows() + 1 {
        assert_eq!(
            i64::from(std_mat.csr_vec_len(row)),
            huge_mat.csr_vec_len(row)
        );
        for k in 0..3 {
            assert_eq!(i64::from(std_mat.csr_col(row, k)), huge_mat.csr_col(row, k));
            assert_eq!(std_mat.csr_value(row, k), huge_mat.csr_value(row, k));
        }
    }

    std_mat.transpose();
    huge_mat.transpose();
    std_mat.create_csc().unwrap();
    huge_mat.create_csc().unwrap();
    assert_eq!(std_mat.to_dense(), huge_mat.to_dense());
}

#[test]
fn views_straddle_segment_boundaries() {
    // Short segments force the first row's run to span two segments.
    let mut inds: SegVec<i64> = SegVec::with_seg_len(4);
    let mut vals: SegVec<f64> = SegVec::with_seg_len(4);
    for (i, v) in [(0i64, 1.0), (2, 2.0), (3, 3.0), (5, 4.0), (7, 5.0), (8, 6.0)] {
        inds.push(i);
        vals.push(v);
    }
    let mat = spstore::SpMatBase::<i64, _, _>::from_csr_parts(
        2,
        9,
        vec![0i64, 6, 6],
        inds,
        vals,
    )
    .unwrap();

    let row = mat.csr_row(0).unwrap();
    assert_eq!(row.len(), 6);
    assert_eq!(row.index(3), 5);
    assert_eq!(row.value(3), 4.0);
    assert_eq!(row.index(5), 8);
    assert_eq!(row.find_index(7), Some(4));
    assert_eq!(row.find_index(6), None);
    assert_eq!(row.sum(), 21.0);
    // Entries at indices 0, 2 and 3 lie below the bound of 4.
    assert_eq!(row.sum_of_squares_below(4), 1.0 + 4.0 + 9.0);
    let dense = vec![1.0; 9];
    assert_eq!(row.dot_acc(&dense, 0.0), 21.0);
    assert_eq!(mat.csr_row(1).unwrap().len(), 0);
}

#[test]
fn lifecycle_with_persistence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lifecycle.bin");

    let mut mat = SpMat::new();
    mat.add(0, 0, 1.0);
    mat.add(0, 2, 3.0);
    mat.add(1, 1, 2.0);
    mat.create_csr().unwrap();
    mat.create_csc().unwrap();
    mat.create_triplet();
    mat.create_csc().unwrap();
    write_matrix(&path, &mat).unwrap();

    let back: SpMat = read_matrix(&path).unwrap();
    assert_eq!(back.repr(), Repr::Compressed(spstore::CSC));
    assert_eq!(back.to_dense(), mat.to_dense());
    assert_eq!(back.nnz(), 3);
}

#[test]
fn randomized_inserts_match_a_dense_oracle() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let (nrows, ncols) = (23usize, 17usize);

    let mut oracle: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    let mut mat = SpMat::new();
    let mut huge = SpMatHuge::new();
    while oracle.len() < 150 {
        let r = rng.random_range(0..nrows);
        let c = rng.random_range(0..ncols);
        let v = rng.random::<f64>() - 0.5;
        if oracle.contains_key(&(r, c)) {
            continue;
        }
        oracle.insert((r, c), v);
        mat.add(r, c, v);
        huge.add(r, c, v);
    }
    // Dimensions track the largest inserted coordinate, not the grid.
    assert!(mat.rows() <= nrows && mat.cols() <= ncols);

    let mut dense = Array2::zeros((mat.rows(), mat.cols()));
    for (&(r, c), &v) in &oracle {
        dense[[r, c]] = v;
    }

    mat.create_csr().unwrap();
    assert_eq!(mat.to_dense(), dense);
    mat.create_csc().unwrap();
    assert_eq!(mat.to_dense(), dense);
    huge.create_csc().unwrap();
    assert_eq!(huge.to_dense(), dense);

    // Sortedness within every row run.
    for row in 0..mat.rows() {
        let view = mat.csr_row(row).unwrap();
        for k in 1..view.len() {
            assert!(view.index(k - 1) < view.index(k));
        }
        let row_sum: f64 = dense.row(row).sum();
        assert_abs_diff_eq!(view.sum(), row_sum, epsilon = 1e-12);
    }
    for col in 0..mat.cols() {
        let view = mat.csc_col(col).unwrap();
        let col_sum: f64 = dense.column(col).sum();
        assert_abs_diff_eq!(view.sum(), col_sum, epsilon = 1e-12);
    }

    // Triplet reconstruction holds the same multiset.
    mat.create_triplet();
    let (rows, cols, vals) = mat.triplet_components().unwrap();
    assert_eq!(rows.len(), oracle.len());
    for ((r, c), v) in rows.iter().zip(&cols).zip(&vals) {
        assert_eq!(oracle.get(&(*r as usize, *c as usize)), Some(v));
    }

    // Transposing matches the transposed oracle.
    mat.create_csc().unwrap();
    mat.transpose();
    assert_eq!(mat.to_dense(), dense.t());
}
