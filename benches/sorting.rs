#[macro_use]
extern crate bencher;
extern crate spstore;

use bencher::Bencher;
use spstore::{SpMat, SpMatHuge};

// 50k entries over a 50 x 997 grid, unique by construction and inserted
// far from sorted order.
fn scattered_standard() -> SpMat {
    let mut mat = SpMat::new();
    for k in 0..50_000usize {
        let row = k / 997;
        let col = (k * 31) % 997;
        mat.add(row, col, k as f64);
    }
    mat
}

fn scattered_huge() -> SpMatHuge {
    let mut mat = SpMatHuge::new();
    for k in 0..50_000usize {
        let row = k / 997;
        let col = (k * 31) % 997;
        mat.add(row, col, k as f64);
    }
    mat
}

fn compress_triplet_to_csr(bench: &mut Bencher) {
    let mat = scattered_standard();
    bench.iter(|| {
        let mut m = mat.clone();
        m.create_csr().unwrap();
        m
    });
}

fn compress_triplet_to_csr_huge(bench: &mut Bencher) {
    let mat = scattered_huge();
    bench.iter(|| {
        let mut m = mat.clone();
        m.create_csr().unwrap();
        m
    });
}

fn derive_csc_from_csr(bench: &mut Bencher) {
    let mut mat = scattered_standard();
    mat.create_csr().unwrap();
    bench.iter(|| {
        let mut m = mat.clone();
        m.create_csc().unwrap();
        m
    });
}

fn row_dot_dense(bench: &mut Bencher) {
    let mut mat = scattered_standard();
    mat.create_csr().unwrap();
    let dense = vec![0.5; 997];
    bench.iter(|| {
        let mut acc = 0.0;
        for row in 0..mat.rows() {
            acc = mat.csr_row(row).unwrap().dot_acc(&dense, acc);
        }
        acc
    });
}

fn row_dot_dense_compensated(bench: &mut Bencher) {
    let mut mat = scattered_standard();
    mat.create_csr().unwrap();
    let dense = vec![0.5; 997];
    bench.iter(|| {
        let mut acc = 0.0;
        for row in 0..mat.rows() {
            acc = mat.csr_row(row).unwrap().dot_acc_compensated(&dense, acc);
        }
        acc
    });
}

benchmark_group!(
    benches,
    compress_triplet_to_csr,
    compress_triplet_to_csr_huge,
    derive_csc_from_csr,
    row_dot_dense,
    row_dot_dense_compensated
);
benchmark_main!(benches);
