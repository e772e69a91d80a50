/*!
# spstore

spstore is a sparse matrix storage engine for Rust.

A matrix is built by appending (row, column, value) triplets and can then
be compressed, on demand and without information loss, into CSR or CSC
form for fast row or column access. Two variants share the same interface:
[`SpMat`] backs its arrays with plain vectors and 32-bit indices, while
[`SpMatHuge`] uses segmented arrays and 64-bit indices to grow past the
32-bit entry-count range.

## Examples

Building a matrix and compressing it

```rust
use spstore::SpMat;
let mut mat = SpMat::new();
mat.add(0, 0, 1.0);
mat.add(0, 2, 3.0);
mat.add(1, 1, 2.0);
mat.create_csr().unwrap();
assert_eq!(mat.nnz(), 3);
assert_eq!(mat.csr_indptr(), Some(&[0, 2, 3][..]));
assert_eq!(mat.csr_col(0, 1), 2);
assert_eq!(mat.csr_value(0, 1), 3.0);
```

Row views and dot products

```rust
use spstore::SpMat;
let mut mat = SpMat::new();
mat.add(0, 1, 2.0);
mat.add(0, 3, -1.0);
mat.add(1, 0, 5.0);
mat.create_csr().unwrap();
let row = mat.csr_row(0).unwrap();
assert_eq!(row.len(), 2);
assert_eq!(row.find_index(3), Some(1));
let dense = vec![1.0, 10.0, 100.0, 1000.0];
assert_eq!(row.dot_acc(&dense, 0.0), 20.0 - 1000.0);
```

Constant-time transpose

```rust
use spstore::{Repr, SpMat, CSC};
let mut mat = SpMat::new();
mat.add(0, 2, 3.0);
mat.create_csr().unwrap();
mat.transpose();
assert_eq!(mat.repr(), Repr::Compressed(CSC));
assert_eq!(mat.csc_row(0, 0), 2);
assert_eq!(mat.csc_value(0, 0), 3.0);
```

*/

pub mod dense_vector;
pub mod errors;
pub mod indexing;
pub mod io;
pub mod mul_acc;
pub mod sparse;
pub mod storage;

pub use crate::dense_vector::DenseVector;
pub use crate::errors::SparseError;
pub use crate::indexing::SpIndex;
pub use crate::io::{
    read_legacy, read_matrix, write_matrix, IoError, LegacySizes, WireIndex,
};
pub use crate::mul_acc::CompensatedAcc;
pub use crate::sparse::CompressedStorage::{CSC, CSR};
pub use crate::sparse::{
    CompressedStorage, Repr, SpMat, SpMatBase, SpMatHuge, SpVecView, SpVecViewMut,
};
pub use crate::storage::{SegVec, SpArray};
