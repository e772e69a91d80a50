//! Binary persistence for sparse matrices.
//!
//! A matrix file holds, in little-endian order:
//!
//! ```text
//! i32      nrows
//! i32      ncols
//! u8       added_input flag
//! u8       transposed flag
//! u32/utf8 representation tag, "CSC" | "CSR" | "TRIPLET"
//! arrays   the tagged representation, each as an i64 length
//!          followed by that many elements
//! ```
//!
//! Exactly one representation is written, the first present in preference
//! order CSC, CSR, triplet. Indices are stored at the matrix variant's
//! native width (`i32` standard, `i64` huge, pointer arrays included) and
//! values as `f64` bits, so a file must be read back through the same
//! variant that wrote it. Reading reconstructs only the tagged
//! representation; callers wanting another form convert afterward.
//!
//! [`read_legacy`] additionally consumes an older two-file layout from
//! earlier tomography tooling: a sidecar of five `i64` totals and a
//! row-length-prefixed entry stream, converted directly into CSR form.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::errors::SparseError;
use crate::indexing::SpIndex;
use crate::sparse::compress;
use crate::sparse::CompressedStorage::{CSC, CSR};
use crate::sparse::SpMatBase;
use crate::storage::SpArray;

const TAG_CSC: &str = "CSC";
const TAG_CSR: &str = "CSR";
const TAG_TRIPLET: &str = "TRIPLET";

const MAX_TAG_LEN: usize = 16;

#[derive(Debug)]
pub enum IoError {
    Io(io::Error),
    /// The file's representation tag is none of the known ones.
    BadTag(String),
    /// The decoded arrays do not form a valid representation.
    BadStructure(SparseError),
    /// A legacy size file announces a different entry total than the
    /// entry stream actually holds.
    LegacyCountMismatch { expected: i64, found: i64 },
    /// The matrix dimensions do not fit the header's 32-bit fields.
    DimTooLarge,
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            IoError::Io(err) => err.fmt(f),
            IoError::BadTag(tag) => {
                write!(f, "unrecognized representation tag {:?}", tag)
            }
            IoError::BadStructure(err) => {
                write!(f, "invalid matrix structure: {}", err)
            }
            IoError::LegacyCountMismatch { expected, found } => write!(
                f,
                "legacy size file announces {} entries, data holds {}",
                expected, found
            ),
            IoError::DimTooLarge => {
                write!(f, "matrix dimensions exceed the header's 32-bit range")
            }
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::Io(err) => Some(err),
            IoError::BadStructure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for IoError {
    fn from(err: io::Error) -> IoError {
        IoError::Io(err)
    }
}

/// `Io` members never compare equal; the wrapped error is opaque.
impl PartialEq for IoError {
    fn eq(&self, rhs: &IoError) -> bool {
        match (self, rhs) {
            (IoError::BadTag(a), IoError::BadTag(b)) => a == b,
            (IoError::BadStructure(a), IoError::BadStructure(b)) => a == b,
            (
                IoError::LegacyCountMismatch {
                    expected: a,
                    found: b,
                },
                IoError::LegacyCountMismatch {
                    expected: c,
                    found: d,
                },
            ) => a == c && b == d,
            (IoError::DimTooLarge, IoError::DimTooLarge) => true,
            _ => false,
        }
    }
}

/// The totals carried by a legacy size file, in file order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegacySizes {
    pub max_row: i64,
    pub max_col: i64,
    pub entries: i64,
    pub observations: i64,
    pub grid_nodes: i64,
}

/// An index type with a fixed on-disk encoding.
pub trait WireIndex: SpIndex {
    fn write_to<W: Write>(self, w: &mut W) -> io::Result<()>;
    fn read_from<R: Read>(r: &mut R) -> io::Result<Self>;
}

impl WireIndex for i32 {
    fn write_to<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.to_le_bytes())
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(i32::from_le_bytes(read_bytes(r)?))
    }
}

impl WireIndex for i64 {
    fn write_to<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.to_le_bytes())
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(i64::from_le_bytes(read_bytes(r)?))
    }
}

fn read_bytes<R: Read, const N: usize>(r: &mut R) -> io::Result<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_u8<R: Read>(r: &mut R) -> io::Result<u8> {
    Ok(read_bytes::<R, 1>(r)?[0])
}

fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    Ok(u32::from_le_bytes(read_bytes(r)?))
}

fn read_i32<R: Read>(r: &mut R) -> io::Result<i32> {
    Ok(i32::from_le_bytes(read_bytes(r)?))
}

fn read_i64<R: Read>(r: &mut R) -> io::Result<i64> {
    Ok(i64::from_le_bytes(read_bytes(r)?))
}

fn read_f64<R: Read>(r: &mut R) -> io::Result<f64> {
    Ok(f64::from_le_bytes(read_bytes(r)?))
}

fn read_len<R: Read>(r: &mut R) -> Result<usize, IoError> {
    let len = read_i64(r)?;
    usize::try_from(len).map_err(|_| IoError::BadStructure(SparseError::BadNnzCount))
}

fn read_tag<R: Read>(r: &mut R) -> Result<String, IoError> {
    let len = read_u32(r)? as usize;
    if len > MAX_TAG_LEN {
        return Err(IoError::BadTag(format!("tag of length {}", len)));
    }
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_tag<W: Write>(w: &mut W, tag: &str) -> io::Result<()> {
    w.write_all(&(tag.len() as u32).to_le_bytes())?;
    w.write_all(tag.as_bytes())
}

fn write_index_slice<W: Write, I: WireIndex>(w: &mut W, arr: &[I]) -> io::Result<()> {
    w.write_all(&(arr.len() as i64).to_le_bytes())?;
    for &x in arr {
        x.write_to(w)?;
    }
    Ok(())
}

fn write_index_array<W, I, A>(w: &mut W, arr: &A) -> io::Result<()>
where
    W: Write,
    I: WireIndex,
    A: SpArray<I>,
{
    w.write_all(&(arr.len() as i64).to_le_bytes())?;
    for k in 0..arr.len() {
        arr.get(k).write_to(w)?;
    }
    Ok(())
}

fn write_value_array<W: Write, A: SpArray<f64>>(w: &mut W, arr: &A) -> io::Result<()> {
    w.write_all(&(arr.len() as i64).to_le_bytes())?;
    for k in 0..arr.len() {
        w.write_all(&arr.get(k).to_le_bytes())?;
    }
    Ok(())
}

fn read_index_vec<R: Read, I: WireIndex>(r: &mut R) -> Result<Vec<I>, IoError> {
    let len = read_len(r)?;
    let mut arr = Vec::with_capacity(len);
    for _ in 0..len {
        arr.push(I::read_from(r)?);
    }
    Ok(arr)
}

fn read_index_array<R, I, A>(r: &mut R) -> Result<A, IoError>
where
    R: Read,
    I: WireIndex,
    A: SpArray<I>,
{
    let len = read_len(r)?;
    let mut arr = A::with_capacity(len);
    for _ in 0..len {
        arr.push(I::read_from(r)?);
    }
    Ok(arr)
}

fn read_value_array<R: Read, A: SpArray<f64>>(r: &mut R) -> Result<A, IoError> {
    let len = read_len(r)?;
    let mut arr = A::with_capacity(len);
    for _ in 0..len {
        arr.push(read_f64(r)?);
    }
    Ok(arr)
}

/// Write `mat` to `path`, persisting the first representation present in
/// preference order CSC, CSR, triplet.
///
/// A matrix holding no representation at all cannot be persisted and
/// reports [`SparseError::NoData`] through
/// [`BadStructure`](IoError::BadStructure).
pub fn write_matrix<I, IS, DS, P>(
    path: P,
    mat: &SpMatBase<I, IS, DS>,
) -> Result<(), IoError>
where
    I: WireIndex,
    IS: SpArray<I>,
    DS: SpArray<f64>,
    P: AsRef<Path>,
{
    let f = File::create(path.as_ref())?;
    let mut w = BufWriter::new(f);

    let nrows = i32::try_from(mat.rows()).map_err(|_| IoError::DimTooLarge)?;
    let ncols = i32::try_from(mat.cols()).map_err(|_| IoError::DimTooLarge)?;
    w.write_all(&nrows.to_le_bytes())?;
    w.write_all(&ncols.to_le_bytes())?;
    w.write_all(&[mat.added_input() as u8, mat.is_transposed() as u8])?;

    if let Some((ptr, inds, vals)) = mat.cs_parts(CSC) {
        write_tag(&mut w, TAG_CSC)?;
        write_index_slice(&mut w, ptr)?;
        write_index_array(&mut w, inds)?;
        write_value_array(&mut w, vals)?;
    } else if let Some((ptr, inds, vals)) = mat.cs_parts(CSR) {
        write_tag(&mut w, TAG_CSR)?;
        write_index_slice(&mut w, ptr)?;
        write_index_array(&mut w, inds)?;
        write_value_array(&mut w, vals)?;
    } else if let Some((rows, cols, vals)) = mat.triplet_parts() {
        write_tag(&mut w, TAG_TRIPLET)?;
        write_index_array(&mut w, rows)?;
        write_index_array(&mut w, cols)?;
        write_value_array(&mut w, vals)?;
    } else {
        return Err(IoError::BadStructure(SparseError::NoData));
    }
    w.flush()?;
    Ok(())
}

/// Read a matrix written by [`write_matrix`], restoring the dimensions,
/// the state flags and exactly the persisted representation. The arrays
/// pass through the same validation as the checked constructors.
pub fn read_matrix<I, IS, DS, P>(path: P) -> Result<SpMatBase<I, IS, DS>, IoError>
where
    I: WireIndex,
    IS: SpArray<I>,
    DS: SpArray<f64>,
    P: AsRef<Path>,
{
    let f = File::open(path.as_ref())?;
    let mut r = BufReader::new(f);

    let nrows = read_i32(&mut r)?;
    let ncols = read_i32(&mut r)?;
    let nrows = usize::try_from(nrows)
        .map_err(|_| IoError::BadStructure(SparseError::OutOfBoundsIndex))?;
    let ncols = usize::try_from(ncols)
        .map_err(|_| IoError::BadStructure(SparseError::OutOfBoundsIndex))?;
    let added_input = read_u8(&mut r)? != 0;
    let transposed = read_u8(&mut r)? != 0;

    let tag = read_tag(&mut r)?;
    let mut mat = match tag.as_str() {
        TAG_CSC => {
            let ptr = read_index_vec(&mut r)?;
            let inds = read_index_array(&mut r)?;
            let vals = read_value_array(&mut r)?;
            SpMatBase::from_csc_parts(nrows, ncols, ptr, inds, vals)
                .map_err(IoError::BadStructure)?
        }
        TAG_CSR => {
            let ptr = read_index_vec(&mut r)?;
            let inds = read_index_array(&mut r)?;
            let vals = read_value_array(&mut r)?;
            SpMatBase::from_csr_parts(nrows, ncols, ptr, inds, vals)
                .map_err(IoError::BadStructure)?
        }
        TAG_TRIPLET => {
            let rows = read_index_array(&mut r)?;
            let cols = read_index_array(&mut r)?;
            let vals = read_value_array(&mut r)?;
            SpMatBase::from_triplet_parts(nrows, ncols, rows, cols, vals)
                .map_err(IoError::BadStructure)?
        }
        _ => return Err(IoError::BadTag(tag)),
    };
    mat.set_state_flags(added_input, transposed);
    Ok(mat)
}

/// Load the legacy two-file layout directly into CSR form.
///
/// `sizes_path` holds five `i64` totals, `[max_row, max_col, entries,
/// observations, grid_nodes]`, returned to the caller as [`LegacySizes`].
/// `entries_path` holds one record per row, `max_row` records in all: an
/// `i32` entry count, that many `i32` column indices, then that many `f64`
/// values. The legacy stream is always 32-bit; the loaded matrix may still
/// use the huge variant.
///
/// Rows whose column indices arrive out of order are sorted during the
/// load. An entry total disagreeing with the stream is reported as
/// [`LegacyCountMismatch`](IoError::LegacyCountMismatch); duplicate or
/// out-of-range columns surface as
/// [`BadStructure`](IoError::BadStructure).
pub fn read_legacy<I, IS, DS, P1, P2>(
    entries_path: P1,
    sizes_path: P2,
) -> Result<(SpMatBase<I, IS, DS>, LegacySizes), IoError>
where
    I: WireIndex,
    IS: SpArray<I>,
    DS: SpArray<f64>,
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let f = File::open(sizes_path.as_ref())?;
    let mut r = BufReader::new(f);
    let sizes = LegacySizes {
        max_row: read_i64(&mut r)?,
        max_col: read_i64(&mut r)?,
        entries: read_i64(&mut r)?,
        observations: read_i64(&mut r)?,
        grid_nodes: read_i64(&mut r)?,
    };
    let nrows = usize::try_from(sizes.max_row)
        .map_err(|_| IoError::BadStructure(SparseError::OutOfBoundsIndex))?;
    let ncols = usize::try_from(sizes.max_col)
        .map_err(|_| IoError::BadStructure(SparseError::OutOfBoundsIndex))?;

    let f = File::open(entries_path.as_ref())?;
    let mut r = BufReader::new(f);
    let reserve = usize::try_from(sizes.entries).unwrap_or(0);
    let mut ptr: Vec<I> = Vec::with_capacity(nrows + 1);
    ptr.push(I::zero());
    let mut inds = IS::with_capacity(reserve);
    let mut vals = DS::with_capacity(reserve);
    let mut total = 0i64;
    for _ in 0..nrows {
        let count = read_i32(&mut r)?;
        let count = usize::try_from(count)
            .map_err(|_| IoError::BadStructure(SparseError::BadNnzCount))?;
        let start = inds.len();
        for _ in 0..count {
            let col = usize::try_from(read_i32(&mut r)?)
                .map_err(|_| IoError::BadStructure(SparseError::OutOfBoundsIndex))?;
            inds.push(I::from_usize(col));
        }
        for _ in 0..count {
            vals.push(read_f64(&mut r)?);
        }
        let mut sorted = true;
        for k in start + 1..inds.len() {
            if inds.get(k - 1) >= inds.get(k) {
                sorted = false;
                break;
            }
        }
        if !sorted {
            compress::sort_by_key(&mut inds, start, start + count, |a, b, n| {
                vals.swap_range(a, b, n)
            });
        }
        ptr.push(I::from_usize(inds.len()));
        total += count as i64;
    }
    if total != sizes.entries {
        return Err(IoError::LegacyCountMismatch {
            expected: sizes.entries,
            found: total,
        });
    }
    let mat = SpMatBase::from_csr_parts(nrows, ncols, ptr, inds, vals)
        .map_err(IoError::BadStructure)?;
    Ok((mat, sizes))
}
