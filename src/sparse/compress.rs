//! Sorting and pointer compression over generic backing arrays.
//!
//! These free functions implement the shared machinery of both engine
//! variants: an in-place quicksort over an [`SpArray`] key array that moves
//! companion arrays in lockstep, the dual-key (primary, then secondary
//! within runs) sort used before compression, compression of a sorted
//! primary stream into a pointer array, and the inverse expansion.
//!
//! The quicksort is the Bentley-McIlroy three-way variant: entries equal to
//! the pivot are parked at both ends of the range and moved to the middle in
//! blocks, which keeps equal-heavy inputs (every entry of a matrix row
//! shares its primary index) close to linear.

use smallvec::SmallVec;

use crate::indexing::SpIndex;
use crate::storage::SpArray;

/// Ranges shorter than this are insertion-sorted.
const INSERTION_CUTOFF: usize = 16;

/// A duplicate coordinate found during a checked dual sort.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct DuplicateKey {
    pub primary: usize,
    pub secondary: usize,
}

fn median_of_three<I, K>(keys: &K, a: usize, b: usize, c: usize) -> usize
where
    I: SpIndex,
    K: SpArray<I>,
{
    let (ka, kb, kc) = (keys.get(a), keys.get(b), keys.get(c));
    if ka < kb {
        if kb < kc {
            b
        } else if ka < kc {
            c
        } else {
            a
        }
    } else if ka < kc {
        a
    } else if kb < kc {
        c
    } else {
        b
    }
}

fn insertion_sort<I, K, M>(keys: &mut K, lo: usize, hi: usize, mv: &mut M)
where
    I: SpIndex,
    K: SpArray<I>,
    M: FnMut(usize, usize, usize),
{
    for i in (lo + 1)..hi {
        let mut j = i;
        while j > lo && keys.get(j - 1) > keys.get(j) {
            keys.swap(j - 1, j);
            mv(j - 1, j, 1);
            j -= 1;
        }
    }
}

/// Sort `keys[lo..hi]` in place, reporting every swap through `mv` so that
/// companion arrays move in lockstep.
///
/// `mv(a, b, n)` must swap the ranges `a..a + n` and `b..b + n` of every
/// companion array; single-element swaps are reported with `n == 1`.
pub(crate) fn sort_by_key<I, K, M>(keys: &mut K, lo: usize, hi: usize, mut mv: M)
where
    I: SpIndex,
    K: SpArray<I>,
    M: FnMut(usize, usize, usize),
{
    let mut stack: SmallVec<[(usize, usize); 32]> = SmallVec::new();
    stack.push((lo, hi));
    while let Some((lo, hi)) = stack.pop() {
        if hi - lo <= INSERTION_CUTOFF {
            insertion_sort(keys, lo, hi, &mut mv);
            continue;
        }
        let mid = lo + (hi - lo) / 2;
        let m = median_of_three(keys, lo, mid, hi - 1);
        if m != lo {
            keys.swap(lo, m);
            mv(lo, m, 1);
        }
        let pivot = keys.get(lo);
        let (mut pa, mut pb) = (lo + 1, lo + 1);
        let (mut pc, mut pd) = (hi - 1, hi - 1);
        loop {
            while pb <= pc && keys.get(pb) <= pivot {
                if keys.get(pb) == pivot {
                    if pa != pb {
                        keys.swap(pa, pb);
                        mv(pa, pb, 1);
                    }
                    pa += 1;
                }
                pb += 1;
            }
            while pb <= pc && keys.get(pc) >= pivot {
                if keys.get(pc) == pivot {
                    if pc != pd {
                        keys.swap(pc, pd);
                        mv(pc, pd, 1);
                    }
                    pd -= 1;
                }
                pc -= 1;
            }
            if pb > pc {
                break;
            }
            keys.swap(pb, pc);
            mv(pb, pc, 1);
            pb += 1;
            pc -= 1;
        }
        // Move the pivot-equal blocks from the ends to the middle.
        let s = (pa - lo).min(pb - pa);
        if s > 0 {
            keys.swap_range(lo, pb - s, s);
            mv(lo, pb - s, s);
        }
        let s = (pd - pc).min(hi - 1 - pd);
        if s > 0 {
            keys.swap_range(pb, hi - s, s);
            mv(pb, hi - s, s);
        }
        let left = pb - pa;
        let right = pd - pc;
        // Push the larger side first so the smaller is handled next.
        if left >= right {
            if left > 1 {
                stack.push((lo, lo + left));
            }
            if right > 1 {
                stack.push((hi - right, hi));
            }
        } else {
            if right > 1 {
                stack.push((hi - right, hi));
            }
            if left > 1 {
                stack.push((lo, lo + left));
            }
        }
    }
}

/// Dual-key sort of parallel (primary, secondary, value) arrays: primary
/// ascending, then secondary ascending within each equal-primary run.
///
/// With `check_dups` set, each run is scanned for equal consecutive
/// secondary indices and the first duplicate coordinate is reported. The
/// arrays are left fully sorted either way; no entry is created or lost.
pub(crate) fn sort_dual<I, IS, DS>(
    prim: &mut IS,
    sec: &mut IS,
    vals: &mut DS,
    check_dups: bool,
) -> Result<(), DuplicateKey>
where
    I: SpIndex,
    IS: SpArray<I>,
    DS: SpArray<f64>,
{
    let len = prim.len();
    debug_assert_eq!(len, sec.len());
    debug_assert_eq!(len, vals.len());
    sort_by_key(prim, 0, len, |a, b, n| {
        sec.swap_range(a, b, n);
        vals.swap_range(a, b, n);
    });
    let mut dup = None;
    let mut lo = 0;
    while lo < len {
        let key = prim.get(lo);
        let mut hi = lo + 1;
        while hi < len && prim.get(hi) == key {
            hi += 1;
        }
        sort_by_key(sec, lo, hi, |a, b, n| vals.swap_range(a, b, n));
        if check_dups && dup.is_none() {
            for k in (lo + 1)..hi {
                if sec.get(k) == sec.get(k - 1) {
                    dup = Some(DuplicateKey {
                        primary: key.index(),
                        secondary: sec.get(k).index(),
                    });
                    break;
                }
            }
        }
        lo = hi;
    }
    match dup {
        Some(d) => Err(d),
        None => Ok(()),
    }
}

/// Compress a sorted primary stream into a pointer array of length
/// `outer + 1`: `ptr[o]..ptr[o + 1]` bounds the entries of primary index
/// `o`, with skipped indices padded by the running count.
pub(crate) fn compress_ptr<I, IS>(prim: &IS, outer: usize) -> Vec<I>
where
    I: SpIndex,
    IS: SpArray<I>,
{
    let nnz = prim.len();
    let mut ptr = Vec::with_capacity(outer + 1);
    ptr.push(I::zero());
    let mut k = 0;
    for o in 0..outer {
        while k < nnz && prim.get(k).index() == o {
            k += 1;
        }
        ptr.push(I::from_usize(k));
    }
    debug_assert_eq!(k, nnz, "primary indices must be sorted and below outer");
    ptr
}

/// Expand a pointer array back into the explicit primary stream it
/// compresses; the inverse of [`compress_ptr`].
pub(crate) fn expand_ptr<I, IS>(ptr: &[I]) -> IS
where
    I: SpIndex,
    IS: SpArray<I>,
{
    let nnz = ptr.last().map_or(0, |p| p.index());
    let mut out = IS::with_capacity(nnz);
    for o in 0..ptr.len().saturating_sub(1) {
        let lo = ptr[o].index();
        let hi = ptr[o + 1].index();
        for _ in lo..hi {
            out.push(I::from_usize(o));
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::storage::SegVec;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn oracle_sorted(prim: &[i32], sec: &[i32], vals: &[f64]) -> Vec<(i32, i32, f64)> {
        let mut triples: Vec<(i32, i32, f64)> = prim
            .iter()
            .zip(sec.iter())
            .zip(vals.iter())
            .map(|((&p, &s), &v)| (p, s, v))
            .collect();
        triples.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        triples
    }

    #[test]
    fn sort_by_key_moves_companions() {
        let mut keys = vec![4i32, 1, 6, 2];
        let mut vals = vec![4.0, -1.0, 2.0, -3.0];
        sort_by_key(&mut keys, 0, 4, |a, b, n| vals.swap_range(a, b, n));
        assert_eq!(keys, vec![1, 2, 4, 6]);
        assert_eq!(vals, vec![-1.0, -3.0, 4.0, 2.0]);
    }

    #[test]
    fn sort_by_key_random_against_oracle() {
        let mut rng = SmallRng::seed_from_u64(42);
        for len in [0usize, 1, 2, 15, 16, 17, 100, 500] {
            // Few distinct keys to force the equal-block code paths.
            let mut keys: Vec<i32> =
                (0..len).map(|_| rng.random_range(0..13)).collect();
            let mut vals: Vec<f64> = (0..len).map(|k| k as f64).collect();
            let mut expect: Vec<(i32, f64)> = keys
                .iter()
                .zip(vals.iter())
                .map(|(&k, &v)| (k, v))
                .collect();
            expect.sort_by_key(|e| e.0);
            sort_by_key(&mut keys, 0, len, |a, b, n| vals.swap_range(a, b, n));
            let sorted_keys: Vec<i32> = expect.iter().map(|e| e.0).collect();
            assert_eq!(keys, sorted_keys);
            // Equal keys may permute their values, so compare multisets
            // per key run.
            let mut got: Vec<(i32, f64)> =
                keys.iter().zip(vals.iter()).map(|(&k, &v)| (k, v)).collect();
            got.sort_by(|a, b| (a.0, a.1).partial_cmp(&(b.0, b.1)).unwrap());
            expect.sort_by(|a, b| (a.0, a.1).partial_cmp(&(b.0, b.1)).unwrap());
            assert_eq!(got, expect);
        }
    }

    #[test]
    fn dual_sort_orders_by_both_keys() {
        let mut rng = SmallRng::seed_from_u64(7);
        let len = 400;
        let prim: Vec<i32> = (0..len).map(|_| rng.random_range(0..10)).collect();
        let sec: Vec<i32> = (0..len).map(|_| rng.random_range(0..1000)).collect();
        let vals: Vec<f64> = (0..len).map(|k| k as f64).collect();
        let expect = oracle_sorted(&prim, &sec, &vals);

        let (mut p, mut s, mut v) = (prim, sec, vals);
        // Random secondaries may collide; an unchecked sort must not care.
        sort_dual(&mut p, &mut s, &mut v, false).unwrap();
        let got: Vec<(i32, i32, f64)> = p
            .iter()
            .zip(s.iter())
            .zip(v.iter())
            .map(|((&p, &s), &v)| (p, s, v))
            .collect();
        let mut expect = expect;
        expect.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mut got_sorted = got.clone();
        got_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(got_sorted, expect);
        // And the (primary, secondary) stream must be ordered.
        for w in got.windows(2) {
            assert!((w[0].0, w[0].1) <= (w[1].0, w[1].1));
        }
    }

    #[test]
    fn dual_sort_reports_duplicates() {
        let mut p = vec![1i32, 0, 1, 0];
        let mut s = vec![3i32, 2, 3, 1];
        let mut v = vec![0.5, 1.5, 2.5, 3.5];
        let err = sort_dual(&mut p, &mut s, &mut v, true).unwrap_err();
        assert_eq!(
            err,
            DuplicateKey {
                primary: 1,
                secondary: 3
            }
        );
        // The arrays are still a sorted permutation of the input.
        assert_eq!(p, vec![0, 0, 1, 1]);
        assert_eq!(s, vec![1, 2, 3, 3]);
        assert_eq!(v, vec![3.5, 1.5, 0.5, 2.5]);
    }

    #[test]
    fn dual_sort_on_segmented_arrays() {
        let mut p: SegVec<i64> = SegVec::with_seg_len(4);
        let mut s: SegVec<i64> = SegVec::with_seg_len(4);
        let mut v: SegVec<f64> = SegVec::with_seg_len(4);
        let mut rng = SmallRng::seed_from_u64(3);
        let len = 50usize;
        for k in 0..len {
            p.push(rng.random_range(0..5));
            s.push(rng.random_range(0..40));
            v.push(k as f64);
        }
        sort_dual(&mut p, &mut s, &mut v, false).unwrap();
        for k in 1..len {
            let prev = (p.get(k - 1), s.get(k - 1));
            let cur = (p.get(k), s.get(k));
            assert!(prev <= cur);
        }
    }

    #[test]
    fn compress_pads_skipped_primaries() {
        let prim = vec![0i32, 0, 2];
        let ptr = compress_ptr(&prim, 4);
        assert_eq!(ptr, vec![0, 2, 2, 3, 3]);
    }

    #[test]
    fn compress_expand_roundtrip() {
        let prim = vec![0i32, 0, 1, 4, 4, 4];
        let ptr = compress_ptr(&prim, 6);
        assert_eq!(ptr, vec![0, 2, 3, 3, 3, 6, 6]);
        let back: Vec<i32> = expand_ptr(&ptr);
        assert_eq!(back, prim);
    }

    #[test]
    fn expand_empty_ptr() {
        let back: Vec<i32> = expand_ptr(&[0i32]);
        assert!(back.is_empty());
    }
}
