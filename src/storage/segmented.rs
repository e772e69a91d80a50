//! Segmented arrays for entry counts past a single allocation.
//!
//! A [`SegVec`] chains fixed-capacity segments into one logical array.
//! Growth appends segments; a segment is never reallocated once created, so
//! the address of a stored element is stable for the lifetime of the array.
//! This is the backing storage of the huge engine, whose entry counts may
//! exceed what a 32-bit index (or a single allocation) can address.

use super::SpArray;

/// Default number of elements per segment.
pub const DEFAULT_SEG_LEN: usize = 1 << 22;

/// A logical array stored as a chain of fixed-capacity segments.
#[derive(Clone, Debug)]
pub struct SegVec<T> {
    segs: Vec<Vec<T>>,
    seg_len: usize,
    len: usize,
}

impl<T: Copy> SegVec<T> {
    pub fn new() -> Self {
        Self::with_seg_len(DEFAULT_SEG_LEN)
    }

    /// Create an empty array with the given segment capacity.
    ///
    /// Small segment lengths are useful to exercise boundary straddling in
    /// tests; production arrays keep [`DEFAULT_SEG_LEN`].
    ///
    /// # Panics
    ///
    /// If `seg_len` is zero.
    pub fn with_seg_len(seg_len: usize) -> Self {
        assert!(seg_len > 0, "segment length must be positive");
        Self {
            segs: Vec::new(),
            seg_len,
            len: 0,
        }
    }

    pub fn seg_len(&self) -> usize {
        self.seg_len
    }

    pub fn seg_count(&self) -> usize {
        self.segs.len()
    }

    /// Locate a logical index: returns `(segment, offset within segment)`.
    ///
    /// # Panics
    ///
    /// If `idx` is out of bounds.
    pub fn segment(&self, idx: usize) -> (usize, usize) {
        assert!(idx < self.len, "index {} out of bounds (len {})", idx, self.len);
        (idx / self.seg_len, idx % self.seg_len)
    }

}

impl<T: Copy> Default for SegVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> SpArray<T> for SegVec<T> {
    fn with_capacity(capacity: usize) -> Self {
        let mut v = Self::new();
        SpArray::reserve(&mut v, capacity);
        v
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn get(&self, idx: usize) -> T {
        self.segs[idx / self.seg_len][idx % self.seg_len]
    }

    #[inline]
    fn set(&mut self, idx: usize, val: T) {
        self.segs[idx / self.seg_len][idx % self.seg_len] = val;
    }

    fn push(&mut self, val: T) {
        let seg_idx = self.len / self.seg_len;
        if seg_idx == self.segs.len() {
            self.segs.push(Vec::with_capacity(self.seg_len));
        }
        let seg = &mut self.segs[seg_idx];
        debug_assert_eq!(seg.len(), self.len % self.seg_len);
        seg.push(val);
        self.len += 1;
    }

    fn clear(&mut self) {
        self.segs.clear();
        self.len = 0;
    }

    fn reserve(&mut self, additional: usize) {
        let target = self.len + additional;
        while self.segs.len() * self.seg_len < target {
            self.segs.push(Vec::with_capacity(self.seg_len));
        }
    }

    fn heap_bytes(&self) -> usize {
        let elems: usize = self.segs.iter().map(Vec::capacity).sum();
        elems * std::mem::size_of::<T>()
            + self.segs.capacity() * std::mem::size_of::<Vec<T>>()
    }

    fn range_parts(&self, start: usize, len: usize) -> (&[T], &[T]) {
        if len == 0 {
            return (&[], &[]);
        }
        let end = start + len;
        assert!(end <= self.len, "range end {} out of bounds (len {})", end, self.len);
        let s0 = start / self.seg_len;
        let s1 = (end - 1) / self.seg_len;
        let o0 = start % self.seg_len;
        let o1 = (end - 1) % self.seg_len + 1;
        if s0 == s1 {
            (&self.segs[s0][o0..o1], &[])
        } else {
            assert!(
                s1 == s0 + 1,
                "range of length {} spans more than two segments (segment length {})",
                len,
                self.seg_len
            );
            (&self.segs[s0][o0..], &self.segs[s1][..o1])
        }
    }

    fn range_parts_mut(&mut self, start: usize, len: usize) -> (&mut [T], &mut [T]) {
        if len == 0 {
            return (<&mut [T]>::default(), <&mut [T]>::default());
        }
        let end = start + len;
        assert!(end <= self.len, "range end {} out of bounds (len {})", end, self.len);
        let s0 = start / self.seg_len;
        let s1 = (end - 1) / self.seg_len;
        let o0 = start % self.seg_len;
        let o1 = (end - 1) % self.seg_len + 1;
        if s0 == s1 {
            (&mut self.segs[s0][o0..o1], <&mut [T]>::default())
        } else {
            assert!(
                s1 == s0 + 1,
                "range of length {} spans more than two segments (segment length {})",
                len,
                self.seg_len
            );
            let (lo, hi) = self.segs.split_at_mut(s1);
            (&mut lo[s0][o0..], &mut hi[0][..o1])
        }
    }
}

#[cfg(test)]
mod test {
    use super::{SegVec, SpArray};

    fn filled(seg_len: usize, n: usize) -> SegVec<i64> {
        let mut v = SegVec::with_seg_len(seg_len);
        for x in 0..n {
            v.push(x as i64);
        }
        v
    }

    #[test]
    fn push_grows_by_whole_segments() {
        let v = filled(4, 10);
        assert_eq!(v.len(), 10);
        assert_eq!(v.seg_count(), 3);
        for x in 0..10 {
            assert_eq!(v.get(x), x as i64);
        }
    }

    #[test]
    fn segment_lookup() {
        let v = filled(4, 10);
        assert_eq!(v.segment(0), (0, 0));
        assert_eq!(v.segment(5), (1, 1));
        assert_eq!(v.segment(9), (2, 1));
    }

    #[test]
    #[should_panic]
    fn segment_lookup_out_of_bounds() {
        let v = filled(4, 10);
        v.segment(10);
    }

    #[test]
    fn set_and_swap_across_boundaries() {
        let mut v = filled(4, 10);
        v.set(7, -7);
        assert_eq!(v.get(7), -7);
        v.swap(0, 9);
        assert_eq!(v.get(0), 9);
        assert_eq!(v.get(9), 0);
    }

    #[test]
    fn swap_range_straddles_segments() {
        // segments: [0,1,2,3] [4,5,6,7] [8,9]
        let mut v = filled(4, 10);
        v.swap_range(2, 6, 3);
        let got: Vec<i64> = (0..10).map(|i| v.get(i)).collect();
        assert_eq!(got, vec![0, 1, 6, 7, 8, 5, 2, 3, 4, 9]);
    }

    #[test]
    fn range_parts_single_and_split() {
        let v = filled(4, 10);
        let (head, tail) = v.range_parts(4, 4);
        assert_eq!(head, &[4, 5, 6, 7]);
        assert!(tail.is_empty());

        let (head, tail) = v.range_parts(2, 4);
        assert_eq!(head, &[2, 3]);
        assert_eq!(tail, &[4, 5]);

        let (head, tail) = v.range_parts(3, 0);
        assert!(head.is_empty() && tail.is_empty());
    }

    #[test]
    #[should_panic(expected = "more than two segments")]
    fn range_parts_rejects_three_segments() {
        let v = filled(4, 12);
        v.range_parts(2, 9);
    }

    #[test]
    fn range_parts_mut_split_writes_through() {
        let mut v = filled(4, 10);
        {
            let (head, tail) = v.range_parts_mut(2, 4);
            head[0] = 20;
            tail[1] = 50;
        }
        assert_eq!(v.get(2), 20);
        assert_eq!(v.get(5), 50);
    }

    #[test]
    fn reserve_preallocates_segments() {
        let mut v: SegVec<f64> = SegVec::with_seg_len(8);
        SpArray::reserve(&mut v, 20);
        assert_eq!(v.seg_count(), 3);
        assert_eq!(v.len(), 0);
        assert!(v.heap_bytes() >= 24 * std::mem::size_of::<f64>());
        for x in 0..20 {
            v.push(x as f64);
        }
        assert_eq!(v.get(0), 0.0);
        assert_eq!(v.get(19), 19.0);
    }

    #[test]
    fn clear_releases_segments() {
        let mut v = filled(4, 10);
        SpArray::clear(&mut v);
        assert_eq!(v.len(), 0);
        assert_eq!(v.seg_count(), 0);
    }
}
