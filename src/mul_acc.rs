//! Multiply-accumulate primitives for the sparse vector reductions.
//!
//! The row/column reductions come in two precisions: a plain fused
//! multiply-accumulate, and a compensated variant built on the error-free
//! transforms below (Ogita-Rump-Oishi "Dot2"). The compensated accumulator
//! tracks the rounding error of every addition and product in a second f64,
//! which recovers sums the naive reduction loses to cancellation.

/// Error-free addition: returns `(s, e)` with `s = fl(a + b)` and
/// `a + b = s + e` exactly.
#[inline]
pub fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let e = (a - (s - bb)) + (b - bb);
    (s, e)
}

/// Error-free multiplication: returns `(p, e)` with `p = fl(a * b)` and
/// `a * b = p + e` exactly.
#[inline]
pub fn two_product(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let e = a.mul_add(b, -p);
    (p, e)
}

/// An f64 accumulator carrying a running error compensation term.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompensatedAcc {
    sum: f64,
    comp: f64,
}

impl CompensatedAcc {
    pub fn new(init: f64) -> Self {
        Self {
            sum: init,
            comp: 0.0,
        }
    }

    /// Accumulate `x`, compensating the addition error.
    #[inline]
    pub fn add(&mut self, x: f64) {
        let (s, e) = two_sum(self.sum, x);
        self.sum = s;
        self.comp += e;
    }

    /// Multiply and accumulate, formally `*self += a * b`, compensating both
    /// the product and the addition errors.
    #[inline]
    pub fn mul_acc(&mut self, a: f64, b: f64) {
        let (p, e) = two_product(a, b);
        self.add(p);
        self.comp += e;
    }

    /// The compensated total.
    #[inline]
    pub fn value(&self) -> f64 {
        self.sum + self.comp
    }
}

#[cfg(test)]
mod tests {
    use super::{two_sum, CompensatedAcc};

    #[test]
    fn two_sum_captures_swallowed_term() {
        let (s, e) = two_sum(1e100, 1.0);
        assert_eq!(s, 1e100);
        assert_eq!(e, 1.0);
    }

    #[test]
    fn add_recovers_cancelled_sum() {
        let mut acc = CompensatedAcc::new(0.0);
        acc.add(1.0);
        acc.add(1e100);
        acc.add(-1e100);
        assert_eq!(acc.value(), 1.0);
    }

    #[test]
    fn mul_acc_recovers_product_rounding() {
        // (x + 1)(x - 1) - x * x == -1, but at x = 1e8 the first product
        // is not representable and the naive reduction misses it.
        let x = 1e8f64;
        let naive = (x + 1.0) * (x - 1.0) + x * (-x);
        assert_ne!(naive, -1.0);

        let mut acc = CompensatedAcc::new(0.0);
        acc.mul_acc(x + 1.0, x - 1.0);
        acc.mul_acc(x, -x);
        assert_eq!(acc.value(), -1.0);
    }
}
