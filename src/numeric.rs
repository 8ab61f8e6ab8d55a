//! Cubic spline interpolation and bracketed root finding.

use crate::error::{Result, SolarError};

const BRENT_MAX_ITERATIONS: usize = 200;

/// Natural cubic spline through `(xs[i], ys[i])`, `xs` strictly increasing.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    second: Vec<f64>, // second derivative at each knot
}

impl CubicSpline {
    pub const MIN_POINTS: usize = 4;

    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        let n = xs.len();
        if n < Self::MIN_POINTS || ys.len() != n {
            return Err(SolarError::InvalidSampleCount { count: n.min(ys.len()) });
        }
        debug_assert!(xs.windows(2).all(|w| w[1] > w[0]), "knots must increase");

        // Tridiagonal system for the interior second derivatives (Thomas algorithm),
        // with zero curvature at both ends.
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let mut c_prime = vec![0.0; n];
        let mut d_prime = vec![0.0; n];
        for i in 1..n - 1 {
            let lower = h[i - 1];
            let diag = 2.0 * (h[i - 1] + h[i]);
            let rhs = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
            let denom = diag - lower * c_prime[i - 1];
            c_prime[i] = h[i] / denom;
            d_prime[i] = (rhs - lower * d_prime[i - 1]) / denom;
        }

        let mut second = vec![0.0; n];
        for i in (1..n - 1).rev() {
            second[i] = d_prime[i] - c_prime[i] * second[i + 1];
        }

        Ok(Self { xs, ys, second })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Value at `x`; outside the knots the end pieces are extended.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let hi = self.xs.partition_point(|&k| k <= x).clamp(1, n - 1);
        let lo = hi - 1;

        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;
        a * self.ys[lo]
            + b * self.ys[hi]
            + ((a * a * a - a) * self.second[lo] + (b * b * b - b) * self.second[hi]) * h * h / 6.0
    }
}

/// Brent's method on `[lower, upper]`.
///
/// Any iteration that fails to halve the bracket is followed by a bisection,
/// so the bracket shrinks at least geometrically even on flat multiple roots.
/// `Ok(None)` when `f` has the same sign at both ends.
pub fn find_root<F: Fn(f64) -> f64>(
    f: F,
    lower: f64,
    upper: f64,
    tolerance: f64,
) -> Result<Option<f64>> {
    let (mut a, mut b) = (lower, upper);
    let (mut fa, mut fb) = (f(a), f(b));
    if fa == 0.0 {
        return Ok(Some(a));
    }
    if fb == 0.0 {
        return Ok(Some(b));
    }
    if fa.signum() == fb.signum() || fa.is_nan() || fb.is_nan() {
        return Ok(None);
    }

    let (mut c, mut fc) = (b, fb);
    let mut d = b - a;
    let mut e = d;
    let mut last_width = f64::INFINITY;
    for _ in 0..BRENT_MAX_ITERATIONS {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * tolerance;
        let m = 0.5 * (c - b);
        if m.abs() <= tol || fb == 0.0 {
            return Ok(Some(b));
        }

        let width = (c - b).abs();
        let stalled = width > 0.5 * last_width;
        last_width = width;

        if !stalled && e.abs() >= tol && fa.abs() > fb.abs() {
            // inverse quadratic interpolation, or secant when only two points differ
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * m * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            if 2.0 * p < (3.0 * m * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = d;
            }
        } else {
            d = m;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = f(b);
    }

    Err(SolarError::NonConvergence {
        solver: "brent",
        iterations: BRENT_MAX_ITERATIONS,
    })
}
