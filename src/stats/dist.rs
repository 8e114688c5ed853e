//! Student's t distribution by direct numerical integration.
//!
//! Only integer degrees of freedom are needed (they come from sample sizes),
//! which makes Γ(ν/2) a finite product.

use std::f64::consts::PI;

const LOWER_BOUND: f64 = -1024.0;
const UPPER_BOUND: f64 = 1024.0;
const INITIAL_INTERVALS: usize = 4096;
const MAX_ROUNDS: usize = 8;
const MIN_WIDTH: f64 = 1e-10;
const REL_TOL: f64 = 1e-10;
const MAX_NEWTON_ITERS: usize = 128;

/// Γ(n/2) for integer `n`.
///
/// Even `n`: `(n/2 - 1)!`, with Γ(0) = +∞.
/// Odd `n`: `√π · Π_{i=3,5,..,n} (i - 2)/2`, so Γ(1/2) = √π and Γ(3/2) = √π/2.
pub fn gamma_half(n: u32) -> f64 {
    ln_gamma_half(n).exp()
}

/// ln Γ(n/2) for integer `n`.
pub fn ln_gamma_half(n: u32) -> f64 {
    if n == 0 {
        return f64::INFINITY;
    }
    if n % 2 == 0 {
        (2..n / 2).map(|k| (k as f64).ln()).sum()
    } else {
        let mut acc = 0.5 * PI.ln();
        let mut i = 3;
        while i <= n {
            acc += ((i - 2) as f64 / 2.0).ln();
            i += 2;
        }
        acc
    }
}

/// Composite trapezoid rule, doubling the interval count until successive
/// estimates agree.
pub fn integrate(f: impl Fn(f64) -> f64, a: f64, b: f64) -> f64 {
    if a == b {
        return 0.0;
    }

    let mut n = INITIAL_INTERVALS;
    let mut h = (b - a) / n as f64;
    let mut sum = 0.5 * (f(a) + f(b)) + (1..n).map(|i| f(a + i as f64 * h)).sum::<f64>();
    let mut estimate = h * sum;

    for _ in 1..MAX_ROUNDS {
        if h.abs() / 2.0 < MIN_WIDTH {
            break;
        }
        sum += (0..n).map(|i| f(a + (i as f64 + 0.5) * h)).sum::<f64>();
        n *= 2;
        h /= 2.0;
        let next = h * sum;
        if (next - estimate).abs() <= REL_TOL * next.abs() {
            return next;
        }
        estimate = next;
    }
    estimate
}

/// Student's t distribution with integer degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentT {
    dof: u32,
}

impl StudentT {
    pub fn new(dof: u32) -> Self {
        Self { dof }
    }

    pub fn dof(&self) -> u32 {
        self.dof
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if self.dof == 0 {
            return f64::NAN;
        }
        let nu = self.dof as f64;
        let ln_coeff = ln_gamma_half(self.dof + 1) - ln_gamma_half(self.dof) - 0.5 * (nu * PI).ln();
        ln_coeff.exp() * (1.0 + x * x / nu).powf(-(nu + 1.0) / 2.0)
    }

    /// P(X <= x).
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= LOWER_BOUND {
            return 0.0;
        }
        integrate(|v| self.pdf(v), LOWER_BOUND, x.min(UPPER_BOUND))
    }

    /// P(X > x).
    pub fn sf(&self, x: f64) -> f64 {
        if x >= UPPER_BOUND {
            return 0.0;
        }
        integrate(|v| self.pdf(v), x.max(LOWER_BOUND), UPPER_BOUND)
    }

    /// Inverse survival function: the `x` with `sf(x) = p`.
    pub fn isf(&self, p: f64) -> f64 {
        let mut x = 0.0;
        for _ in 0..MAX_NEWTON_ITERS {
            let step = (self.sf(x) - p) / self.pdf(x);
            if !step.is_finite() {
                return f64::NAN;
            }
            x += step;
            if step.abs() <= REL_TOL * x.abs() {
                break;
            }
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamma_half_values() {
        assert!((gamma_half(1) - PI.sqrt()).abs() < 1e-12);
        assert!((gamma_half(2) - 1.0).abs() < 1e-12);
        assert!((gamma_half(3) - PI.sqrt() / 2.0).abs() < 1e-12);
        assert!((gamma_half(8) - 6.0).abs() < 1e-9);
        assert!((gamma_half(5) - 0.75 * PI.sqrt()).abs() < 1e-12);
        assert!(gamma_half(0).is_infinite());
    }

    #[test]
    fn pdf_matches_closed_forms() {
        // dof 1 is the Cauchy distribution.
        let cauchy = StudentT::new(1);
        assert!((cauchy.pdf(0.0) - 1.0 / PI).abs() < 1e-12);
        assert!((cauchy.pdf(1.0) - 0.5 / PI).abs() < 1e-12);

        let t2 = StudentT::new(2);
        assert!((t2.pdf(0.0) - 1.0 / (2.0 * 2f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn integrate_polynomial() {
        let v = integrate(|x| x * x, 0.0, 3.0);
        assert!((v - 9.0).abs() < 1e-6);
    }

    #[test]
    fn sf_and_cdf_are_complementary() {
        let t = StudentT::new(5);
        assert!((t.sf(0.0) - 0.5).abs() < 1e-6);
        assert!((t.cdf(1.3) + t.sf(1.3) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn isf_matches_tables() {
        // dof 2 has a closed form: sf(x) = (1 - x / sqrt(x² + 2)) / 2
        let t2 = StudentT::new(2);
        let x = t2.isf(0.025);
        let sf = 0.5 * (1.0 - x / (x * x + 2.0).sqrt());
        assert!((sf - 0.025).abs() < 1e-5, "x = {x}");

        // two-sided 95% critical value for 10 dof
        let t10 = StudentT::new(10);
        assert!((t10.isf(0.025) - 2.228).abs() < 1e-2);
    }
}
