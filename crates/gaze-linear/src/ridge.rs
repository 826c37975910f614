//! Ridge least squares on the normal equations.
//!
//! Solves `(XᵀX + αI') c = Xᵀy`, where `I'` is the identity with its `(0, 0)`
//! entry zeroed so the constant term is not shrunk. The 6×6 system is solved
//! by Gaussian elimination with partial pivoting. A column whose best pivot
//! falls below [`PIVOT_EPSILON`] is treated as a degenerate direction and its
//! coefficient is set to zero.

use gaze_core::Real;
use log::debug;
use nalgebra::SMatrix;

use crate::features::{Features, NUM_FEATURES};

/// Pivot magnitude below which a column is considered degenerate.
pub const PIVOT_EPSILON: Real = 1e-10;

/// Normal matrix of the feature design.
pub type NormalMatrix = SMatrix<Real, NUM_FEATURES, NUM_FEATURES>;

/// Solution of a ridge system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RidgeSolution {
    pub coef: Features,
    /// Number of columns zeroed as degenerate.
    pub degenerate: usize,
}

/// Accumulate `XᵀX + αI'` and `Xᵀy` from design rows and one target axis.
pub fn normal_equations(rows: &[Features], y: &[Real], alpha: Real) -> (NormalMatrix, Features) {
    let mut ata = NormalMatrix::zeros();
    let mut atb = Features::zeros();
    for (row, &t) in rows.iter().zip(y.iter()) {
        ata += *row * row.transpose();
        atb += *row * t;
    }
    for k in 1..NUM_FEATURES {
        ata[(k, k)] += alpha;
    }
    (ata, atb)
}

/// Solve `a x = b` by Gaussian elimination with partial pivoting.
///
/// Never fails: degenerate columns get a zero coefficient.
pub fn solve_partial_pivot(mut a: NormalMatrix, mut b: Features) -> RidgeSolution {
    let n = NUM_FEATURES;
    let mut degenerate = [false; NUM_FEATURES];

    for k in 0..n {
        let mut pivot_row = k;
        let mut pivot_abs = a[(k, k)].abs();
        for i in (k + 1)..n {
            let v = a[(i, k)].abs();
            if v > pivot_abs {
                pivot_abs = v;
                pivot_row = i;
            }
        }
        if !pivot_abs.is_finite() || pivot_abs < PIVOT_EPSILON {
            degenerate[k] = true;
            continue;
        }
        if pivot_row != k {
            a.swap_rows(k, pivot_row);
            b.swap_rows(k, pivot_row);
        }
        for i in (k + 1)..n {
            let factor = a[(i, k)] / a[(k, k)];
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                a[(i, j)] -= factor * a[(k, j)];
            }
            b[i] -= factor * b[k];
        }
    }

    let mut coef = Features::zeros();
    for k in (0..n).rev() {
        if degenerate[k] {
            continue;
        }
        let mut s = b[k];
        for j in (k + 1)..n {
            s -= a[(k, j)] * coef[j];
        }
        coef[k] = s / a[(k, k)];
    }

    let degenerate = degenerate.iter().filter(|d| **d).count();
    if degenerate > 0 {
        debug!("ridge solve: {degenerate} degenerate direction(s) zeroed");
    }
    RidgeSolution { coef, degenerate }
}

/// Fit one output axis.
pub fn ridge_fit(rows: &[Features], y: &[Real], alpha: Real) -> RidgeSolution {
    let (ata, atb) = normal_equations(rows, y, alpha);
    solve_partial_pivot(ata, atb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::quadratic_features;
    use gaze_core::Vec2;

    #[test]
    fn solves_well_conditioned_system() {
        let mut a = NormalMatrix::identity() * 2.0;
        a[(0, 5)] = 1.0;
        // Row swap needed at the first step.
        a.swap_rows(0, 3);
        let x_true = Features::from([1.0, -2.0, 0.5, 3.0, 0.0, 4.0]);
        let b = a * x_true;
        let sol = solve_partial_pivot(a, b);
        assert_eq!(sol.degenerate, 0);
        assert!((sol.coef - x_true).norm() < 1e-12);
    }

    #[test]
    fn zero_column_is_degenerate() {
        let mut a = NormalMatrix::identity();
        a[(2, 2)] = 0.0;
        let b = Features::from([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let sol = solve_partial_pivot(a, b);
        assert_eq!(sol.degenerate, 1);
        assert_eq!(sol.coef[2], 0.0);
        assert_eq!(sol.coef[5], 6.0);
    }

    #[test]
    fn unregularized_fit_recovers_exact_quadratic() {
        let truth = Features::from([0.3, 1.2, -0.4, 0.05, 0.2, -0.1]);
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                let f = quadratic_features(&Vec2::new(i as f64 - 1.5, j as f64 - 1.5));
                y.push(truth.dot(&f));
                rows.push(f);
            }
        }
        let sol = ridge_fit(&rows, &y, 0.0);
        assert_eq!(sol.degenerate, 0);
        assert!((sol.coef - truth).norm() < 1e-9);
    }

    #[test]
    fn intercept_is_not_regularized() {
        let rows: Vec<Features> = (0..6)
            .map(|i| quadratic_features(&Vec2::new(i as f64, 0.0)))
            .collect();
        let (ata, _) = normal_equations(&rows, &[0.0; 6], 5.0);
        assert_eq!(ata[(0, 0)], 6.0);
        assert_eq!(ata[(2, 2)], 5.0);
    }
}
