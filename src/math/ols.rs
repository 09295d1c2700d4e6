//! Weighted least squares solver.
//!
//! Both the log-log smoother and the power-law fit reduce to small problems of
//! the form:
//!
//! ```text
//! minimize Σ (w_i (y_i - x_i^T β))^2
//! ```
//!
//! Implementation choices:
//! - Rows are scaled by `w_i` (the polynomial-fit convention: the weight
//!   multiplies the residual, so it enters the objective squared).
//! - We solve with SVD. The design matrix is tall and, for very narrow
//!   smoothing kernels, rank deficient; SVD then returns the minimum-norm
//!   solution instead of failing.
//! - Columns are scaled to unit max-norm before solving and singular values
//!   are cut relative to the largest one. Kernel tails can carry weights many
//!   orders of magnitude below the centre row and must still pin the slope
//!   and curvature terms.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Singular values below `max_sv · max(rows, cols) · ε` are treated as zero.
/// Returns `None` if no finite solution could be found.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    let max_sv = svd.singular_values.max();
    let eps = max_sv * x.nrows().max(x.ncols()) as f64 * f64::EPSILON;

    let beta = svd.solve(y, eps).ok()?;
    beta.iter().all(|v| v.is_finite()).then_some(beta)
}

/// Fit `y ≈ Σ_k β_k x^k` (k = 0..=degree) with per-sample weights `w`.
///
/// Coefficients are returned lowest order first.
pub fn weighted_polyfit(x: &[f64], y: &[f64], w: &[f64], degree: usize) -> Option<Vec<f64>> {
    let n = x.len();
    if y.len() != n || w.len() != n {
        return None;
    }
    let p = degree + 1;

    let mut xw = DMatrix::<f64>::zeros(n, p);
    let mut yw = DVector::<f64>::zeros(n);
    for i in 0..n {
        let mut power = 1.0;
        for j in 0..p {
            xw[(i, j)] = power * w[i];
            power *= x[i];
        }
        yw[i] = y[i] * w[i];
    }

    // All-zero columns keep scale 1 and drop out through the SVD cutoff.
    let scale: Vec<f64> = (0..p)
        .map(|j| match xw.column(j).amax() {
            s if s > 0.0 && s.is_finite() => s,
            _ => 1.0,
        })
        .collect();
    for (j, s) in scale.iter().enumerate() {
        xw.column_mut(j).unscale_mut(*s);
    }

    let beta = solve_least_squares(&xw, &yw)?;
    Some(beta.iter().zip(&scale).map(|(b, s)| b / s).collect())
}
