//! Dense least-squares solvers
//!
//! Both solvers go through a thin SVD so that rank-deficient designs are
//! reported instead of producing silently meaningless coefficients.

use crate::{MathError, Result};
use nalgebra::{DMatrix, DVector};

/// Singular values below this fraction of the largest one count as zero.
const RANK_TOLERANCE: f64 = 1e-12;

/// Build a design matrix from row-major feature rows
pub fn design_matrix(rows: &[Vec<f64>]) -> Result<DMatrix<f64>> {
    let columns = rows.first().map(Vec::len).unwrap_or(0);
    if columns == 0 {
        return Err(MathError::InsufficientData(
            "Design matrix needs at least one row and one column".to_string(),
        ));
    }

    if let Some(row) = rows.iter().position(|row| row.len() != columns) {
        return Err(MathError::InvalidInput(format!(
            "Design row {} has {} features, expected {}",
            row,
            rows[row].len(),
            columns
        )));
    }

    Ok(DMatrix::from_fn(rows.len(), columns, |i, j| rows[i][j]))
}

/// Solve `min ||X b - y||²` for `b`
pub fn solve_least_squares(design: &DMatrix<f64>, target: &[f64]) -> Result<Vec<f64>> {
    let (rows, columns) = design.shape();
    if rows != target.len() {
        return Err(MathError::InvalidInput(format!(
            "Design has {} rows but target has {} values",
            rows,
            target.len()
        )));
    }

    if rows < columns {
        return Err(MathError::InsufficientData(format!(
            "{} observations cannot determine {} coefficients",
            rows, columns
        )));
    }

    if design.iter().chain(target.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Least squares input contains non-finite values".to_string(),
        ));
    }

    let svd = design.clone().svd(true, true);
    let largest = svd
        .singular_values
        .iter()
        .copied()
        .fold(0.0_f64, f64::max);
    let eps = largest * RANK_TOLERANCE;

    if largest <= 0.0 || svd.rank(eps) < columns {
        return Err(MathError::CalculationError(
            "Design matrix is rank deficient".to_string(),
        ));
    }

    let rhs = DVector::from_column_slice(target);
    let solution = svd
        .solve(&rhs, eps)
        .map_err(|e| MathError::CalculationError(e.to_string()))?;

    Ok(solution.iter().copied().collect())
}

/// Solve `min ||X b - y||² + Σ penalties[j] · b[j]²` for `b`
///
/// The penalty is applied by appending `sqrt(penalty)` rows to the design, so
/// any strictly positive penalty makes the system full rank.
pub fn solve_ridge(design: &DMatrix<f64>, target: &[f64], penalties: &[f64]) -> Result<Vec<f64>> {
    let (rows, columns) = design.shape();
    if penalties.len() != columns {
        return Err(MathError::InvalidInput(format!(
            "Expected {} penalties, got {}",
            columns,
            penalties.len()
        )));
    }

    if penalties.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(MathError::InvalidInput(
            "Ridge penalties must be finite and non-negative".to_string(),
        ));
    }

    let augmented = DMatrix::from_fn(rows + columns, columns, |i, j| {
        if i < rows {
            design[(i, j)]
        } else if i - rows == j {
            penalties[j].sqrt()
        } else {
            0.0
        }
    });

    let mut augmented_target = target.to_vec();
    augmented_target.resize(rows + columns, 0.0);

    solve_least_squares(&augmented, &augmented_target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        let design = design_matrix(&[vec![1.0, 0.0], vec![1.0, 1.0], vec![1.0, 2.0]]).unwrap();
        let coefficients = solve_least_squares(&design, &[1.0, 3.0, 5.0]).unwrap();

        assert!((coefficients[0] - 1.0).abs() < 1e-9);
        assert!((coefficients[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rank_deficient_design() {
        let design = design_matrix(&[vec![1.0, 2.0], vec![2.0, 4.0], vec![3.0, 6.0]]).unwrap();
        let result = solve_least_squares(&design, &[1.0, 2.0, 3.0]);

        assert!(matches!(result, Err(MathError::CalculationError(_))));
    }

    #[test]
    fn test_ridge_resolves_collinearity() {
        let design = design_matrix(&[vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
        let coefficients = solve_ridge(&design, &[2.0, 2.0, 2.0], &[0.0, 1.0]).unwrap();

        // The unpenalised column absorbs the level.
        assert!((coefficients[0] + coefficients[1] - 2.0).abs() < 0.01);
        assert!(coefficients[1].abs() < 0.01);
    }

    #[test]
    fn test_shape_errors() {
        assert!(design_matrix(&[]).is_err());
        assert!(design_matrix(&[vec![1.0], vec![1.0, 2.0]]).is_err());

        let design = design_matrix(&[vec![1.0, 0.0]]).unwrap();
        assert!(matches!(
            solve_least_squares(&design, &[1.0]),
            Err(MathError::InsufficientData(_))
        ));
        assert!(solve_ridge(&design, &[1.0], &[1.0]).is_err());
    }
}
