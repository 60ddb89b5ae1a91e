use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use std::fmt;
use std::ops::Index;

use crate::error::{Error, Result};

/// Dense row-major matrix of `f64` with a shape fixed at construction.
///
/// Storage is a single flat buffer of `rows * cols` entries. Every binary
/// operation requires exact shape agreement; nothing is broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Allocates a `rows x cols` matrix of zeros.
    pub fn new(rows: usize, cols: usize) -> Result<Matrix> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidShape { rows, cols });
        }
        Ok(Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        })
    }

    /// Allocates a `rows x cols` matrix filled uniformly from [-1, 1].
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<Matrix> {
        let mut res = Matrix::new(rows, cols)?;
        res.randomize(rng);
        Ok(res)
    }

    /// Overwrites every entry with a uniform sample from [-1, 1].
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let dist = Uniform::new_inclusive(-1.0, 1.0);
        for x in self.data.iter_mut() {
            *x = dist.sample(rng);
        }
    }

    /// Treats `values` as a column vector and returns an `N x 1` matrix.
    pub fn from_array(values: &[f64]) -> Result<Matrix> {
        if values.is_empty() {
            return Err(Error::InvalidShape { rows: 0, cols: 1 });
        }
        Ok(Matrix {
            rows: values.len(),
            cols: 1,
            data: values.to_vec(),
        })
    }

    /// Builds a matrix from nested rows. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Matrix> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if n_rows == 0 || n_cols == 0 {
            return Err(Error::InvalidShape { rows: n_rows, cols: n_cols });
        }

        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(Error::ShapeMismatch {
                    op: "from_rows",
                    left: (1, n_cols),
                    right: (1, row.len()),
                });
            }
            data.extend(row);
        }

        Ok(Matrix { rows: n_rows, cols: n_cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Bounds-checked element access.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Row `i` as a slice. Panics if `i` is out of range.
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.rows, "row {} out of range for {}x{} matrix", i, self.rows, self.cols);
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row-major view of all entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copies the entries out as nested rows.
    pub fn to_vec(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    /// Standard matrix product `self x rhs`.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(Error::ShapeMismatch {
                op: "multiply",
                left: self.shape(),
                right: rhs.shape(),
            });
        }

        let mut res = Matrix::new(self.rows, rhs.cols)?;
        for i in 0..self.rows {
            let lhs_row = self.row(i);
            for j in 0..rhs.cols {
                res.data[i * rhs.cols + j] = lhs_row
                    .iter()
                    .enumerate()
                    .map(|(k, a)| a * rhs.data[k * rhs.cols + j])
                    .sum();
            }
        }
        Ok(res)
    }

    pub fn multiply_scalar(&self, k: f64) -> Matrix {
        self.map(|x| x * k)
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "add", |a, b| a + b)
    }

    pub fn subtract(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "subtract", |a, b| a - b)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with(rhs, "hadamard", |a, b| a * b)
    }

    pub fn transpose(&self) -> Matrix {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.data[i * self.cols + j]);
            }
        }
        Matrix {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Returns a new matrix with `functor` applied to every entry.
    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    /// Applies `functor` to every entry in place.
    pub fn map_in_place<F>(&mut self, functor: F)
    where
        F: Fn(f64) -> f64,
    {
        for x in self.data.iter_mut() {
            *x = functor(*x);
        }
    }

    fn zip_with<F>(&self, rhs: &Matrix, op: &'static str, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(Error::ShapeMismatch {
                op,
                left: self.shape(),
                right: rhs.shape(),
            });
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&rhs.data).map(|(&a, &b)| f(a, b)).collect(),
        })
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix ({} x {})", self.rows, self.cols)?;
        for row in self.data.chunks(self.cols) {
            let cells: Vec<String> = row.iter().map(|x| format!("{:>9.4}", x)).collect();
            writeln!(f, "  [{}]", cells.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn naive_product(a: &Matrix, b: &Matrix) -> Vec<Vec<f64>> {
        let mut out = vec![vec![0.0; b.cols()]; a.rows()];
        for i in 0..a.rows() {
            for j in 0..b.cols() {
                for k in 0..a.cols() {
                    out[i][j] += a[(i, k)] * b[(k, j)];
                }
            }
        }
        out
    }

    #[test]
    fn new_is_zero_filled() {
        let m = Matrix::new(2, 3).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert!(m.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn zero_dimension_is_invalid_shape() {
        assert_eq!(Matrix::new(0, 3), Err(Error::InvalidShape { rows: 0, cols: 3 }));
        assert_eq!(Matrix::new(3, 0), Err(Error::InvalidShape { rows: 3, cols: 0 }));
        assert!(matches!(Matrix::from_array(&[]), Err(Error::InvalidShape { .. })));
        assert!(matches!(Matrix::from_rows(vec![]), Err(Error::InvalidShape { .. })));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { op: "from_rows", .. }));
    }

    #[test]
    fn from_array_is_a_column() {
        let m = Matrix::from_array(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(m.shape(), (3, 1));
        assert_eq!(m[(2, 0)], 3.0);
    }

    #[test]
    fn randomize_stays_in_unit_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let m = Matrix::random(16, 16, &mut rng).unwrap();
        assert!(m.as_slice().iter().all(|x| (-1.0..=1.0).contains(x)));
        assert!(m.as_slice().iter().any(|&x| x != 0.0));
    }

    #[test]
    fn multiply_matches_naive_reference() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..50 {
            let m = rng.gen_range(1..6);
            let n = rng.gen_range(1..6);
            let p = rng.gen_range(1..6);
            let a = Matrix::random(m, n, &mut rng).unwrap();
            let b = Matrix::random(n, p, &mut rng).unwrap();

            let c = a.multiply(&b).unwrap();
            assert_eq!(c.shape(), (m, p));

            let expected = naive_product(&a, &b);
            for i in 0..m {
                for j in 0..p {
                    assert_abs_diff_eq!(c[(i, j)], expected[i][j], epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn multiply_rejects_mismatched_inner_dimensions() {
        let a = Matrix::new(2, 3).unwrap();
        let b = Matrix::new(2, 3).unwrap();
        assert_eq!(
            a.multiply(&b),
            Err(Error::ShapeMismatch { op: "multiply", left: (2, 3), right: (2, 3) })
        );
    }

    #[test]
    fn transpose_round_trips() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let a = Matrix::random(3, 5, &mut rng).unwrap();
        let t = a.transpose();
        assert_eq!(t.shape(), (5, 3));
        assert_eq!(t[(4, 1)], a[(1, 4)]);
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn subtract_then_add_restores_operand() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let a = Matrix::random(4, 2, &mut rng).unwrap();
        let b = Matrix::random(4, 2, &mut rng).unwrap();
        let back = a.subtract(&b).unwrap().add(&b).unwrap();
        for (x, y) in back.as_slice().iter().zip(a.as_slice()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn element_wise_ops_do_not_broadcast() {
        let a = Matrix::new(3, 1).unwrap();
        let b = Matrix::new(3, 2).unwrap();
        assert!(matches!(a.add(&b), Err(Error::ShapeMismatch { op: "add", .. })));
        assert!(matches!(a.subtract(&b), Err(Error::ShapeMismatch { op: "subtract", .. })));
        assert!(matches!(a.hadamard(&b), Err(Error::ShapeMismatch { op: "hadamard", .. })));
    }

    #[test]
    fn hadamard_and_scalar() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(vec![vec![2.0, 0.5], vec![-1.0, 0.0]]).unwrap();
        assert_eq!(a.hadamard(&b).unwrap().to_vec(), vec![vec![2.0, 1.0], vec![-3.0, 0.0]]);
        assert_eq!(a.multiply_scalar(0.5).to_vec(), vec![vec![0.5, 1.0], vec![1.5, 2.0]]);
    }

    #[test]
    fn map_variants_agree() {
        let a = Matrix::from_rows(vec![vec![1.0, -2.0, 3.0]]).unwrap();
        let mapped = a.map(|x| x * x);
        let mut in_place = a.clone();
        in_place.map_in_place(|x| x * x);
        assert_eq!(mapped, in_place);
        assert_eq!(a.row(0), &[1.0, -2.0, 3.0]);
    }

    #[test]
    fn get_is_bounds_checked() {
        let a = Matrix::new(2, 2).unwrap();
        assert_eq!(a.get(1, 1), Some(0.0));
        assert_eq!(a.get(2, 0), None);
        assert_eq!(a.get(0, 2), None);
    }
}
