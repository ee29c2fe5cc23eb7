use rand::Rng;
use std::f64::consts::PI;

use crate::error::{Error, Result};

/// Dense row-major matrix of `f64`.
///
/// The backing buffer always holds exactly `rows * cols` values. Every
/// operation below reads its inputs in full and writes into a freshly
/// allocated buffer, so a result never shares storage with an operand.
/// Callers "mutate" a matrix by rebinding it to the returned value.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wraps a row-major buffer, failing if its length is not `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix> {
        if data.len() != rows * cols {
            return Err(Error::MalformedConstruction {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from nested rows. All rows must share the first row's width.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Matrix> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(Error::MalformedConstruction {
                    rows: rows.len(),
                    cols,
                    len: data.len() + row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Matrix::from_vec(rows.len(), cols, data)
    }

    /// Square identity matrix.
    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        for i in 0..n {
            res.data[i * n + i] = 1.0;
        }
        res
    }

    /// Samples every entry independently from N(0, 1).
    pub fn random_normal<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let data = (0..rows * cols)
            .map(|_| Matrix::sample_standard_normal(rng))
            .collect();
        Matrix { rows, cols, data }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Uniform samples in (0, 1] keep ln() finite.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major view of the backing buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Borrowed view of one row.
    ///
    /// # Panics
    /// Panics if `row >= self.rows()`.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Standard matrix product: (r1 × c1) · (c1 × c2) → (r1 × c2).
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(Error::mismatch("multiply", self.dims(), rhs.dims()));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        // i-k-j order walks both row-major buffers sequentially.
        for i in 0..self.rows {
            let out = &mut res.data[i * rhs.cols..(i + 1) * rhs.cols];
            for k in 0..self.cols {
                let lhs_ik = self.data[i * self.cols + k];
                let rhs_row = &rhs.data[k * rhs.cols..(k + 1) * rhs.cols];
                for (o, r) in out.iter_mut().zip(rhs_row) {
                    *o += lhs_ik * r;
                }
            }
        }

        Ok(res)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn elementwise_multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("elementwise_multiply", rhs, |a, b| a * b)
    }

    pub fn subtract(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("subtract", rhs, |a, b| a - b)
    }

    pub fn scale(&self, alpha: f64) -> Matrix {
        self.map(|x| alpha * x)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }

        res
    }

    /// Applies a position-aware function `f(row, col, value)` to every element.
    pub fn broadcast_apply<F>(&self, f: F) -> Matrix
    where
        F: Fn(usize, usize, f64) -> f64,
    {
        let cols = self.cols;
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(idx, &v)| f(idx / cols, idx % cols, v))
            .collect();
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        self.broadcast_apply(|_, _, v| functor(v))
    }

    /// Adds a 1 × cols row vector to every row.
    pub fn add_row_broadcast(&self, bias: &Matrix) -> Result<Matrix> {
        if bias.rows != 1 || bias.cols != self.cols {
            return Err(Error::mismatch("add_row_broadcast", self.dims(), bias.dims()));
        }
        Ok(self.broadcast_apply(|_, col, v| v + bias.data[col]))
    }

    /// Sums each column over all rows, giving a 1 × cols matrix.
    pub fn column_sums(&self) -> Matrix {
        let mut res = Matrix::zeros(1, self.cols);
        for row in self.data.chunks(self.cols.max(1)) {
            for (acc, v) in res.data.iter_mut().zip(row) {
                *acc += v;
            }
        }
        res
    }

    /// Copies the listed rows, in order, into a new matrix.
    pub fn gather_rows(&self, indices: &[usize]) -> Result<Matrix> {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &idx in indices {
            if idx >= self.rows {
                return Err(Error::mismatch("gather_rows", self.dims(), (idx, self.cols)));
            }
            data.extend_from_slice(self.row(idx));
        }
        Matrix::from_vec(indices.len(), self.cols, data)
    }

    fn zip_with<F>(&self, op: &'static str, rhs: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.dims() != rhs.dims() {
            return Err(Error::mismatch(op, self.dims(), rhs.dims()));
        }
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }
}
