use std::ops::{Index, IndexMut};

/// Row-major matrix. Rows are frequencies and columns are time for transform output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Matrix<T> {
    /// Builds from one vector per row.
    /// # Panics
    /// - If rows differ in length.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let row_cnt = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|row| row.len() == cols),
            "every row must have the same length"
        );
        Matrix {
            rows: row_cnt,
            cols,
            data: rows.into_iter().flatten().collect(),
        }
    }

    /// Builds from row-major data.
    /// # Panics
    /// - If `data.len() != rows * cols`.
    #[must_use]
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), rows * cols, "data doesn't fit {rows}x{cols}");
        Matrix { rows, cols, data }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// A single row.
    /// # Panics
    /// - If `row` is out of bounds.
    #[must_use]
    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.rows, "row {row} out of bounds");
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// A single mutable row.
    /// # Panics
    /// - If `row` is out of bounds.
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        assert!(row < self.rows, "row {row} out of bounds");
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Each row from row 0 down.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(|row| self.row(row))
    }

    /// Every value in row-major order.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Applies `f` element-wise.
    #[must_use]
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Matrix<U> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(col < self.cols, "column {col} out of bounds");
        &self.row(row)[col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        assert!(col < self.cols, "column {col} out of bounds");
        &mut self.row_mut(row)[col]
    }
}

#[cfg(test)]
mod tests {
    use super::Matrix;

    #[test]
    fn row_major_layout() {
        let matrix = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!((matrix.rows(), matrix.cols()), (2, 3));
        assert_eq!(matrix.data(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(matrix.row(1), &[4, 5, 6]);
        assert_eq!(matrix[(0, 2)], 3);
        assert_eq!(matrix.get(2, 0), None);
        assert_eq!(matrix.get(0, 3), None);
        assert_eq!(
            matrix.iter_rows().map(<[i32]>::to_vec).collect::<Vec<_>>(),
            vec![vec![1, 2, 3], vec![4, 5, 6]]
        );
    }

    #[test]
    fn map_keeps_shape() {
        let matrix = Matrix::from_vec(2, 2, vec![1.0, -2.0, 3.0, -4.0]).map(|x: &f64| x.abs());
        assert_eq!(matrix, Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]));
    }

    #[test]
    fn empty() {
        let matrix = Matrix::<f64>::from_rows(vec![]);
        assert!(matrix.is_empty());
        assert_eq!(matrix.iter_rows().count(), 0);
    }

    #[test]
    #[should_panic]
    fn ragged_rows_panic() {
        let _ = Matrix::from_rows(vec![vec![1], vec![2, 3]]);
    }
}
