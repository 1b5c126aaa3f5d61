use crate::error::{AnalysisError, Result};
use cwt::Matrix;
use iterator_adapters::IteratorAdapter;
use log::trace;

/// Evens out loudness along time.
///
/// Every value is divided by the mean of the `window_len` values centered on it in the same row
/// (fewer at the row's ends) and multiplied by the mean of the whole row, so quiet passages are
/// lifted and loud ones flattened while each row keeps its overall level.
/// Windows shorter than 3 leave the matrix unchanged. Values whose local mean is 0 are kept.
/// # Errors
/// - [`AnalysisError::InvalidArgument`] if `window_len` is even or 0.
pub fn normalize_horizontal(matrix: &mut Matrix<f64>, window_len: usize) -> Result<()> {
    if window_len % 2 == 0 {
        return Err(AnalysisError::InvalidArgument(format!(
            "normalization window must be a positive odd number of columns, not {window_len}"
        )));
    }
    if window_len < 3 {
        return Ok(());
    }
    trace!(
        "Normalizing {}x{} with window {window_len}",
        matrix.rows(),
        matrix.cols()
    );
    for row in 0..matrix.rows() {
        let row = matrix.row_mut(row);
        let row_mean = row.iter().copied().mean();
        let local_means = row
            .iter()
            .copied()
            .centered_means(window_len)
            .collect::<Vec<_>>();
        for (value, local_mean) in row.iter_mut().zip(local_means) {
            if local_mean != 0.0 {
                *value *= row_mean / local_mean;
            }
        }
    }
    Ok(())
}
