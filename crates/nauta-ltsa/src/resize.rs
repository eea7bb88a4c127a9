use nauta_core::error::LtsaError;
use nauta_core::matrix::{LtsaMatrix, MatrixData};

/// Resample the matrix vertically to `target_rows` by nearest-row-index
/// selection: source row `⌊linspace(0, rows−1, target)⌋` for each output
/// row. Columns are untouched. Presentation-only; the engine's matrix is
/// not modified.
///
/// # Errors
/// Returns [`LtsaError::Range`] if `target_rows` is 0 or exceeds the
/// current row count.
///
/// # Example
/// ```
/// use nauta_core::matrix::LtsaMatrix;
/// use nauta_ltsa::resize::resample_rows;
/// let m = LtsaMatrix::zeros(128, 20);
/// let small = resample_rows(&m, 32).unwrap();
/// assert_eq!(small.rows(), 32);
/// assert_eq!(small.cols(), 20);
/// ```
pub fn resample_rows(matrix: &LtsaMatrix, target_rows: usize) -> Result<LtsaMatrix, LtsaError> {
    let rows = matrix.rows();
    if target_rows == 0 || target_rows > rows {
        return Err(LtsaError::Range(format!(
            "resize out of range: {target_rows} (matrix has {rows} rows)"
        )));
    }
    let indices = row_indices(rows, target_rows);
    let cols = matrix.cols();

    fn pick<T: Copy>(src: &[T], rows: usize, cols: usize, indices: &[usize]) -> Vec<T> {
        let mut out = Vec::with_capacity(indices.len() * cols);
        for col in 0..cols {
            let base = col * rows;
            out.extend(indices.iter().map(|&r| src[base + r]));
        }
        out
    }

    Ok(match matrix.data() {
        MatrixData::F32(v) => {
            LtsaMatrix::from_f32(target_rows, cols, pick(v, rows, cols, &indices))
        }
        MatrixData::U8(v) => LtsaMatrix::from_u8(target_rows, cols, pick(v, rows, cols, &indices)),
    })
}

/// Nearest source-row index for each of `target` evenly spaced rows.
fn row_indices(rows: usize, target: usize) -> Vec<usize> {
    if target == 1 {
        return vec![0];
    }
    (0..target)
        .map(|i| (i as f64 * (rows - 1) as f64 / (target - 1) as f64).floor() as usize)
        .collect()
}
