use std::ops::Range;

/// Payload of an [`LtsaMatrix`].
///
/// Starts as single-precision spectral levels; the scale-to-byte operation
/// converts the payload to `u8` for display or export.
#[derive(Clone, Debug, PartialEq)]
pub enum MatrixData {
    /// Single-precision spectral levels (natural log of mean magnitude).
    F32(Vec<f32>),
    /// 8-bit grayscale intensities after scaling.
    U8(Vec<u8>),
}

/// The LTSA matrix: `rows` frequency bins × `cols` time divisions.
///
/// Storage is column-major (`col * rows + row`) so each division's spectrum
/// occupies one contiguous chunk, disjoint from every other column.
///
/// # Example
/// ```
/// use nauta_core::matrix::LtsaMatrix;
/// let m = LtsaMatrix::zeros(128, 20);
/// assert_eq!(m.rows(), 128);
/// assert_eq!(m.cols(), 20);
/// assert_eq!(m.value(0, 0), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LtsaMatrix {
    rows: usize,
    cols: usize,
    data: MatrixData,
}

impl LtsaMatrix {
    /// Zero-filled single-precision matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: MatrixData::F32(vec![0.0; rows * cols]),
        }
    }

    /// Wrap a column-major `f32` buffer.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    #[must_use]
    pub fn from_f32(rows: usize, cols: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), rows * cols, "buffer does not match shape");
        Self {
            rows,
            cols,
            data: MatrixData::F32(data),
        }
    }

    /// Wrap a column-major byte buffer.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    #[must_use]
    pub fn from_u8(rows: usize, cols: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), rows * cols, "buffer does not match shape");
        Self {
            rows,
            cols,
            data: MatrixData::U8(data),
        }
    }

    /// Number of frequency bins.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of time divisions.
    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Raw payload.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &MatrixData {
        &self.data
    }

    /// `true` once the payload has been scaled to bytes.
    #[inline]
    #[must_use]
    pub fn is_u8(&self) -> bool {
        matches!(self.data, MatrixData::U8(_))
    }

    /// Single-precision payload, if not yet scaled to bytes.
    #[must_use]
    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            MatrixData::F32(v) => Some(v),
            MatrixData::U8(_) => None,
        }
    }

    /// Byte payload, if scaled.
    #[must_use]
    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.data {
            MatrixData::U8(v) => Some(v),
            MatrixData::F32(_) => None,
        }
    }

    /// Value at `(row, col)` regardless of payload type.
    ///
    /// # Panics
    /// Panics if the indices are out of bounds.
    #[inline]
    #[must_use]
    pub fn value(&self, row: usize, col: usize) -> f32 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        let idx = col * self.rows + row;
        match &self.data {
            MatrixData::F32(v) => v[idx],
            MatrixData::U8(v) => f32::from(v[idx]),
        }
    }

    /// Minimum and maximum over all cells. `None` for an empty matrix.
    #[must_use]
    pub fn min_max(&self) -> Option<(f32, f32)> {
        if self.rows * self.cols == 0 {
            return None;
        }
        let fold = |it: &mut dyn Iterator<Item = f32>| {
            it.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
        };
        Some(match &self.data {
            MatrixData::F32(v) => fold(&mut v.iter().copied()),
            MatrixData::U8(v) => fold(&mut v.iter().map(|&b| f32::from(b))),
        })
    }

    /// Linearly map the payload to `[0, 255]` and truncate to bytes.
    ///
    /// A constant matrix maps to all zeros. A byte payload passes through
    /// unchanged.
    #[must_use]
    pub fn scaled_to_u8(self) -> Self {
        let MatrixData::F32(values) = self.data else {
            return self;
        };
        let (lo, hi) = values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let span = hi - lo;
        let bytes = if span > 0.0 {
            values.iter().map(|&v| ((v - lo) * 255.0 / span) as u8).collect()
        } else {
            vec![0u8; values.len()]
        };
        Self {
            rows: self.rows,
            cols: self.cols,
            data: MatrixData::U8(bytes),
        }
    }

    /// Linearly map the payload into `[lo, hi]`, the current minimum landing
    /// exactly on `lo` and the maximum on `hi`.
    ///
    /// A constant matrix maps to all `lo`.
    #[must_use]
    pub fn normalized(self, lo: f32, hi: f32) -> Self {
        let MatrixData::F32(mut values) = self.data else {
            return self;
        };
        let (min, max) = values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(a, b), &v| {
                (a.min(v), b.max(v))
            });
        let span = max - min;
        if span > 0.0 {
            for v in &mut values {
                *v = (*v - min) / span * (hi - lo) + lo;
            }
        } else {
            values.fill(lo);
        }
        Self {
            rows: self.rows,
            cols: self.cols,
            data: MatrixData::F32(values),
        }
    }

    /// Copy out the sub-matrix `rows × cols`, preserving the payload type.
    ///
    /// # Panics
    /// Panics if either range exceeds the current shape.
    #[must_use]
    pub fn slice(&self, row_range: Range<usize>, col_range: Range<usize>) -> Self {
        assert!(row_range.end <= self.rows && col_range.end <= self.cols);
        let new_rows = row_range.len();
        let new_cols = col_range.len();
        let copy_cols = |src_col: usize| src_col * self.rows + row_range.start;
        let data = match &self.data {
            MatrixData::F32(v) => MatrixData::F32(
                col_range
                    .clone()
                    .flat_map(|c| v[copy_cols(c)..copy_cols(c) + new_rows].iter().copied())
                    .collect(),
            ),
            MatrixData::U8(v) => MatrixData::U8(
                col_range
                    .clone()
                    .flat_map(|c| v[copy_cols(c)..copy_cols(c) + new_rows].iter().copied())
                    .collect(),
            ),
        };
        Self {
            rows: new_rows,
            cols: new_cols,
            data,
        }
    }
}
