/// Visible time/frequency window of the LTSA matrix.
///
/// Used by the renderer for axis labeling. Initialized to the full extent of
/// the signal and narrowed only by the crop operation.
///
/// # Example
/// ```
/// use nauta_core::viewport::Viewport;
/// let vp = Viewport::full_extent(10_000, 1000);
/// assert_eq!(vp.tmin, 0.0);
/// assert_eq!(vp.tmax, 10.0);
/// assert_eq!(vp.fmax, 500.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Lower time bound, seconds.
    pub tmin: f64,
    /// Upper time bound, seconds.
    pub tmax: f64,
    /// Lower frequency bound, Hz.
    pub fmin: f64,
    /// Upper frequency bound, Hz (at most the Nyquist frequency).
    pub fmax: f64,
}

impl Viewport {
    /// Full-extent viewport for a signal: `[0, ⌊duration⌋] × [0, ⌊Nyquist⌋]`.
    ///
    /// The whole-second floor on `tmax` matches the pre-compute display
    /// convention; compute replaces it with the exact truncated duration.
    #[must_use]
    pub fn full_extent(nsamples: usize, sample_rate: u32) -> Self {
        let fs = f64::from(sample_rate);
        Self {
            tmin: 0.0,
            tmax: (nsamples as f64 / fs).floor(),
            fmin: 0.0,
            fmax: (fs / 2.0).floor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_extent_floors_partial_seconds() {
        let vp = Viewport::full_extent(10_900, 1000);
        assert_eq!(vp.tmax, 10.0);
    }

    #[test]
    fn full_extent_floors_odd_nyquist() {
        let vp = Viewport::full_extent(1000, 44101);
        assert_eq!(vp.fmax, 22050.0);
    }
}
