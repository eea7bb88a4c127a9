use realfft::RealFftPlanner;

/// Windowed real FFT for one spectral sub-window.
///
/// Pre-allocates the FFT plan and scratch buffers for zero-allocation use
/// inside the division loop. The Hann window has length `subdiv_len`; the
/// windowed sub-window is zero-padded (or truncated) to `nfft` before the
/// transform.
///
/// # Example
/// ```
/// use nauta_ltsa::fft::SubdivFft;
/// let fft = SubdivFft::new(256, 256);
/// assert_eq!(fft.bins(), 128);
/// ```
pub struct SubdivFft {
    subdiv_len: usize,
    nfft: usize,
    input_buf: Vec<f32>,
    spectrum_buf: Vec<realfft::num_complex::Complex<f32>>,
    scratch: Vec<realfft::num_complex::Complex<f32>>,
    plan: std::sync::Arc<dyn realfft::RealToComplex<f32>>,
    /// Hann window coefficients, length `subdiv_len`.
    window: Vec<f32>,
}

impl SubdivFft {
    /// Create a pipeline for sub-windows of `subdiv_len` samples transformed
    /// at length `nfft`.
    ///
    /// # Panics
    /// Panics if `subdiv_len` or `nfft` is 0.
    #[must_use]
    pub fn new(subdiv_len: usize, nfft: usize) -> Self {
        assert!(subdiv_len > 0, "subdiv_len must be > 0");
        assert!(nfft > 0, "nfft must be > 0");

        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(nfft);

        let input_buf = plan.make_input_vec();
        let spectrum_buf = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();

        // Hann window
        let window: Vec<f32> = (0..subdiv_len)
            .map(|i| {
                0.5 * (1.0
                    - (2.0 * std::f32::consts::PI * i as f32 / (subdiv_len as f32 - 1.0)).cos())
            })
            .collect();

        Self {
            subdiv_len,
            nfft,
            input_buf,
            spectrum_buf,
            scratch,
            plan,
            window,
        }
    }

    /// Window `samples`, transform, and add the magnitude of the first
    /// `nfft/2` bins into `acc`.
    ///
    /// `samples` must hold exactly `subdiv_len` samples and `acc` exactly
    /// `nfft/2` slots.
    pub fn accumulate_magnitudes(&mut self, samples: &[f32], acc: &mut [f32]) {
        debug_assert_eq!(samples.len(), self.subdiv_len);
        debug_assert_eq!(acc.len(), self.nfft / 2);

        let n = self.subdiv_len.min(self.nfft);
        for (i, slot) in self.input_buf.iter_mut().enumerate() {
            *slot = if i < n { samples[i] * self.window[i] } else { 0.0 };
        }

        if self
            .plan
            .process_with_scratch(&mut self.input_buf, &mut self.spectrum_buf, &mut self.scratch)
            .is_err()
        {
            log::warn!("FFT plan failed for nfft={}, sub-window skipped", self.nfft);
            return;
        }

        for (slot, c) in acc.iter_mut().zip(self.spectrum_buf.iter()) {
            *slot += (c.re * c.re + c.im * c.im).sqrt();
        }
    }

    /// Sub-window length in samples.
    #[must_use]
    pub fn subdiv_len(&self) -> usize {
        self.subdiv_len
    }

    /// Number of one-sided spectrum bins kept (`nfft / 2`).
    #[must_use]
    pub fn bins(&self) -> usize {
        self.nfft / 2
    }
}
