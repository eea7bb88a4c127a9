use serde::{Deserialize, Serialize};

use crate::error::LtsaError;

/// Analysis parameters for the Long-Term Spectral Average.
///
/// Defaults follow the Scripps LTSA convention: half-second divisions and a
/// sub-window length equal to the power of two nearest to one fifth of the
/// sample rate.
///
/// # Example
/// ```
/// use nauta_core::params::LtsaParams;
/// let params = LtsaParams::defaults(1000);
/// assert_eq!(params.div_len, 500);
/// assert_eq!(params.subdiv_len, 256);
/// assert_eq!(params.noverlap, 0);
/// assert!(params.nfft.is_none());
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LtsaParams {
    /// Samples per time-division (one output column per division).
    pub div_len: usize,
    /// Samples per spectral sub-window within a division.
    pub subdiv_len: usize,
    /// FFT transform length. `None` resolves to `subdiv_len` at compute time.
    pub nfft: Option<usize>,
    /// Samples of overlap between consecutive sub-windows.
    pub noverlap: usize,
}

impl LtsaParams {
    /// Default parameters for the given sample rate.
    #[must_use]
    pub fn defaults(sample_rate: u32) -> Self {
        let fs = f64::from(sample_rate);
        Self {
            // Half-second divisions.
            div_len: (fs / 2.0).round() as usize,
            // Nearest power of two to fs/5.
            subdiv_len: 2f64.powf((fs / 5.0).log2().round()) as usize,
            nfft: None,
            noverlap: 0,
        }
    }

    /// Check parameter invariants.
    ///
    /// # Errors
    /// Returns [`LtsaError::Config`] if `div_len` or `subdiv_len` is zero,
    /// or if `noverlap >= subdiv_len` (zero or negative slip).
    pub fn validate(&self) -> Result<(), LtsaError> {
        if self.div_len == 0 {
            return Err(LtsaError::Config("div_len must be positive".into()));
        }
        if self.subdiv_len == 0 {
            return Err(LtsaError::Config("subdiv_len must be positive".into()));
        }
        if self.noverlap >= self.subdiv_len {
            return Err(LtsaError::Config(format!(
                "overlap exceeds subdiv_len, slip = {}",
                self.subdiv_len as i64 - self.noverlap as i64
            )));
        }
        Ok(())
    }

    /// Sub-window hop in samples. Callers must `validate()` first.
    #[inline]
    #[must_use]
    pub fn slip(&self) -> usize {
        debug_assert!(self.noverlap < self.subdiv_len, "slip must be positive");
        self.subdiv_len - self.noverlap
    }

    /// FFT length with the unset sentinel resolved to `subdiv_len`.
    #[inline]
    #[must_use]
    pub fn resolved_nfft(&self) -> usize {
        self.nfft.unwrap_or(self.subdiv_len)
    }

    /// Apply a set of overrides. Derived sizes must be recomputed afterwards.
    pub fn apply(&mut self, overrides: &ParamOverrides) {
        if let Some(div_len) = overrides.div_len {
            self.div_len = div_len;
        }
        if let Some(subdiv_len) = overrides.subdiv_len {
            self.subdiv_len = subdiv_len;
        }
        if let Some(nfft) = overrides.nfft {
            self.nfft = Some(nfft);
        }
        if let Some(noverlap) = overrides.noverlap {
            self.noverlap = noverlap;
        }
    }

    /// Re-derive the division and sub-window counts for a signal length.
    ///
    /// Must be called after every parameter change; the engine never keeps
    /// stale derived values.
    ///
    /// # Example
    /// ```
    /// use nauta_core::params::LtsaParams;
    /// let params = LtsaParams::defaults(1000);
    /// let sizes = params.derive_sizes(10_000);
    /// assert_eq!(sizes.ndivs, 20);
    /// assert_eq!(sizes.nsubdivs, 1);
    /// ```
    #[must_use]
    pub fn derive_sizes(&self, nsamples: usize) -> DerivedSizes {
        debug_assert!(self.div_len > 0 && self.noverlap < self.subdiv_len);
        DerivedSizes {
            nsamples,
            ndivs: nsamples / self.div_len,
            nsubdivs: self.div_len / self.slip(),
        }
    }
}

/// Sizes derived from the parameters and the signal length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivedSizes {
    /// Signal length in samples at derivation time.
    pub nsamples: usize,
    /// Number of time-divisions: `floor(nsamples / div_len)`.
    pub ndivs: usize,
    /// Estimated sub-windows per division: `floor(div_len / slip)`.
    ///
    /// The spectrum loop counts its sub-windows itself; this estimate can
    /// overshoot by one because the loop drops the sub-window touching the
    /// division boundary.
    pub nsubdivs: usize,
}

/// Partial parameter overrides.
///
/// Deserializable from TOML; unknown keys are rejected so a typo in an
/// override file surfaces as a configuration error instead of a silently
/// ignored setting.
///
/// # Example
/// ```
/// use nauta_core::params::ParamOverrides;
/// let ov = ParamOverrides::from_toml_str("div_len = 800\nnoverlap = 64").unwrap();
/// assert_eq!(ov.div_len, Some(800));
/// assert!(ParamOverrides::from_toml_str("divlen = 800").is_err());
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParamOverrides {
    /// Override for [`LtsaParams::div_len`].
    pub div_len: Option<usize>,
    /// Override for [`LtsaParams::subdiv_len`].
    pub subdiv_len: Option<usize>,
    /// Override for [`LtsaParams::nfft`].
    pub nfft: Option<usize>,
    /// Override for [`LtsaParams::noverlap`].
    pub noverlap: Option<usize>,
}

impl ParamOverrides {
    /// Parse overrides from a TOML document.
    ///
    /// # Errors
    /// Returns [`LtsaError::Config`] on malformed TOML or unrecognized keys.
    pub fn from_toml_str(s: &str) -> Result<Self, LtsaError> {
        toml::from_str(s).map_err(|e| LtsaError::Config(format!("invalid parameter override: {e}")))
    }
}
