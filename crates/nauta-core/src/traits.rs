/// Contract for anything the LTSA engine can analyze.
///
/// Restates the "analyzable audio source" capability set: a source must
/// expose a single-channel sample sequence and its sample rate. Channel
/// de-interleaving is the source's job, never the engine's.
///
/// # Example
/// ```
/// use nauta_core::traits::AudioSource;
///
/// struct Tone(Vec<f32>);
/// impl AudioSource for Tone {
///     fn samples(&self) -> &[f32] { &self.0 }
///     fn sample_rate(&self) -> u32 { 48_000 }
/// }
/// ```
pub trait AudioSource {
    /// Single-channel samples, in recording order.
    fn samples(&self) -> &[f32];

    /// Sample rate in Hz. Must be positive.
    fn sample_rate(&self) -> u32;

    /// Duration in seconds, derived from the sample count.
    fn duration(&self) -> f64 {
        self.samples().len() as f64 / f64::from(self.sample_rate())
    }
}
