//! Crate for finding the continuous wavelet transform of a real signal one chunk at a time.

use derive_more::{Add, Div, Mul, Sub};
use num_complex::Complex;
use std::time::Duration;

/// Relating to frequency analysis ex. fft based resampling.
pub mod fft;

/// Row-major two dimensional container for transform output.
pub mod matrix;

/// Morlet wavelet engine.
pub mod morlet;

/// Logarithmic row to frequency mapping.
pub mod scale;

pub use matrix::Matrix;
pub use scale::FrequencyScale;

/// A window length. Wraps the number of samples with methods for converting to/from time.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Add, Div, Mul, Sub)]
pub struct WindowLength {
    sample_num: usize,
}

impl WindowLength {
    /// [`WindowLength`] constructor.
    #[must_use]
    pub fn from_samples(sample_num: usize) -> Self {
        WindowLength { sample_num }
    }

    /// Smallest power of two window that holds at least one second of samples.
    /// Computed as `2^(1 + floor(log2(sample_rate - 1)))`.
    /// # Panics
    /// - If `sample_rate < 2`.
    #[must_use]
    pub fn covering_one_second(sample_rate: u32) -> Self {
        assert!(sample_rate >= 2, "sample rate must be at least 2");
        WindowLength {
            sample_num: 1 << (1 + (sample_rate - 1).ilog2()),
        }
    }

    /// Getter for samples
    #[must_use]
    pub fn samples(&self) -> usize {
        self.sample_num
    }

    /// Converts samples to duration. Samples / (samples/sec)= secs
    /// # Arguments
    /// - `sample_rate`: the samples per second.
    #[must_use]
    pub fn duration(&self, sample_rate: f32) -> Duration {
        Duration::from_secs_f32(self.sample_num as f32 / sample_rate)
    }
}

/// `column*(time_samples/column)*(1/(time_sample/sec)) = sec`
#[must_use]
pub fn column_to_time(column: f64, samples_per_column: usize, sample_rate: f64) -> f64 {
    column * samples_per_column as f64 / sample_rate
}

/// `sec*(time_sample/sec)*(1/(time_samples/column)) = column`
#[must_use]
pub fn time_to_column(time: f64, samples_per_column: usize, sample_rate: f64) -> f64 {
    time * sample_rate / samples_per_column as f64
}

/// Consumes a signal split into consecutive chunks and produces complex coefficients.
///
/// Each chunk holds `nsamples / 2` samples (the engine's `nsamples` is fixed when it is created).
/// The last chunk may be shorter. For every chunk the engine appends `decimate` columns, so the output
/// has [`FrequencyScale::rows`] rows and `chunks * decimate` columns.
pub trait WaveletTransform {
    /// Frequency of each output row.
    fn scale(&self) -> &FrequencyScale;

    /// Transform every chunk in order. The engine must pull exactly the chunks it is given and nothing more.
    /// # Errors
    /// - If the underlying transform fails or a chunk is longer than half the window.
    fn apply_cwt<I>(&self, chunks: I, decimate: usize) -> Result<Matrix<Complex<f64>>, TransformError>
    where
        I: Iterator<Item = Vec<f64>>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error(transparent)]
    Fft(#[from] realfft::FftError),
    #[error("chunk of {len} samples doesn't fit a half window of {half}")]
    ChunkTooLong { len: usize, half: usize },
    #[error("decimation must keep at least one column per chunk")]
    NoColumns,
    #[error("invalid engine parameter: {0}")]
    InvalidParameter(String),
}

/// Builds an engine for a particular sound.
pub trait TransformFactory {
    type Engine: WaveletTransform;

    /// Checks the parameters before any engine is created.
    /// # Errors
    /// - [`TransformError::InvalidParameter`] if [`Self::create`] would panic on them.
    fn validate(&self) -> Result<(), TransformError> {
        Ok(())
    }

    /// `nsamples` is the transform window. Chunks passed to the engine are half of it.
    /// Callers must have checked [`Self::validate`].
    fn create(&self, sample_rate: u32, nsamples: usize) -> Self::Engine;
}

#[cfg(test)]
mod tests;
