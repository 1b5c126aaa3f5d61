use crate::{
    error::{AnalysisError, Result},
    file_io,
};
use iterator_adapters::{IteratorAdapter, WithLength};
use log::{debug, trace};
use std::{ops::Range, path::Path, sync::Arc};

/// A single channel of immutable samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    samples: Arc<[f64]>,
    sample_rate: u32,
    /// Seconds. Carried over from the source when resampling.
    duration: f64,
}

/// Number of half-window chunks `frame_count` samples split into. `window_len` must be at least 2.
#[must_use]
pub fn chunk_count(frame_count: usize, window_len: usize) -> usize {
    match frame_count {
        0 => 0,
        _ => (frame_count - 1) / (window_len / 2) + 1,
    }
}

impl Sound {
    /// # Errors
    /// - [`AnalysisError::InvalidArgument`] if `sample_rate` is 0 or there are no samples.
    pub fn from_samples(samples: impl Into<Arc<[f64]>>, sample_rate: u32) -> Result<Self> {
        let samples = samples.into();
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidArgument(
                "sample rate must be positive".to_owned(),
            ));
        }
        if samples.is_empty() {
            return Err(AnalysisError::InvalidArgument(
                "a sound needs at least one sample".to_owned(),
            ));
        }
        let duration = samples.len() as f64 / f64::from(sample_rate);
        Ok(Sound {
            samples,
            sample_rate,
            duration,
        })
    }

    /// Load `channel` of a wav file.
    /// # Errors
    /// - [`AnalysisError::Io`] if the file can't be decoded or is empty.
    /// - [`AnalysisError::InvalidArgument`] if the file doesn't have `channel`.
    pub fn open(path: &Path, channel: usize) -> Result<Self> {
        let (spec, data) = file_io::read_wav(path, channel)?;
        if data.is_empty() {
            return Err(AnalysisError::Io {
                path: path.to_owned(),
                reason: "no frames".to_owned(),
            });
        }
        debug!(
            "Opened '{}': {} frames at {}Hz",
            path.display(),
            data.len(),
            spec.sample_rate
        );
        Sound::from_samples(data, spec.sample_rate)
    }

    /// Save as a mono 32 bit float wav file.
    /// # Errors
    /// - [`AnalysisError::Io`] if the file can't be written.
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        file_io::write_wav(
            path,
            self.sample_rate,
            self.samples.iter().map(|&x| x as f32),
        )
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.samples.len()
    }

    /// Length in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Band-limited resample to `target_rate`. The result keeps this sound's duration.
    /// # Errors
    /// - [`AnalysisError::InvalidArgument`] if `target_rate` is 0 or the result would be empty.
    pub fn resample(&self, target_rate: u32) -> Result<Sound> {
        if target_rate == 0 {
            return Err(AnalysisError::InvalidArgument(
                "target rate must be positive".to_owned(),
            ));
        }
        if target_rate == self.sample_rate {
            return Ok(self.clone());
        }
        let data = cwt::fft::resample(&self.samples, self.sample_rate, target_rate)
            .map_err(|err| AnalysisError::Engine(err.to_string()))?;
        if data.is_empty() {
            return Err(AnalysisError::InvalidArgument(format!(
                "resampling {} frames to {target_rate}Hz leaves nothing",
                self.frame_count()
            )));
        }
        trace!(
            "Resampled {}Hz -> {target_rate}Hz, {} -> {} frames",
            self.sample_rate,
            self.frame_count(),
            data.len()
        );
        Ok(Sound {
            samples: data.into(),
            sample_rate: target_rate,
            duration: self.duration,
        })
    }

    /// Consecutive chunks of `window_len / 2` samples. The last chunk may be shorter.
    /// The number of chunks is known before iterating.
    /// # Errors
    /// - [`AnalysisError::InvalidArgument`] if `window_len < 2`.
    pub fn chunks(
        &self,
        window_len: usize,
    ) -> Result<WithLength<impl Iterator<Item = Vec<f64>> + '_>> {
        if window_len < 2 {
            return Err(AnalysisError::InvalidArgument(format!(
                "window of {window_len} samples can't be split into halves"
            )));
        }
        let count = chunk_count(self.frame_count(), window_len);
        Ok(self
            .samples
            .iter()
            .copied()
            .chunks(window_len / 2)
            .with_length(count))
    }

    /// Copy of the samples in `range`.
    /// # Errors
    /// - [`AnalysisError::OutOfRange`] if `range` is empty or extends past the last sample.
    pub fn slice(&self, range: Range<usize>) -> Result<Sound> {
        if range.is_empty() || range.end > self.frame_count() {
            return Err(AnalysisError::OutOfRange(format!(
                "samples {range:?} of a sound with {} frames",
                self.frame_count()
            )));
        }
        Sound::from_samples(&self.samples[range], self.sample_rate)
    }
}
