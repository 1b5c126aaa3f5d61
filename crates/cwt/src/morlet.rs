use crate::{FrequencyScale, Matrix, TransformError, TransformFactory, WaveletTransform};
use log::debug;
use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::{f64::consts::PI, fmt, sync::Arc};

/// Filters are cut off this many standard deviations from their center frequency.
pub const BAND_SIGMAS: f64 = 6.0;

/// Parameters of the Morlet engine. Also the factory that builds it for a given sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorletParams {
    /// Octaves between neighbouring rows.
    pub scale_resolution: f64,
    /// Center angular frequency of the mother wavelet. Larger trades time resolution for frequency resolution.
    pub omega0: f64,
    /// Lowest analysed frequency. Defaults to `omega0 * sample_rate / nsamples`.
    pub min_frequency: Option<f64>,
    /// Highest analysed frequency. Defaults to (and is capped at) Nyquist.
    pub max_frequency: Option<f64>,
}

impl Default for MorletParams {
    fn default() -> Self {
        MorletParams {
            scale_resolution: 1.0 / 72.0,
            omega0: 70.0,
            min_frequency: None,
            max_frequency: None,
        }
    }
}

impl MorletParams {
    /// Frequency rows for a sound at `sample_rate` analysed with windows of `nsamples`.
    #[must_use]
    pub fn scale(&self, sample_rate: u32, nsamples: usize) -> FrequencyScale {
        let nyquist = f64::from(sample_rate) / 2.0;
        let max = self.max_frequency.map_or(nyquist, |f| f.min(nyquist));
        let min = self
            .min_frequency
            .unwrap_or(self.omega0 * f64::from(sample_rate) / nsamples as f64)
            .min(max);
        FrequencyScale::new(max, min, self.scale_resolution)
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), TransformError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TransformError::InvalidParameter(format!(
            "{name} must be positive and finite, not {value}"
        )))
    }
}

impl TransformFactory for MorletParams {
    type Engine = MorletBox;

    fn validate(&self) -> Result<(), TransformError> {
        require_positive("scale resolution", self.scale_resolution)?;
        require_positive("omega0", self.omega0)?;
        if let Some(min) = self.min_frequency {
            require_positive("min frequency", min)?;
        }
        if let Some(max) = self.max_frequency {
            require_positive("max frequency", max)?;
        }
        Ok(())
    }

    fn create(&self, sample_rate: u32, nsamples: usize) -> MorletBox {
        MorletBox::new(
            sample_rate,
            nsamples,
            self.scale(sample_rate, nsamples),
            self.omega0,
        )
    }
}

/// Nonzero part of one row's frequency response. Bin `first_bin + i` is weighted by `weights[i]`.
#[derive(Debug, Clone, PartialEq)]
struct RowFilter {
    first_bin: usize,
    weights: Vec<f64>,
}

impl RowFilter {
    /// Analytic Morlet response `2 * exp(-(s*w - omega0)^2 / 2)` with `s = omega0 / (2 pi frequency)`
    /// sampled on the positive bins of a `fft_len` point transform.
    fn new(frequency: f64, omega0: f64, sample_rate: f64, fft_len: usize) -> Self {
        let scale = omega0 / (2.0 * PI * frequency);
        let bin_width = sample_rate / fft_len as f64;
        let center = frequency / bin_width;
        let sigma = frequency / (omega0 * bin_width);

        let first_bin = ((center - BAND_SIGMAS * sigma).floor().max(1.0)) as usize;
        let last_bin = ((center + BAND_SIGMAS * sigma).ceil() as usize).min(fft_len / 2);
        let weights = (first_bin..=last_bin)
            .map(|bin| {
                let omega = 2.0 * PI * bin as f64 * bin_width;
                2.0 * (-(scale * omega - omega0).powi(2) / 2.0).exp()
            })
            .collect();
        RowFilter { first_bin, weights }
    }
}

/// `i^k`
fn quarter_turns(k: usize) -> Complex<f64> {
    match k % 4 {
        0 => Complex::new(1.0, 0.0),
        1 => Complex::new(0.0, 1.0),
        2 => Complex::new(-1.0, 0.0),
        _ => Complex::new(0.0, -1.0),
    }
}

/// Morlet continuous wavelet transform over half-window chunks.
///
/// A chunk's columns are computed once the following chunk has arrived, with the chunks on either side
/// in the window (zeros before the first and after the last) so wavelets near its edges see real signal.
/// The window is zero padded to twice `nsamples` to keep the circular convolution from wrapping.
/// Only the `decimate` evenly spaced columns that fall inside the middle chunk are evaluated.
pub struct MorletBox {
    nsamples: usize,
    scale: FrequencyScale,
    filters: Vec<RowFilter>,
    r2c: Arc<dyn RealToComplex<f64>>,
}

impl fmt::Debug for MorletBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MorletBox")
            .field("nsamples", &self.nsamples)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

/// Buffers reused across the chunks of one transform.
struct Workspace {
    window: Vec<f64>,
    spectrum: Vec<Complex<f64>>,
    folded: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    decimate: usize,
}

impl MorletBox {
    /// # Panics
    /// - If `nsamples` is odd or zero.
    #[must_use]
    pub fn new(sample_rate: u32, nsamples: usize, scale: FrequencyScale, omega0: f64) -> Self {
        assert!(
            nsamples >= 2 && nsamples % 2 == 0,
            "window must hold two equal chunks"
        );
        let fft_len = 2 * nsamples;
        let filters = (0..scale.rows())
            .map(|row| RowFilter::new(scale.y2freq(row), omega0, f64::from(sample_rate), fft_len))
            .collect::<Vec<_>>();
        debug!(
            "Morlet engine: {} rows from {:.2}Hz to {:.2}Hz, fft length {fft_len}",
            scale.rows(),
            scale.max_frequency(),
            scale.min_frequency()
        );
        MorletBox {
            nsamples,
            scale,
            filters,
            r2c: RealFftPlanner::<f64>::new().plan_fft_forward(fft_len),
        }
    }

    #[must_use]
    pub fn nsamples(&self) -> usize {
        self.nsamples
    }

    /// Appends the columns of `parts[1]` to `rows`. `parts` are consecutive chunks.
    fn emit(
        &self,
        workspace: &mut Workspace,
        parts: [&[f64]; 3],
        rows: &mut [Vec<Complex<f64>>],
    ) -> Result<(), TransformError> {
        let half = self.nsamples / 2;
        let Workspace {
            window,
            spectrum,
            folded,
            scratch,
            inverse,
            decimate,
        } = workspace;
        window.fill(0.0);
        for (i, part) in parts.iter().enumerate() {
            window[i * half..i * half + part.len()].copy_from_slice(part);
        }
        let scale_factor = 1.0 / window.len() as f64;
        self.r2c.process(window, spectrum)?;

        // Output j sits at window position `half + j * half / decimate`, which is
        // `fft_len / fold_len * (decimate + j)`. So the inverse transform only needs the spectrum
        // folded modulo `fold_len` after a phase shift of `i^k`.
        let fold_len = folded.len();
        for (filter, row) in self.filters.iter().zip(rows.iter_mut()) {
            folded.fill(Complex::zero());
            for (offset, weight) in filter.weights.iter().enumerate() {
                let bin = filter.first_bin + offset;
                folded[bin % fold_len] += spectrum[bin] * quarter_turns(bin) * *weight;
            }
            inverse.process_with_scratch(folded, scratch);
            row.extend(folded[..*decimate].iter().map(|x| x * scale_factor));
        }
        Ok(())
    }
}

impl WaveletTransform for MorletBox {
    fn scale(&self) -> &FrequencyScale {
        &self.scale
    }

    fn apply_cwt<I>(&self, chunks: I, decimate: usize) -> Result<Matrix<Complex<f64>>, TransformError>
    where
        I: Iterator<Item = Vec<f64>>,
    {
        if decimate == 0 {
            return Err(TransformError::NoColumns);
        }
        let half = self.nsamples / 2;
        let inverse = FftPlanner::<f64>::new().plan_fft_inverse(4 * decimate);
        let mut workspace = Workspace {
            window: self.r2c.make_input_vec(),
            spectrum: self.r2c.make_output_vec(),
            folded: vec![Complex::zero(); 4 * decimate],
            scratch: vec![Complex::zero(); inverse.get_inplace_scratch_len()],
            inverse,
            decimate,
        };
        let mut rows = vec![Vec::new(); self.filters.len()];

        let mut before = vec![0.0; half];
        let mut pending: Option<Vec<f64>> = None;
        for chunk in chunks {
            if chunk.len() > half {
                return Err(TransformError::ChunkTooLong {
                    len: chunk.len(),
                    half,
                });
            }
            if let Some(current) = pending.take() {
                self.emit(&mut workspace, [&before, &current, &chunk], &mut rows)?;
                before = current;
            }
            pending = Some(chunk);
        }
        if let Some(current) = pending {
            self.emit(&mut workspace, [&before, &current, &[]], &mut rows)?;
        }
        Ok(Matrix::from_rows(rows))
    }
}
