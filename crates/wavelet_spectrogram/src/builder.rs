use crate::{
    constants::{DECIMATION_FACTOR, NORMA_WINDOW_LEN},
    error::{AnalysisError, Result},
    progress::{ProgressController, ProgressObserver},
    render::Colormap,
    sound::{chunk_count, Sound},
    spectrogram::Spectrogram,
};
use cwt::{TransformFactory, WaveletTransform, WindowLength};
use log::{debug, info};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Knobs of one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// `nsamples >> decimation_factor` columns are kept per chunk.
    pub decimation_factor: u32,
    /// Columns in the normalization window of the rendered image. `None` renders raw magnitudes.
    pub normalization_window: Option<usize>,
    pub colormap: Colormap,
    /// Resample to this rate before analysing.
    pub analysis_rate: Option<u32>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            decimation_factor: DECIMATION_FACTOR,
            normalization_window: Some(NORMA_WINDOW_LEN),
            colormap: Colormap::default(),
            analysis_rate: None,
        }
    }
}

impl AnalysisOptions {
    /// # Errors
    /// - [`AnalysisError::InvalidArgument`] for a zero decimation factor, an even or zero window or a zero rate.
    pub fn validate(&self) -> Result<()> {
        if self.decimation_factor == 0 {
            return Err(AnalysisError::InvalidArgument(
                "decimation factor must be at least 1".to_owned(),
            ));
        }
        if let Some(window_len) = self.normalization_window {
            if window_len % 2 == 0 {
                return Err(AnalysisError::InvalidArgument(format!(
                    "normalization window must be a positive odd number of columns, not {window_len}"
                )));
            }
        }
        if self.analysis_rate == Some(0) {
            return Err(AnalysisError::InvalidArgument(
                "analysis rate must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// How a sound is cut up for the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    /// Rate of the analysed (possibly resampled) sound.
    pub sample_rate: u32,
    /// Transform window. Chunks are half of it.
    pub nsamples: usize,
    /// Columns per chunk.
    pub decimate: usize,
    pub chunk_count: usize,
}

impl ChunkLayout {
    /// # Errors
    /// - [`AnalysisError::InvalidArgument`] if the rate is below 2, there are no frames,
    ///   or the decimation factor leaves no columns per chunk.
    pub fn new(sample_rate: u32, frame_count: usize, decimation_factor: u32) -> Result<Self> {
        if sample_rate < 2 {
            return Err(AnalysisError::InvalidArgument(format!(
                "can't analyse a sample rate of {sample_rate}"
            )));
        }
        if frame_count == 0 {
            return Err(AnalysisError::InvalidArgument(
                "can't analyse an empty sound".to_owned(),
            ));
        }
        if decimation_factor == 0 {
            return Err(AnalysisError::InvalidArgument(
                "decimation factor must be at least 1".to_owned(),
            ));
        }
        let nsamples = WindowLength::covering_one_second(sample_rate).samples();
        let decimate = nsamples.checked_shr(decimation_factor).unwrap_or(0);
        if decimate == 0 {
            return Err(AnalysisError::InvalidArgument(format!(
                "decimation factor {decimation_factor} leaves no columns of a {nsamples} sample window"
            )));
        }
        Ok(ChunkLayout {
            sample_rate,
            nsamples,
            decimate,
            chunk_count: chunk_count(frame_count, nsamples),
        })
    }

    /// Samples per chunk.
    #[must_use]
    pub fn half(&self) -> usize {
        self.nsamples / 2
    }

    /// Analysed samples between neighbouring columns.
    #[must_use]
    pub fn samples_per_column(&self) -> usize {
        self.half() / self.decimate
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.chunk_count * self.decimate
    }
}

/// Proof that the holder is the builder's only running analysis. Dropping it frees the builder.
#[derive(Debug)]
#[must_use = "the slot is released as soon as it is dropped"]
pub struct AnalysisSlot {
    busy: Arc<AtomicBool>,
}

impl Drop for AnalysisSlot {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Turns sounds into spectrograms, one at a time.
#[derive(Debug)]
pub struct SpectrogramBuilder<F> {
    factory: F,
    options: AnalysisOptions,
    busy: Arc<AtomicBool>,
}

impl<F: TransformFactory> SpectrogramBuilder<F> {
    pub fn new(factory: F, options: AnalysisOptions) -> Self {
        SpectrogramBuilder {
            factory,
            options,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the builder for one analysis.
    /// # Errors
    /// - [`AnalysisError::Busy`] if an analysis is already running.
    pub fn try_admit(&self) -> Result<AnalysisSlot> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AnalysisError::Busy)?;
        Ok(AnalysisSlot {
            busy: Arc::clone(&self.busy),
        })
    }

    /// Analyse `sound` on the calling thread.
    /// # Errors
    /// - [`AnalysisError::Busy`] if another analysis is running.
    /// - Any error of [`Self::analyze_admitted`].
    pub fn analyze<O>(&self, sound: Sound, observer: &O) -> Result<Spectrogram>
    where
        O: ProgressObserver + ?Sized,
    {
        let slot = self.try_admit()?;
        self.analyze_admitted(&slot, sound, observer)
    }

    /// Analyse `sound` with a slot already claimed by [`Self::try_admit`].
    /// # Errors
    /// - [`AnalysisError::Busy`] if `slot` was claimed from another builder.
    /// - [`AnalysisError::InvalidArgument`] for bad options, bad engine parameters or a sound that can't be chunked.
    /// - [`AnalysisError::Cancelled`] if the observer asked to stop before the last chunk.
    /// - [`AnalysisError::Engine`] if the engine fails or breaks its contract.
    pub fn analyze_admitted<O>(
        &self,
        slot: &AnalysisSlot,
        sound: Sound,
        observer: &O,
    ) -> Result<Spectrogram>
    where
        O: ProgressObserver + ?Sized,
    {
        if !Arc::ptr_eq(&slot.busy, &self.busy) {
            return Err(AnalysisError::Busy);
        }
        self.options.validate()?;
        self.factory
            .validate()
            .map_err(|err| AnalysisError::InvalidArgument(err.to_string()))?;
        let analysed = match self.options.analysis_rate {
            Some(rate) => sound.resample(rate)?,
            None => sound.clone(),
        };
        let layout = ChunkLayout::new(
            analysed.sample_rate(),
            analysed.frame_count(),
            self.options.decimation_factor,
        )?;
        info!(
            "Analysing {} frames at {}Hz: window {} samples, {} chunks, {} columns per chunk",
            analysed.frame_count(),
            layout.sample_rate,
            layout.nsamples,
            layout.chunk_count,
            layout.decimate
        );

        let engine = self.factory.create(layout.sample_rate, layout.nsamples);
        let mut controller = ProgressController::new(analysed.chunks(layout.nsamples)?, observer);
        let output = engine.apply_cwt(controller.by_ref(), layout.decimate);
        // Cancellation takes precedence over whatever the engine made of the shortened input.
        let coefficients = match (controller.finish(), output) {
            (Err(AnalysisError::Cancelled), _) => return Err(AnalysisError::Cancelled),
            (_, Err(err)) => return Err(err.into()),
            (Err(err), _) => return Err(err),
            (Ok(_), Ok(coefficients)) => coefficients,
        };

        let scale = *engine.scale();
        if coefficients.rows() != scale.rows() || coefficients.cols() != layout.columns() {
            return Err(AnalysisError::Engine(format!(
                "expected {}x{} coefficients, got {}x{}",
                scale.rows(),
                layout.columns(),
                coefficients.rows(),
                coefficients.cols()
            )));
        }
        debug!(
            "{} rows from {:.2}Hz to {:.2}Hz",
            scale.rows(),
            scale.max_frequency(),
            scale.min_frequency()
        );

        Spectrogram::new(
            coefficients.map(|x| x.norm()),
            scale,
            layout,
            sound,
            self.options.normalization_window,
            self.options.colormap,
        )
    }
}
