use crate::{
    builder::SpectrogramBuilder,
    error::{AnalysisError, Result},
    progress::ProgressHandle,
    sound::Sound,
    spectrogram::Spectrogram,
};
use cwt::TransformFactory;
use log::{info, warn};
use parking_lot::RwLock;
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

/// Runs analyses on a background thread and keeps the most recent result.
#[derive(Debug)]
pub struct AnalysisWorker<F> {
    builder: Arc<SpectrogramBuilder<F>>,
    latest: Arc<RwLock<Option<Arc<Spectrogram>>>>,
}

impl<F> Clone for AnalysisWorker<F> {
    fn clone(&self) -> Self {
        AnalysisWorker {
            builder: Arc::clone(&self.builder),
            latest: Arc::clone(&self.latest),
        }
    }
}

/// A running analysis.
#[derive(Debug)]
#[must_use = "dropping the job detaches the analysis"]
pub struct AnalysisJob {
    progress: ProgressHandle,
    handle: JoinHandle<Result<Arc<Spectrogram>>>,
}

impl AnalysisJob {
    /// Ask the analysis to stop at the next chunk boundary.
    pub fn cancel(&self) {
        self.progress.cancel();
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressHandle {
        &self.progress
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the result.
    /// # Errors
    /// - Whatever the analysis failed with.
    /// - [`AnalysisError::Engine`] if the analysis thread panicked.
    pub fn join(self) -> Result<Arc<Spectrogram>> {
        self.handle
            .join()
            .map_err(|_| AnalysisError::Engine("analysis thread panicked".to_owned()))?
    }
}

impl<F> AnalysisWorker<F>
where
    F: TransformFactory + Send + Sync + 'static,
{
    pub fn new(builder: SpectrogramBuilder<F>) -> Self {
        AnalysisWorker {
            builder: Arc::new(builder),
            latest: Arc::new(RwLock::new(None)),
        }
    }

    #[must_use]
    pub fn builder(&self) -> &SpectrogramBuilder<F> {
        &self.builder
    }

    /// Last spectrogram that finished successfully.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<Spectrogram>> {
        self.latest.read().clone()
    }

    /// Start analysing `sound` without blocking.
    /// # Errors
    /// - [`AnalysisError::Busy`] if an analysis is already running. Nothing is spawned.
    pub fn start(&self, sound: Sound) -> Result<AnalysisJob> {
        let slot = self.builder.try_admit()?;
        let progress = ProgressHandle::new();
        let observer = progress.clone();
        let builder = Arc::clone(&self.builder);
        let latest = Arc::clone(&self.latest);
        let handle = thread::spawn(move || {
            // The slot outlives the update of `latest` so runs publish in the order they were admitted.
            let result = match builder.analyze_admitted(&slot, sound, &observer) {
                Ok(spectrogram) => {
                    let spectrogram = Arc::new(spectrogram);
                    *latest.write() = Some(Arc::clone(&spectrogram));
                    info!("Spectrogram ready");
                    Ok(spectrogram)
                }
                Err(err) => {
                    warn!("Analysis stopped: {err}");
                    Err(err)
                }
            };
            observer.set_finished();
            drop(slot);
            result
        });
        Ok(AnalysisJob { progress, handle })
    }
}
