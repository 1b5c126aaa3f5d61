use crate::error::{AnalysisError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

/// Position of a run through its chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub position: usize,
    pub total: usize,
    pub cancelled: bool,
}

impl ProgressState {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.position == self.total
    }
}

/// Receives progress of a run and may ask for it to stop.
/// Every method has a no-op default so observers only implement what they need.
pub trait ProgressObserver {
    /// Called once before the first chunk.
    fn begin(&self, _total: usize) {}
    /// Called with the new position before each chunk is handed to the engine.
    fn advance(&self, _position: usize) {}
    /// Polled at every chunk boundary.
    fn is_cancel_requested(&self) -> bool {
        false
    }
    /// Called once when the run stops, whether it completed or not.
    fn end(&self, _state: &ProgressState) {}
}

/// Wraps a sequence of known length. Reports each step to an observer and stops early when cancelled.
///
/// Once every element has been handed out a cancellation request is no longer observed,
/// so a request that arrives after the last element is a normal completion.
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct ProgressController<'o, I, O: ?Sized> {
    iter: I,
    observer: &'o O,
    state: ProgressState,
}

impl<'o, I, O> ProgressController<'o, I, O>
where
    I: ExactSizeIterator,
    O: ProgressObserver + ?Sized,
{
    /// Starts a run over `iter`. The observer is told the total immediately.
    pub fn new(iter: I, observer: &'o O) -> Self {
        let state = ProgressState {
            position: 0,
            total: iter.len(),
            cancelled: false,
        };
        observer.begin(state.total);
        ProgressController {
            iter,
            observer,
            state,
        }
    }
}

impl<'o, I, O> ProgressController<'o, I, O>
where
    O: ProgressObserver + ?Sized,
{
    /// Request the run stop before the next element.
    pub fn cancel(&mut self) {
        self.state.cancelled = true;
    }

    #[must_use]
    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Ends the run and tells the observer.
    /// # Errors
    /// - [`AnalysisError::Cancelled`] if the run was cancelled.
    /// - [`AnalysisError::Engine`] if the consumer stopped before the end without a cancellation.
    pub fn finish(self) -> Result<ProgressState> {
        self.observer.end(&self.state);
        if self.state.cancelled {
            Err(AnalysisError::Cancelled)
        } else if self.state.position != self.state.total {
            Err(AnalysisError::Engine(format!(
                "consumed {} of {} chunks",
                self.state.position, self.state.total
            )))
        } else {
            Ok(self.state)
        }
    }
}

impl<'o, I, O> Iterator for ProgressController<'o, I, O>
where
    I: Iterator,
    O: ProgressObserver + ?Sized,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state.position >= self.state.total {
            return None;
        }
        if self.state.cancelled || self.observer.is_cancel_requested() {
            self.state.cancelled = true;
            return None;
        }
        let next = self.iter.next()?;
        self.state.position += 1;
        self.observer.advance(self.state.position);
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.cancelled {
            (0, Some(0))
        } else {
            (0, Some(self.state.total - self.state.position))
        }
    }
}

/// Ignores progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Reports progress through the log facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn begin(&self, total: usize) {
        info!("Analysing {total} chunks");
    }

    fn advance(&self, position: usize) {
        debug!("Chunk {position}");
    }

    fn end(&self, state: &ProgressState) {
        if state.cancelled {
            info!("Analysis cancelled at chunk {}/{}", state.position, state.total);
        } else {
            info!("Analysis finished {}/{} chunks", state.position, state.total);
        }
    }
}

#[derive(Debug, Default)]
struct SharedProgress {
    position: AtomicUsize,
    total: AtomicUsize,
    cancel_requested: AtomicBool,
    finished: AtomicBool,
}

/// Thread safe view of a run. Clones share state so one can be handed to the run while another
/// polls or cancels from elsewhere.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    shared: Arc<SharedProgress>,
}

impl ProgressHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop at the next chunk boundary.
    pub fn cancel(&self) {
        self.shared.cancel_requested.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.shared.position.load(Ordering::Relaxed)
    }

    /// 0 until the run begins.
    #[must_use]
    pub fn total(&self) -> usize {
        self.shared.total.load(Ordering::Relaxed)
    }

    /// Completed fraction in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        match self.total() {
            0 => 0.0,
            total => self.position() as f32 / total as f32,
        }
    }

    /// Whether the run has ended (completed, cancelled or failed).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.shared.finished.load(Ordering::Acquire)
    }

    /// Marks the run ended. For runs that fail before any chunk is handed out.
    pub fn set_finished(&self) {
        self.shared.finished.store(true, Ordering::Release);
    }
}

impl ProgressObserver for ProgressHandle {
    fn begin(&self, total: usize) {
        self.shared.position.store(0, Ordering::Relaxed);
        self.shared.total.store(total, Ordering::Relaxed);
    }

    fn advance(&self, position: usize) {
        self.shared.position.store(position, Ordering::Relaxed);
    }

    fn is_cancel_requested(&self) -> bool {
        self.shared.cancel_requested.load(Ordering::Relaxed)
    }

    fn end(&self, _state: &ProgressState) {
        self.set_finished();
    }
}

/// Terminal progress bar.
#[derive(Debug, Clone)]
pub struct BarProgress {
    bar: ProgressBar,
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl BarProgress {
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} Analysing [{bar:40.cyan/blue}] {pos}/{len} chunks ({eta})",
        ) {
            bar.set_style(style.progress_chars("#>-"));
        }
        BarProgress { bar }
    }
}

impl ProgressObserver for BarProgress {
    fn begin(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn advance(&self, position: usize) {
        self.bar.set_position(position as u64);
    }

    fn end(&self, state: &ProgressState) {
        if state.is_complete() {
            self.bar.finish_with_message("done");
        } else {
            self.bar.abandon_with_message("cancelled");
        }
    }
}
