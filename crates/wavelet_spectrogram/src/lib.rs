//! Wavelet spectrograms of recorded sounds, computed a chunk at a time with progress and cancellation.

/// Arguments for the `spectrogram` binary.
pub mod args;

/// Main logic of the `spectrogram` binary's subcommands.
pub mod binary_logic;

/// Sound to spectrogram with admission control.
pub mod builder;

/// Constants that are defaults of cli args.
pub mod constants;

pub mod error;

/// Simple helper functions for reading and writing wav files.
pub mod file_io;

/// Fragments, peaks and harmonics of a finished spectrogram.
pub mod fragment;

pub mod normalize;

/// Plotting functionality.
#[cfg(feature = "plot")]
pub mod plotting;

/// Progress reporting and cooperative cancellation.
pub mod progress;

/// Magnitudes to colors.
pub mod render;

pub mod sound;

pub mod spectrogram;

/// Background analysis.
pub mod worker;

pub use builder::{AnalysisOptions, SpectrogramBuilder};
pub use error::AnalysisError;
pub use sound::Sound;
pub use spectrogram::Spectrogram;
