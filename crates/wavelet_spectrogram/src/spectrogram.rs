use crate::{
    builder::ChunkLayout,
    error::{AnalysisError, Result},
    normalize::normalize_horizontal,
    render::{render, Colormap},
    sound::Sound,
};
use cwt::{column_to_time, time_to_column, FrequencyScale, Matrix};
use image::RgbImage;
use log::info;
use std::path::Path;

/// Result of one analysis: magnitudes, their rendering and the mappings back to time and frequency.
/// Rows run from the highest frequency down, columns along time.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    magnitude: Matrix<f64>,
    image: RgbImage,
    scale: FrequencyScale,
    layout: ChunkLayout,
    sound: Sound,
    normalization_window: Option<usize>,
    colormap: Colormap,
}

/// Magnitudes normalized (if `normalization_window` is set) and colored.
/// # Errors
/// - [`AnalysisError::InvalidArgument`] for an even or zero window.
pub fn render_magnitude(
    magnitude: &Matrix<f64>,
    normalization_window: Option<usize>,
    colormap: Colormap,
) -> Result<RgbImage> {
    let lut = colormap.lut();
    match normalization_window {
        Some(window_len) => {
            let mut normalized = magnitude.clone();
            normalize_horizontal(&mut normalized, window_len)?;
            Ok(render(&normalized, &lut))
        }
        None => Ok(render(magnitude, &lut)),
    }
}

impl Spectrogram {
    /// Renders the image from `magnitude`.
    /// # Errors
    /// - [`AnalysisError::InvalidArgument`] for an even or zero window.
    pub fn new(
        magnitude: Matrix<f64>,
        scale: FrequencyScale,
        layout: ChunkLayout,
        sound: Sound,
        normalization_window: Option<usize>,
        colormap: Colormap,
    ) -> Result<Self> {
        let image = render_magnitude(&magnitude, normalization_window, colormap)?;
        Ok(Spectrogram {
            magnitude,
            image,
            scale,
            layout,
            sound,
            normalization_window,
            colormap,
        })
    }

    /// Unnormalized magnitudes.
    #[must_use]
    pub fn magnitude(&self) -> &Matrix<f64> {
        &self.magnitude
    }

    #[must_use]
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    #[must_use]
    pub fn scale(&self) -> &FrequencyScale {
        &self.scale
    }

    #[must_use]
    pub fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    /// The sound as it was given, before any resampling.
    #[must_use]
    pub fn sound(&self) -> &Sound {
        &self.sound
    }

    #[must_use]
    pub fn normalization_window(&self) -> Option<usize> {
        self.normalization_window
    }

    #[must_use]
    pub fn colormap(&self) -> Colormap {
        self.colormap
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.magnitude.rows()
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.magnitude.cols()
    }

    #[must_use]
    pub fn y2freq(&self, row: usize) -> f64 {
        self.scale.y2freq(row)
    }

    #[must_use]
    pub fn freq2y(&self, frequency: f64) -> Option<usize> {
        self.scale.freq2y(frequency)
    }

    /// Seconds from the start of the sound to `column`.
    #[must_use]
    pub fn column_to_time(&self, column: f64) -> f64 {
        column_to_time(
            column,
            self.layout.samples_per_column(),
            f64::from(self.layout.sample_rate),
        )
    }

    /// Position of `column` in samples of the original sound.
    #[must_use]
    pub fn column_to_sample(&self, column: f64) -> f64 {
        column * self.layout.samples_per_column() as f64 * f64::from(self.sound.sample_rate())
            / f64::from(self.layout.sample_rate)
    }

    #[must_use]
    pub fn time_to_column(&self, time: f64) -> f64 {
        time_to_column(
            time,
            self.layout.samples_per_column(),
            f64::from(self.layout.sample_rate),
        )
    }

    /// Redraw with another window or colormap. Magnitudes are untouched.
    /// # Errors
    /// - [`AnalysisError::InvalidArgument`] for an even or zero window. The current image is kept.
    pub fn rerender(&mut self, normalization_window: Option<usize>, colormap: Colormap) -> Result<()> {
        self.image = render_magnitude(&self.magnitude, normalization_window, colormap)?;
        self.normalization_window = normalization_window;
        self.colormap = colormap;
        Ok(())
    }

    /// Save the image. The format follows the extension.
    /// # Errors
    /// - [`AnalysisError::Io`] if encoding or writing fails.
    pub fn save_image(&self, path: &Path) -> Result<()> {
        self.image.save(path).map_err(|err| AnalysisError::Io {
            path: path.to_owned(),
            reason: err.to_string(),
        })?;
        info!(
            "Saved {}x{} spectrogram to '{}'",
            self.image.width(),
            self.image.height(),
            path.display()
        );
        Ok(())
    }
}
