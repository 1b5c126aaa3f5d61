/// Logarithmic mapping between row indices and frequencies.
/// Row 0 is the highest frequency and every following row is `resolution` octaves lower.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyScale {
    max_frequency: f64,
    resolution: f64,
    rows: usize,
}

impl FrequencyScale {
    /// Scale covering `min_frequency..=max_frequency` in steps of `resolution` octaves.
    /// The lowest row is the last step that stays at or above `min_frequency`.
    /// # Panics
    /// - If a frequency isn't positive, `min_frequency > max_frequency` or `resolution` isn't positive.
    #[must_use]
    pub fn new(max_frequency: f64, min_frequency: f64, resolution: f64) -> Self {
        assert!(
            max_frequency > 0.0 && min_frequency > 0.0,
            "frequencies must be positive"
        );
        assert!(
            min_frequency <= max_frequency,
            "min frequency {min_frequency} is above max frequency {max_frequency}"
        );
        assert!(resolution > 0.0, "resolution must be positive");
        // Small tolerance so a range that is an exact number of steps keeps its last row.
        let steps = ((max_frequency / min_frequency).log2() / resolution + 1e-9).floor();
        FrequencyScale {
            max_frequency,
            resolution,
            rows: steps as usize + 1,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Octaves per row.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Frequency of row 0.
    #[must_use]
    pub fn max_frequency(&self) -> f64 {
        self.max_frequency
    }

    /// Frequency of the last row.
    #[must_use]
    pub fn min_frequency(&self) -> f64 {
        self.y2freq(self.rows - 1)
    }

    /// Frequency of a row.
    #[must_use]
    pub fn y2freq(&self, row: usize) -> f64 {
        self.position_to_freq(row as f64)
    }

    /// Frequency at a fractional row position.
    #[must_use]
    pub fn position_to_freq(&self, position: f64) -> f64 {
        self.max_frequency * (-position * self.resolution).exp2()
    }

    /// Fractional row position of a frequency. Not bounded by the scale's rows.
    #[must_use]
    pub fn freq_to_position(&self, frequency: f64) -> f64 {
        (self.max_frequency / frequency).log2() / self.resolution
    }

    /// Nearest row of a frequency or `None` if it rounds to a row outside the scale.
    #[must_use]
    pub fn freq2y(&self, frequency: f64) -> Option<usize> {
        if !(frequency > 0.0 && frequency.is_finite()) {
            return None;
        }
        let row = self.freq_to_position(frequency).round();
        if row < 0.0 || row >= self.rows as f64 {
            None
        } else {
            Some(row as usize)
        }
    }
}
