use crate::{
    constants::{HARMONIC_COUNT, PEAK_SEARCH_COLUMNS, PEAK_SEARCH_ROWS, SUBHARMONIC_COUNT},
    error::{AnalysisError, Result},
    sound::Sound,
    spectrogram::Spectrogram,
};
use log::debug;
use std::ops::Range;

/// Part of the original sound under a selected rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundFragment {
    pub sound: Sound,
    /// Seconds from the start of the original sound.
    pub start_time: f64,
    /// Frequencies covered by the selected rows, low to high.
    pub frequency_band: Range<f64>,
}

/// Loudest cell of a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub row: usize,
    pub column: usize,
    pub frequency: f64,
    pub magnitude: f64,
}

/// A multiple or fraction of a frequency and the row nearest to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    pub frequency: f64,
    pub row: usize,
}

/// Multiples and fractions of a frequency that fall on the spectrogram, nearest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarmonicSeries {
    pub harmonics: Vec<Harmonic>,
    pub subharmonics: Vec<Harmonic>,
}

/// Answers questions about a spectrogram without running the transform again.
#[derive(Debug, Clone, Copy)]
pub struct FragmentExtractor<'a> {
    spectrogram: &'a Spectrogram,
}

fn ordered(range: Range<f64>) -> Range<f64> {
    range.start.min(range.end)..range.start.max(range.end)
}

impl<'a> FragmentExtractor<'a> {
    #[must_use]
    pub fn new(spectrogram: &'a Spectrogram) -> Self {
        FragmentExtractor { spectrogram }
    }

    /// The samples of the original sound between two (fractional) columns.
    /// The range is clamped to the sound. Rows only determine the reported frequency band.
    /// # Errors
    /// - [`AnalysisError::OutOfRange`] if nothing of the sound is left after clamping.
    pub fn selected_fragment(&self, columns: Range<f64>, rows: Range<f64>) -> Result<SoundFragment> {
        if !(columns.start.is_finite() && columns.end.is_finite()) {
            return Err(AnalysisError::OutOfRange(format!(
                "columns {columns:?} aren't finite"
            )));
        }
        let columns = ordered(columns);
        let sound = self.spectrogram.sound();
        let rate = f64::from(sound.sample_rate());
        let frames = sound.frame_count() as f64;
        let start = self
            .spectrogram
            .column_to_sample(columns.start)
            .floor()
            .clamp(0.0, frames) as usize;
        let end = self
            .spectrogram
            .column_to_sample(columns.end)
            .ceil()
            .clamp(0.0, frames) as usize;
        if start >= end {
            return Err(AnalysisError::OutOfRange(format!(
                "columns {columns:?} select nothing of a {:.3}s sound",
                sound.duration()
            )));
        }

        let last_row = self.spectrogram.rows().saturating_sub(1) as f64;
        let rows = ordered(rows);
        let scale = self.spectrogram.scale();
        let frequency_band = scale.position_to_freq(rows.end.clamp(0.0, last_row))
            ..scale.position_to_freq(rows.start.clamp(0.0, last_row));
        debug!("Fragment samples {start}..{end}, {frequency_band:?}Hz");

        Ok(SoundFragment {
            sound: sound.slice(start..end)?,
            start_time: start as f64 / rate,
            frequency_band,
        })
    }

    /// Loudest cell in the region. Ties go to the first in row-major order.
    /// # Errors
    /// - [`AnalysisError::OutOfRange`] if the region is empty or leaves the matrix.
    pub fn peak_in_region(&self, rows: Range<usize>, columns: Range<usize>) -> Result<Peak> {
        let magnitude = self.spectrogram.magnitude();
        if rows.is_empty()
            || columns.is_empty()
            || rows.end > magnitude.rows()
            || columns.end > magnitude.cols()
        {
            return Err(AnalysisError::OutOfRange(format!(
                "region rows {rows:?} columns {columns:?} of a {}x{} spectrogram",
                magnitude.rows(),
                magnitude.cols()
            )));
        }
        let mut peak = (rows.start, columns.start);
        for row in rows {
            for column in columns.clone() {
                if magnitude[(row, column)] > magnitude[peak] {
                    peak = (row, column);
                }
            }
        }
        Ok(Peak {
            row: peak.0,
            column: peak.1,
            frequency: self.spectrogram.y2freq(peak.0),
            magnitude: magnitude[peak],
        })
    }

    /// `frequency * k` for `k` in `2..=harmonic_count + 1` and `frequency / k` for `k` in
    /// `2..=subharmonic_count + 1`, each with its nearest row.
    /// Frequencies off the spectrogram are left out.
    #[must_use]
    pub fn harmonic_positions(
        &self,
        frequency: f64,
        harmonic_count: usize,
        subharmonic_count: usize,
    ) -> HarmonicSeries {
        let on_scale = |frequency: f64| {
            self.spectrogram
                .freq2y(frequency)
                .map(|row| Harmonic { frequency, row })
        };
        let multiples = |count: usize| (2..=count + 1).map(|k| k as f64);
        HarmonicSeries {
            harmonics: multiples(harmonic_count)
                .filter_map(|k| on_scale(frequency * k))
                .collect(),
            subharmonics: multiples(subharmonic_count)
                .filter_map(|k| on_scale(frequency / k))
                .collect(),
        }
    }

    /// Loudest cell in a small box around a point and the harmonic series above and below it.
    /// # Errors
    /// - [`AnalysisError::OutOfRange`] if the point isn't on the spectrogram.
    pub fn harmonics_near(&self, row: usize, column: usize) -> Result<(Peak, HarmonicSeries)> {
        let (rows, columns) = (self.spectrogram.rows(), self.spectrogram.columns());
        if row >= rows || column >= columns {
            return Err(AnalysisError::OutOfRange(format!(
                "point ({row}, {column}) of a {rows}x{columns} spectrogram"
            )));
        }
        let peak = self.peak_in_region(
            row.saturating_sub(PEAK_SEARCH_ROWS)..(row + PEAK_SEARCH_ROWS + 1).min(rows),
            column.saturating_sub(PEAK_SEARCH_COLUMNS)..(column + PEAK_SEARCH_COLUMNS + 1).min(columns),
        )?;
        Ok((
            peak,
            self.harmonic_positions(peak.frequency, HARMONIC_COUNT, SUBHARMONIC_COUNT),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{FragmentExtractor, Harmonic};
    use crate::{
        builder::ChunkLayout, error::AnalysisError, render::Colormap, sound::Sound,
        spectrogram::Spectrogram,
    };
    use cwt::{FrequencyScale, Matrix};

    /// 8 columns of 128 samples at 800Hz.
    fn spectrogram_on(scale: FrequencyScale, magnitude: Vec<Vec<f64>>) -> Spectrogram {
        let layout = ChunkLayout {
            sample_rate: 800,
            nsamples: 1024,
            decimate: 4,
            chunk_count: 2,
        };
        Spectrogram::new(
            Matrix::from_rows(magnitude),
            scale,
            layout,
            Sound::from_samples((0..1000).map(f64::from).collect::<Vec<_>>(), 800).unwrap(),
            None,
            Colormap::Grey,
        )
        .unwrap()
    }

    /// 4 rows an octave apart from 1600Hz.
    fn spectrogram(magnitude: Vec<Vec<f64>>) -> Spectrogram {
        spectrogram_on(FrequencyScale::new(1600.0, 200.0, 1.0), magnitude)
    }

    fn rows(series: &[Harmonic]) -> Vec<usize> {
        series.iter().map(|harmonic| harmonic.row).collect()
    }

    fn frequencies(series: &[Harmonic]) -> Vec<f64> {
        series.iter().map(|harmonic| harmonic.frequency).collect()
    }

    fn flat() -> Spectrogram {
        spectrogram(vec![vec![0.0; 8]; 4])
    }

    #[test]
    fn fragment_maps_columns_to_samples() {
        let spectrogram = flat();
        let extractor = FragmentExtractor::new(&spectrogram);
        let fragment = extractor.selected_fragment(2.0..4.5, 1.0..2.0).unwrap();
        assert_eq!(fragment.sound.frame_count(), 320);
        assert_eq!(fragment.sound.samples()[0], 256.0);
        assert_eq!(fragment.start_time, 256.0 / 800.0);
        assert_eq!(fragment.frequency_band, 400.0..800.0);
    }

    #[test]
    fn fragment_clamped_and_reversed() {
        let spectrogram = flat();
        let extractor = FragmentExtractor::new(&spectrogram);
        let fragment = extractor.selected_fragment(100.0..6.0, -5.0..10.0).unwrap();
        assert_eq!(fragment.sound.frame_count(), 1000 - 768);
        assert_eq!(fragment.frequency_band, 200.0..1600.0);
        assert!(matches!(
            extractor.selected_fragment(20.0..30.0, 0.0..1.0),
            Err(AnalysisError::OutOfRange(_))
        ));
        assert!(matches!(
            extractor.selected_fragment(3.0..3.0, 0.0..1.0),
            Err(AnalysisError::OutOfRange(_))
        ));
    }

    #[test]
    fn peak_first_in_row_major_order() {
        let mut magnitude = vec![vec![0.0; 8]; 4];
        magnitude[1][5] = 3.0;
        magnitude[2][1] = 3.0;
        magnitude[3][7] = 9.0;
        let spectrogram = spectrogram(magnitude);
        let extractor = FragmentExtractor::new(&spectrogram);
        let peak = extractor.peak_in_region(0..3, 0..8).unwrap();
        assert_eq!((peak.row, peak.column), (1, 5));
        assert_eq!(peak.frequency, 800.0);
        assert_eq!(peak.magnitude, 3.0);
        assert_eq!(
            extractor.peak_in_region(0..4, 0..8).unwrap().magnitude,
            9.0
        );
    }

    #[test]
    fn peak_region_checked() {
        let spectrogram = flat();
        let extractor = FragmentExtractor::new(&spectrogram);
        for (rows, columns) in [(0..0, 0..8), (0..4, 3..3), (0..5, 0..8), (0..4, 0..9)] {
            assert!(matches!(
                extractor.peak_in_region(rows, columns),
                Err(AnalysisError::OutOfRange(_))
            ));
        }
    }

    #[test]
    fn harmonics_outside_scale_omitted() {
        let spectrogram = flat();
        let extractor = FragmentExtractor::new(&spectrogram);
        let series = extractor.harmonic_positions(400.0, 5, 3);
        // 800, then 1200, 1600 and 2000 all round to the top row. 2400 is off the top.
        assert_eq!(rows(&series.harmonics), vec![1, 0, 0, 0]);
        assert_eq!(frequencies(&series.harmonics), vec![800.0, 1200.0, 1600.0, 2000.0]);
        // 200; 133 and 100 are off the bottom.
        assert_eq!(rows(&series.subharmonics), vec![3]);
        assert_eq!(frequencies(&series.subharmonics), vec![200.0]);
    }

    #[test]
    fn harmonics_keep_exact_frequencies() {
        // 12 rows per octave from 1600Hz down to 200Hz.
        let scale = FrequencyScale::new(1600.0, 200.0, 1.0 / 12.0);
        let spectrogram = spectrogram_on(scale, vec![vec![0.0; 8]; scale.rows()]);
        let extractor = FragmentExtractor::new(&spectrogram);
        let series = extractor.harmonic_positions(440.0, 2, 1);
        assert_eq!(frequencies(&series.harmonics), vec![880.0, 1320.0]);
        assert_eq!(frequencies(&series.subharmonics), vec![220.0]);
        for harmonic in series.harmonics.iter().chain(&series.subharmonics) {
            assert_eq!(Some(harmonic.row), spectrogram.freq2y(harmonic.frequency));
        }
        // Rows alone would only give back the row centers.
        assert_ne!(spectrogram.y2freq(series.harmonics[0].row), 880.0);
    }

    #[test]
    fn harmonics_near_point() {
        let mut magnitude = vec![vec![0.0; 8]; 4];
        magnitude[2][6] = 1.0;
        let spectrogram = spectrogram(magnitude);
        let extractor = FragmentExtractor::new(&spectrogram);
        let (peak, series) = extractor.harmonics_near(0, 4).unwrap();
        assert_eq!((peak.row, peak.column), (2, 6));
        assert_eq!(peak.frequency, 400.0);
        assert_eq!(rows(&series.subharmonics), vec![3]);
        assert!(matches!(
            extractor.harmonics_near(4, 0),
            Err(AnalysisError::OutOfRange(_))
        ));
    }
}
