use crate::{
    builder::AnalysisOptions,
    constants::{DECIMATION_FACTOR, NORMA_WINDOW_LEN, OMEGA0, ROWS_PER_OCTAVE},
    render::Colormap,
};
use clap::{
    builder::{PossibleValuesParser, TypedValueParser as _},
    Args, Parser, Subcommand, ValueHint,
};
use cwt::morlet::MorletParams;
use log::Level;
use std::{ops::Range, path::PathBuf};

/// Logging options.
#[derive(Args, Clone, Debug)]
pub struct LoggingOpt {
    /// The logging level to use.
    #[arg(
        short, long, default_value_t = Level::Info,
        // Needed because enum is foreign so can't use ValueEnum derive.
        value_parser = PossibleValuesParser::new(["trace", "debug", "info", "warn", "error"]).map(|s| s.parse::<Level>().unwrap()),
        ignore_case = true
    )]
    pub log_level: Level,
}

#[derive(Args, Clone, Debug)]
pub struct FileInOpt {
    /// The input wav file.
    #[arg(value_hint = ValueHint::FilePath)]
    pub in_file: PathBuf,
}

#[derive(Args, Clone, Debug)]
pub struct FileOutOpt {
    /// The output file.
    #[arg(value_hint = ValueHint::FilePath)]
    pub out_file: PathBuf,
}

/// How the sound is analysed and drawn.
#[derive(Args, Clone, Debug)]
pub struct AnalysisOpt {
    /// Channel of the input file to analyse.
    #[arg(short, long, default_value_t = 0)]
    pub channel: usize,

    /// Resample to this rate before analysing.
    #[arg(long)]
    pub analysis_rate: Option<u32>,

    /// Each chunk keeps `window >> decimation_factor` columns.
    #[arg(long, default_value_t = DECIMATION_FACTOR)]
    pub decimation_factor: u32,

    /// Odd number of columns the loudness is evened out over.
    #[arg(long, default_value_t = NORMA_WINDOW_LEN)]
    pub normalization_window: usize,

    /// Draw raw magnitudes.
    #[arg(long)]
    pub no_normalization: bool,

    #[arg(long, value_enum, default_value_t = Colormap::Viridis)]
    pub colormap: Colormap,

    /// Rows per octave.
    #[arg(long, default_value_t = ROWS_PER_OCTAVE)]
    pub rows_per_octave: f64,

    /// Center frequency of the mother wavelet. Higher trades time detail for frequency detail.
    #[arg(long, default_value_t = OMEGA0)]
    pub omega0: f64,

    /// Lowest analysed frequency in Hz.
    #[arg(long)]
    pub min_frequency: Option<f64>,
}

impl AnalysisOpt {
    #[must_use]
    pub fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            decimation_factor: self.decimation_factor,
            normalization_window: (!self.no_normalization).then_some(self.normalization_window),
            colormap: self.colormap,
            analysis_rate: self.analysis_rate,
        }
    }

    #[must_use]
    pub fn params(&self) -> MorletParams {
        MorletParams {
            scale_resolution: 1.0 / self.rows_per_octave,
            omega0: self.omega0,
            min_frequency: self.min_frequency,
            max_frequency: None,
        }
    }
}

/// Parses `start..end`.
pub fn parse_range(s: &str) -> Result<Range<f64>, String> {
    let (start, end) = s
        .split_once("..")
        .ok_or_else(|| format!("expected `start..end`, got `{s}`"))?;
    let parse = |x: &str| {
        x.trim()
            .parse::<f64>()
            .map_err(|err| format!("`{x}`: {err}"))
    };
    Ok(parse(start)?..parse(end)?)
}

/// Render the spectrogram to an image.
#[derive(Args, Clone, Debug)]
pub struct RenderOpt {
    #[command(flatten)]
    pub in_file: FileInOpt,

    #[command(flatten)]
    pub out_file: FileOutOpt,

    /// Also draw a chart with time and frequency axes to this file.
    #[cfg(feature = "plot")]
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub plot: Option<PathBuf>,
}

/// Save the sound under a rectangle of the spectrogram.
#[derive(Args, Clone, Debug)]
pub struct FragmentOpt {
    #[command(flatten)]
    pub in_file: FileInOpt,

    #[command(flatten)]
    pub out_file: FileOutOpt,

    /// Columns to extract, ex. `100..250.5`.
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    pub columns: Range<f64>,

    /// Rows of the selection. Only reported. Defaults to every row.
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    pub rows: Option<Range<f64>>,
}

/// Find the loudest point near a position and its harmonics.
#[derive(Args, Clone, Debug)]
pub struct HarmonicsOpt {
    #[command(flatten)]
    pub in_file: FileInOpt,

    #[arg(long)]
    pub row: usize,

    #[arg(long)]
    pub column: usize,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    Render(RenderOpt),
    Fragment(FragmentOpt),
    Harmonics(HarmonicsOpt),
}

/// Wavelet spectrograms of recorded sounds.
#[derive(Parser, Clone, Debug)]
#[command(version)]
pub struct SpectrogramCli {
    #[command(flatten)]
    pub log_opt: LoggingOpt,

    #[command(flatten)]
    pub analysis: AnalysisOpt,

    #[command(subcommand)]
    pub command: Command,
}
