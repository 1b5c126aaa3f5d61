use crate::{
    args::{AnalysisOpt, Command, FragmentOpt, HarmonicsOpt, RenderOpt, SpectrogramCli},
    builder::SpectrogramBuilder,
    fragment::FragmentExtractor,
    progress::BarProgress,
    sound::Sound,
    spectrogram::Spectrogram,
};
use anyhow::Context;
use log::info;
use std::path::Path;

pub fn run(opt: SpectrogramCli) -> anyhow::Result<()> {
    // Init logging.
    simple_logger::init_with_level(opt.log_opt.log_level)?;

    match opt.command {
        Command::Render(render_opt) => render(&opt.analysis, render_opt),
        Command::Fragment(fragment_opt) => fragment(&opt.analysis, fragment_opt),
        Command::Harmonics(harmonics_opt) => harmonics(&opt.analysis, harmonics_opt),
    }
}

/// Open and analyse a file with a progress bar.
pub fn analyze_file(path: &Path, opt: &AnalysisOpt) -> anyhow::Result<Spectrogram> {
    let sound = Sound::open(path, opt.channel)
        .with_context(|| format!("Opening {} for analysis", path.display()))?;
    let builder = SpectrogramBuilder::new(opt.params(), opt.options());
    let spectrogram = builder
        .analyze(sound, &BarProgress::new())
        .with_context(|| format!("Analysing {}", path.display()))?;
    info!(
        "{} rows x {} columns, {:.1}Hz to {:.1}Hz",
        spectrogram.rows(),
        spectrogram.columns(),
        spectrogram.scale().min_frequency(),
        spectrogram.scale().max_frequency()
    );
    Ok(spectrogram)
}

/// Render main logic.
pub fn render(analysis: &AnalysisOpt, opt: RenderOpt) -> anyhow::Result<()> {
    let spectrogram = analyze_file(&opt.in_file.in_file, analysis)?;
    spectrogram
        .save_image(&opt.out_file.out_file)
        .with_context(|| format!("Writing to file {}.", opt.out_file.out_file.display()))?;

    #[cfg(feature = "plot")]
    if let Some(plot) = &opt.plot {
        crate::plotting::plot_spectrogram(
            &spectrogram,
            plot,
            &opt.in_file.in_file.display().to_string(),
        )
        .with_context(|| format!("Plotting to {}", plot.display()))?;
    }
    Ok(())
}

/// Fragment main logic.
pub fn fragment(analysis: &AnalysisOpt, opt: FragmentOpt) -> anyhow::Result<()> {
    let spectrogram = analyze_file(&opt.in_file.in_file, analysis)?;
    let rows = opt
        .rows
        .unwrap_or(0.0..spectrogram.rows().saturating_sub(1) as f64);
    let fragment = FragmentExtractor::new(&spectrogram).selected_fragment(opt.columns, rows)?;
    fragment
        .sound
        .write_wav(&opt.out_file.out_file)
        .with_context(|| format!("Writing to file {}.", opt.out_file.out_file.display()))?;
    info!(
        "Saved {:.3}s from {:.3}s ({:.1}-{:.1}Hz) to '{}'",
        fragment.sound.duration(),
        fragment.start_time,
        fragment.frequency_band.start,
        fragment.frequency_band.end,
        opt.out_file.out_file.display()
    );
    Ok(())
}

/// Harmonics main logic.
pub fn harmonics(analysis: &AnalysisOpt, opt: HarmonicsOpt) -> anyhow::Result<()> {
    let spectrogram = analyze_file(&opt.in_file.in_file, analysis)?;
    let (peak, series) = FragmentExtractor::new(&spectrogram).harmonics_near(opt.row, opt.column)?;
    println!(
        "peak: row {} column {} at {:.2}s, {:.2}Hz, magnitude {:.4}",
        peak.row,
        peak.column,
        spectrogram.column_to_time(peak.column as f64),
        peak.frequency,
        peak.magnitude
    );
    for (name, series) in [("harmonic", series.harmonics), ("subharmonic", series.subharmonics)] {
        for harmonic in series {
            println!("{name}: {:.2}Hz on row {}", harmonic.frequency, harmonic.row);
        }
    }
    Ok(())
}
