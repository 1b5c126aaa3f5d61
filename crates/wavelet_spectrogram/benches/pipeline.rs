//! Costs of the stages of an analysis. A minute of CD audio is about 80 chunks of 32768 samples.

use criterion::{criterion_group, criterion_main, Criterion};
use cwt::{morlet::MorletParams, Matrix, TransformFactory, WaveletTransform};
use std::{f64::consts::PI, hint::black_box};
use wavelet_spectrogram::{
    normalize::normalize_horizontal,
    progress::NoProgress,
    render::{render, Colormap},
    AnalysisOptions, Sound, SpectrogramBuilder,
};

fn tone(sample_rate: u32, frames: usize) -> Vec<f64> {
    (0..frames)
        .map(|n| (2.0 * PI * 440.0 * n as f64 / f64::from(sample_rate)).sin())
        .collect()
}

fn magnitude(rows: usize, cols: usize) -> Matrix<f64> {
    Matrix::from_vec(
        rows,
        cols,
        (0..rows * cols).map(|x| (x % 97) as f64).collect(),
    )
}

fn morlet_chunk(c: &mut Criterion) {
    let engine = MorletParams::default().create(44_100, 65_536);
    let chunk = tone(44_100, 32_768);
    c.bench_function("morlet two chunks at 44.1kHz", |b| {
        b.iter(|| {
            black_box(
                engine
                    .apply_cwt([chunk.clone(), chunk.clone()].into_iter(), 256)
                    .unwrap(),
            )
        })
    });
}

fn normalize(c: &mut Criterion) {
    let matrix = magnitude(400, 2048);
    c.bench_function("normalize 400x2048", |b| {
        b.iter(|| {
            let mut matrix = matrix.clone();
            normalize_horizontal(&mut matrix, 501).unwrap();
            black_box(matrix)
        })
    });
}

fn render_image(c: &mut Criterion) {
    let matrix = magnitude(400, 2048);
    let lut = Colormap::Viridis.lut();
    c.bench_function("render 400x2048", |b| {
        b.iter(|| black_box(render(&matrix, &lut)))
    });
}

fn full_analysis(c: &mut Criterion) {
    let sound = Sound::from_samples(tone(8000, 40_000), 8000).unwrap();
    let builder = SpectrogramBuilder::new(MorletParams::default(), AnalysisOptions::default());
    c.bench_function("analyse 5s at 8kHz", |b| {
        b.iter(|| black_box(builder.analyze(sound.clone(), &NoProgress).unwrap()))
    });
}

criterion_group!(benches, morlet_chunk, normalize, render_image, full_analysis);
criterion_main!(benches);
