use crate::{
    column_to_time, fft::resample, morlet::MorletParams, time_to_column, FrequencyScale,
    TransformError, TransformFactory, WaveletTransform, WindowLength,
};
use proptest::{prelude::ProptestConfig, proptest};
use std::f64::consts::PI;

fn sine(frequency: f64, sample_rate: f64, len: usize) -> Vec<f64> {
    (0..len)
        .map(|n| (2.0 * PI * frequency * n as f64 / sample_rate).sin())
        .collect()
}

#[test]
fn one_second_window() {
    assert_eq!(WindowLength::covering_one_second(44_100).samples(), 65_536);
    assert_eq!(WindowLength::covering_one_second(1_000).samples(), 1_024);
    assert_eq!(WindowLength::covering_one_second(1_024).samples(), 1_024);
    assert_eq!(WindowLength::covering_one_second(1_025).samples(), 2_048);
    assert_eq!(WindowLength::covering_one_second(2).samples(), 2);
}

#[test]
#[should_panic]
fn one_second_window_rejects_rate_of_one() {
    let _ = WindowLength::covering_one_second(1);
}

#[test]
fn column_time_conversion() {
    assert_eq!(column_to_time(4.0, 256, 1024.0), 1.0);
    assert_eq!(time_to_column(1.0, 256, 1024.0), 4.0);
}

#[test]
fn scale_rows() {
    let scale = FrequencyScale::new(800.0, 100.0, 1.0);
    assert_eq!(scale.rows(), 4);
    assert_eq!(scale.y2freq(0), 800.0);
    assert_eq!(scale.y2freq(3), 100.0);
    assert_eq!(scale.min_frequency(), 100.0);
    assert_eq!(scale.freq2y(400.0), Some(1));
    assert_eq!(scale.freq2y(390.0), Some(1));
}

#[test]
fn scale_rejects_outside_frequencies() {
    let scale = FrequencyScale::new(800.0, 100.0, 1.0);
    assert_eq!(scale.freq2y(2000.0), None);
    assert_eq!(scale.freq2y(40.0), None);
    assert_eq!(scale.freq2y(0.0), None);
    assert_eq!(scale.freq2y(-5.0), None);
    assert_eq!(scale.freq2y(f64::NAN), None);
    assert_eq!(scale.freq2y(f64::INFINITY), None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]
    #[test]
    fn scale_round_trip(max in 10.0f64..50_000.0, octaves in 0.0f64..12.0, steps_per_octave in 1u32..100, row_seed: usize) {
        let scale = FrequencyScale::new(max, max * (-octaves).exp2(), 1.0 / f64::from(steps_per_octave));
        let row = row_seed % scale.rows();
        assert_eq!(scale.freq2y(scale.y2freq(row)), Some(row));
    }

    #[test]
    fn scale_frequency_within_half_row(max in 10.0f64..50_000.0, octaves in 0.1f64..12.0, steps_per_octave in 1u32..100, position in 0.0f64..1.0) {
        let scale = FrequencyScale::new(max, max * (-octaves).exp2(), 1.0 / f64::from(steps_per_octave));
        let frequency = scale.position_to_freq(position * (scale.rows() - 1) as f64);
        let row = scale.freq2y(frequency).unwrap();
        let error = (scale.freq_to_position(frequency) - row as f64).abs();
        assert!(error <= 0.5 + 1e-9);
    }
}

#[test]
fn morlet_peaks_on_signal_row() {
    let sample_rate = 1000;
    let nsamples = WindowLength::covering_one_second(sample_rate).samples();
    let params = MorletParams {
        scale_resolution: 1.0 / 12.0,
        ..MorletParams::default()
    };
    let engine = params.create(sample_rate, nsamples);
    let scale = *engine.scale();
    let signal_row = 10;
    let signal = sine(scale.y2freq(signal_row), f64::from(sample_rate), 1536);

    let decimate = 4;
    let out = engine
        .apply_cwt(signal.chunks(nsamples / 2).map(<[f64]>::to_vec), decimate)
        .unwrap();
    assert_eq!(out.rows(), scale.rows());
    assert_eq!(out.cols(), 3 * decimate);

    // Column 6 is the middle of the signal, far from both edges.
    let column = 6;
    let (peak_row, peak) = (0..out.rows())
        .map(|row| (row, out[(row, column)].norm()))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap();
    assert_eq!(peak_row, signal_row);
    assert!((peak - 1.0).abs() < 0.1, "magnitude {peak} should be near 1");
}

#[test]
fn morlet_silence_is_zero() {
    let engine = MorletParams::default().create(1000, 1024);
    let out = engine
        .apply_cwt(std::iter::repeat(vec![0.0; 512]).take(2), 4)
        .unwrap();
    assert!(out.data().iter().all(|x| x.norm() == 0.0));
}

#[test]
fn morlet_short_last_chunk_keeps_shape() {
    let engine = MorletParams::default().create(1000, 1024);
    let chunks = vec![vec![0.5; 512], vec![0.5; 512], vec![0.5; 7]];
    let out = engine.apply_cwt(chunks.into_iter(), 8).unwrap();
    assert_eq!(out.cols(), 24);
    assert_eq!(out.rows(), engine.scale().rows());
}

#[test]
fn morlet_rejects_long_chunk_and_zero_decimate() {
    let engine = MorletParams::default().create(1000, 1024);
    assert!(matches!(
        engine.apply_cwt(std::iter::once(vec![0.0; 513]), 4),
        Err(TransformError::ChunkTooLong { len: 513, half: 512 })
    ));
    assert!(matches!(
        engine.apply_cwt(std::iter::once(vec![0.0; 512]), 0),
        Err(TransformError::NoColumns)
    ));
}

#[test]
fn morlet_params_validated() {
    assert!(MorletParams::default().validate().is_ok());
    let bad = [
        MorletParams {
            omega0: 0.0,
            ..MorletParams::default()
        },
        MorletParams {
            scale_resolution: -1.0 / 72.0,
            ..MorletParams::default()
        },
        MorletParams {
            min_frequency: Some(-20.0),
            ..MorletParams::default()
        },
        MorletParams {
            min_frequency: Some(f64::NAN),
            ..MorletParams::default()
        },
        MorletParams {
            max_frequency: Some(f64::INFINITY),
            ..MorletParams::default()
        },
    ];
    for params in bad {
        assert!(
            matches!(params.validate(), Err(TransformError::InvalidParameter(_))),
            "{params:?}"
        );
    }
}

#[test]
fn morlet_default_frequency_range() {
    let scale = MorletParams::default().scale(1000, 1024);
    assert_eq!(scale.max_frequency(), 500.0);
    assert!(scale.min_frequency() >= 70.0 * 1000.0 / 1024.0 - 1e-9);
    let capped = MorletParams {
        max_frequency: Some(10_000.0),
        ..MorletParams::default()
    }
    .scale(1000, 1024);
    assert_eq!(capped.max_frequency(), 500.0);
}

#[test]
fn resample_nyquist_bin_keeps_amplitude() {
    // 2Hz sampled at 8Hz lands on the Nyquist frequency of 4Hz.
    let eight = [1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0];
    let four = [1.0, -1.0, 1.0, -1.0];
    let down = resample(&eight, 8, 4).unwrap();
    let up = resample(&four, 4, 8).unwrap();
    for (out, expected) in down.iter().zip(&four).chain(up.iter().zip(&eight)) {
        assert!((out - expected).abs() < 1e-9, "{down:?} {up:?}");
    }
    assert_eq!((down.len(), up.len()), (4, 8));
}

#[test]
fn resample_constant() {
    let out = resample(&[0.25; 100], 100, 150).unwrap();
    assert_eq!(out.len(), 150);
    for x in out {
        assert!((x - 0.25).abs() < 1e-9);
    }
}

#[test]
fn resample_keeps_band_limited_sine() {
    // 5 whole cycles in 64 samples survives halving the rate exactly.
    let original = sine(5.0, 64.0, 64);
    let halved = resample(&original, 64, 32).unwrap();
    assert_eq!(halved.len(), 32);
    for (x, expected) in halved.iter().zip(sine(5.0, 32.0, 32)) {
        assert!((x - expected).abs() < 1e-9);
    }
}

#[test]
fn resample_same_rate_and_empty() {
    let data = [1.0, -2.0, 3.0];
    assert_eq!(resample(&data, 10, 10).unwrap(), data);
    assert!(resample(&[], 10, 20).unwrap().is_empty());
    assert!(resample(&data, 10, 1).unwrap().is_empty());
}
