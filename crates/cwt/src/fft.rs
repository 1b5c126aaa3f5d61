use num_complex::Complex;
use realfft::{FftError, RealFftPlanner};

/// Number of samples `len` samples at `from_rate` become at `to_rate`.
#[must_use]
pub fn resampled_len(len: usize, from_rate: u32, to_rate: u32) -> usize {
    (len as f64 * f64::from(to_rate) / f64::from(from_rate)).round() as usize
}

/// Band-limited resample of `data` from `from_rate` to `to_rate`.
///
/// The spectrum is truncated or zero extended to the new length and transformed back,
/// so content above the lower of the two Nyquist frequencies is dropped.
/// # Errors
/// - If the fft fails.
pub fn resample(data: &[f64], from_rate: u32, to_rate: u32) -> Result<Vec<f64>, FftError> {
    let new_len = resampled_len(data.len(), from_rate, to_rate);
    if data.is_empty() || new_len == 0 {
        return Ok(Vec::new());
    }
    if new_len == data.len() {
        return Ok(data.to_vec());
    }

    let mut real_planner = RealFftPlanner::<f64>::new();
    let r2c = real_planner.plan_fft_forward(data.len());
    let c2r = real_planner.plan_fft_inverse(new_len);

    let mut input = data.to_vec();
    // `spectrum.len() == length / 2 + 1`
    let mut spectrum = r2c.make_output_vec();
    r2c.process(&mut input, &mut spectrum)?;

    let mut resized = c2r.make_input_vec();
    let shared = spectrum.len().min(resized.len());
    resized[..shared].copy_from_slice(&spectrum[..shared]);
    // The Nyquist bin of an even length is a single component while every other bin stands
    // for a conjugate pair. Where it moves between the two roles its weight changes.
    let shorter = data.len().min(new_len);
    if shorter % 2 == 0 {
        let bin = &mut resized[shorter / 2];
        if new_len < data.len() {
            *bin *= 2.0;
        } else {
            *bin *= 0.5;
        }
    }
    // A real signal's spectrum has no imaginary part at DC, nor at Nyquist for even lengths.
    resized[0].im = 0.0;
    if new_len % 2 == 0 {
        if let Some(nyquist) = resized.last_mut() {
            *nyquist = Complex::new(nyquist.re, 0.0);
        }
    }

    let mut out = c2r.make_output_vec();
    c2r.process(&mut resized, &mut out)?;
    // Forward and inverse are both unnormalized. Scaling by the original length keeps amplitudes.
    let scale_factor = 1.0 / data.len() as f64;
    out.iter_mut().for_each(|x| *x *= scale_factor);
    Ok(out)
}
