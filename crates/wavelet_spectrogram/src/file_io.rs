use crate::error::{AnalysisError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::{fmt::Display, path::Path};

fn io_error<E: Display>(file: &Path) -> impl FnOnce(E) -> AnalysisError + '_ {
    move |err| AnalysisError::Io {
        path: file.to_owned(),
        reason: err.to_string(),
    }
}

/// Read one channel of a wav file.
/// Integer samples are scaled by their bit depth to `[-1, 1)`. Float samples are kept as is.
/// # Errors
/// - [`AnalysisError::Io`] if the file can't be opened or decoded.
/// - [`AnalysisError::InvalidArgument`] if the file has no channel `channel`.
pub fn read_wav(file: &Path, channel: usize) -> Result<(WavSpec, Vec<f64>)> {
    let mut reader = WavReader::open(file).map_err(io_error(file))?;
    let spec = reader.spec();
    log::trace!("Spec: {:?}", spec);
    let channels = usize::from(spec.channels);
    if channel >= channels {
        return Err(AnalysisError::InvalidArgument(format!(
            "channel {channel} requested but '{}' has {channels}",
            file.display()
        )));
    }
    // Select correct format representation.
    let data = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .skip(channel)
            .step_by(channels)
            .map(|x| x.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>(),
        SampleFormat::Int => {
            let full_scale = f64::from(1u32 << (spec.bits_per_sample - 1));
            reader
                .samples::<i32>()
                .skip(channel)
                .step_by(channels)
                .map(|x| x.map(|x| f64::from(x) / full_scale))
                .collect::<std::result::Result<Vec<_>, _>>()
        }
    }
    .map_err(io_error(file))?;
    Ok((spec, data))
}

/// Write mono data to a 32 bit float wav file.
/// # Errors
/// - [`AnalysisError::Io`] if the file can't be created or written.
pub fn write_wav(file: &Path, sample_rate: u32, samples: impl Iterator<Item = f32>) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(file, spec).map_err(io_error(file))?;
    for sample in samples {
        writer.write_sample(sample).map_err(io_error(file))?;
    }
    writer.finalize().map_err(io_error(file))?;
    Ok(())
}
