//! Stereo WAV reading and writing over hound.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};

/// WAV layer errors.
#[derive(Debug, thiserror::Error)]
pub enum WavError {
    /// File could not be read, written, or decoded.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The reverberator's boundary is stereo; more channels than that
    /// have no defined downmix here.
    #[error("unsupported channel count: {0} (expected mono or stereo)")]
    UnsupportedChannels(u16),
}

/// Read a mono or stereo WAV file as stereo frame pairs.
///
/// Integer formats are normalized to [-1, 1]; mono input feeds both
/// sides of the stereo boundary.
pub fn read_stereo<P: AsRef<Path>>(path: P) -> Result<(Vec<(f32, f32)>, u32), WavError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    if spec.channels == 0 || spec.channels > 2 {
        return Err(WavError::UnsupportedChannels(spec.channels));
    }

    let raw: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let frames = if spec.channels == 2 {
        raw.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
    } else {
        raw.iter().map(|&s| (s, s)).collect()
    };
    Ok((frames, spec.sample_rate))
}

/// Write stereo frame pairs as a 32-bit float WAV file.
pub fn write_stereo<P: AsRef<Path>>(
    path: P,
    frames: &[(f32, f32)],
    sample_rate: u32,
) -> Result<(), WavError> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &(left, right) in frames {
        writer.write_sample(left)?;
        writer.write_sample(right)?;
    }
    writer.finalize()?;
    Ok(())
}
