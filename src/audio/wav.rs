//! WAV decoding and encoding for pipeline input and output.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use crate::audio::clip::AudioClip;
use crate::error::{RedubError, Result};

/// Decode WAV data from any reader into a mono clip.
///
/// Stereo input is downmixed by averaging channels. The source sample rate
/// is preserved; chunking and silence analysis work at any rate.
pub fn decode_wav(reader: impl Read) -> Result<AudioClip> {
    let mut wav_reader = hound::WavReader::new(reader).map_err(|e| RedubError::AudioDecode {
        message: format!("Failed to parse WAV file: {}", e),
    })?;

    let spec = wav_reader.spec();

    let raw_samples: Vec<i16> = wav_reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| RedubError::AudioDecode {
            message: format!("Failed to read WAV samples: {}", e),
        })?;

    let samples = match spec.channels {
        1 => raw_samples,
        2 => raw_samples
            .chunks_exact(2)
            .map(|pair| {
                let left = pair[0] as i32;
                let right = pair[1] as i32;
                ((left + right) / 2) as i16
            })
            .collect(),
        other => {
            return Err(RedubError::AudioDecode {
                message: format!("Unsupported channel count: {}", other),
            });
        }
    };

    Ok(AudioClip::new(samples, spec.sample_rate))
}

/// Decode a WAV file from disk.
pub fn read_wav_file(path: &Path) -> Result<AudioClip> {
    let file = File::open(path)?;
    decode_wav(BufReader::new(file))
}

/// Encode a clip as 16-bit mono PCM WAV bytes.
pub fn encode_wav(clip: &AudioClip) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer =
        hound::WavWriter::new(&mut cursor, spec).map_err(|e| RedubError::AudioEncode {
            message: format!("Failed to create WAV writer: {}", e),
        })?;
    for &sample in &clip.samples {
        writer
            .write_sample(sample)
            .map_err(|e| RedubError::AudioEncode {
                message: format!("Failed to write sample: {}", e),
            })?;
    }
    writer.finalize().map_err(|e| RedubError::AudioEncode {
        message: format!("Failed to finalize WAV: {}", e),
    })?;

    Ok(cursor.into_inner())
}

/// Write a clip to disk as 16-bit mono PCM WAV.
pub fn write_wav_file(path: &Path, clip: &AudioClip) -> Result<()> {
    let bytes = encode_wav(clip)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Linear-interpolation resampling between sample rates.
///
/// Good enough for matching synthesized segments before mixing; output
/// quality is bounded by the TTS services, not this conversion.
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    let mut out = Vec::with_capacity(output_len);
    for i in 0..output_len {
        let pos = i as f64 * ratio;
        let idx = pos as usize;
        match samples.get(idx + 1) {
            Some(&next) => {
                let frac = pos - idx as f64;
                let a = samples[idx] as f64;
                out.push((a + (next as f64 - a) * frac) as i16);
            }
            None => out.push(samples[idx]),
        }
    }
    out
}
