//! Energy measurement and silence detection.
//!
//! The chunker uses these to find natural pauses near a window's end so a
//! chunk boundary does not land in the middle of a word.

use crate::audio::clip::AudioClip;

/// Calculate RMS (Root Mean Square) energy of samples, normalized to 0.0..=1.0.
pub fn calculate_rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples
        .iter()
        .map(|&sample| {
            let normalized = sample as f64 / i16::MAX as f64;
            normalized * normalized
        })
        .sum();

    let mean_square = sum_squares / samples.len() as f64;
    mean_square.sqrt() as f32
}

/// Loudness in dBFS relative to full-scale 16-bit audio.
///
/// Digital silence (and an empty slice) returns negative infinity, which
/// compares below every finite threshold.
pub fn dbfs(samples: &[i16]) -> f32 {
    let rms = calculate_rms(samples);
    if rms <= 0.0 {
        return f32::NEG_INFINITY;
    }
    20.0 * rms.log10()
}

/// Find silent ranges in a clip, as `(start_ms, end_ms)` pairs.
///
/// A sliding window of `min_silence_ms` advances by `seek_step_ms`; every
/// window position whose loudness is at or below `threshold_db` marks a
/// silent start, and consecutive marks merge into one range. Ranges are
/// ordered and non-overlapping. A clip shorter than `min_silence_ms`
/// contains no qualifying silence.
pub fn detect_silence(
    clip: &AudioClip,
    min_silence_ms: u64,
    threshold_db: f32,
    seek_step_ms: u64,
) -> Vec<(u64, u64)> {
    let duration = clip.duration_ms();
    if min_silence_ms == 0 || seek_step_ms == 0 || duration < min_silence_ms {
        return Vec::new();
    }

    let last_start = duration - min_silence_ms;
    let mut silent_starts: Vec<u64> = Vec::new();

    let mut pos = 0u64;
    while pos <= last_start {
        let window = clip.slice_ms(pos, pos + min_silence_ms);
        if dbfs(&window.samples) <= threshold_db {
            silent_starts.push(pos);
        }
        pos += seek_step_ms;
    }
    // The stepped scan can stop short of the final window; check it too.
    if last_start % seek_step_ms != 0 {
        let window = clip.slice_ms(last_start, duration);
        if dbfs(&window.samples) <= threshold_db {
            silent_starts.push(last_start);
        }
    }

    let mut ranges = Vec::new();
    let mut iter = silent_starts.into_iter();
    let Some(first) = iter.next() else {
        return ranges;
    };

    let mut range_start = first;
    let mut prev = first;
    for start in iter {
        let continuous = start == prev + seek_step_ms;
        let has_gap = start > prev + min_silence_ms;
        if !continuous && has_gap {
            ranges.push((range_start, prev + min_silence_ms));
            range_start = start;
        }
        prev = start;
    }
    ranges.push((range_start, prev + min_silence_ms));
    ranges
}
