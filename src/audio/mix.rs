//! Crossfade concatenation of synthesized audio segments.

use crate::audio::clip::AudioClip;
use crate::audio::wav::resample;
use crate::error::{RedubError, Result};

/// Join segments end to end, blending each seam with a linear crossfade.
///
/// The fade window is clamped to the shorter of the two segments at every
/// seam, so very short segments still join cleanly. Segments with differing
/// sample rates are resampled to the highest rate present before mixing.
/// An empty segment list is an internal error; the assembler reports a
/// missing-synthesis failure before ever calling this.
pub fn crossfade_concat(segments: &[AudioClip], crossfade_ms: u64) -> Result<AudioClip> {
    let Some(first) = segments.first() else {
        return Err(RedubError::Invariant {
            message: "crossfade_concat called with no segments".to_string(),
        });
    };

    let target_rate = segments
        .iter()
        .map(|s| s.sample_rate)
        .max()
        .unwrap_or(first.sample_rate);
    let fade_samples = (crossfade_ms * target_rate as u64 / 1000) as usize;

    let mut combined = at_rate(first, target_rate);
    for segment in &segments[1..] {
        let next = at_rate(segment, target_rate);
        append_with_crossfade(&mut combined, &next, fade_samples);
    }

    Ok(AudioClip::new(combined, target_rate))
}

fn at_rate(clip: &AudioClip, rate: u32) -> Vec<i16> {
    if clip.sample_rate == rate {
        clip.samples.clone()
    } else {
        resample(&clip.samples, clip.sample_rate, rate)
    }
}

/// Append `next` to `out`, linearly blending the last `fade` samples of
/// `out` with the first `fade` samples of `next`.
fn append_with_crossfade(out: &mut Vec<i16>, next: &[i16], fade: usize) {
    let fade = fade.min(out.len()).min(next.len());
    let tail_start = out.len() - fade;

    for i in 0..fade {
        let t = (i + 1) as f32 / (fade + 1) as f32;
        let a = out[tail_start + i] as f32;
        let b = next[i] as f32;
        out[tail_start + i] = (a * (1.0 - t) + b * t).round() as i16;
    }
    out.extend_from_slice(&next[fade..]);
}
