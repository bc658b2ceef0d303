//! In-memory mono audio buffer with millisecond arithmetic.

/// A mono audio buffer paired with its sample rate.
///
/// All pipeline timing is expressed in integer milliseconds; the clip
/// converts between milliseconds and sample offsets so the chunking and
/// mixing code never deals in raw indices.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// A silent clip of the given duration.
    pub fn silence(duration_ms: u64, sample_rate: u32) -> Self {
        let len = (duration_ms * sample_rate as u64 / 1000) as usize;
        Self::new(vec![0i16; len], sample_rate)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in milliseconds (truncating).
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }

    /// Sample index corresponding to a millisecond offset.
    pub fn sample_index(&self, ms: u64) -> usize {
        (ms * self.sample_rate as u64 / 1000) as usize
    }

    /// Copy of the samples in `[start_ms, end_ms)`, clamped to the clip.
    pub fn slice_ms(&self, start_ms: u64, end_ms: u64) -> AudioClip {
        let start = self.sample_index(start_ms).min(self.samples.len());
        let end = self.sample_index(end_ms).min(self.samples.len()).max(start);
        AudioClip::new(self.samples[start..end].to_vec(), self.sample_rate)
    }
}
